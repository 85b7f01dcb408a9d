//! Data model: elements, fields, molecules and graphs.

mod element;
mod field;
mod graph;
mod molecule;

pub use element::{elements_to_matrix, Annotations, Element, ElementSummary};
pub use field::{build_field_from_elements, centroid_of, Field, FieldSummary};
pub use graph::{Graph, GraphSummary};
pub use molecule::{molecules_to_matrix, Molecule, MoleculeSummary};
