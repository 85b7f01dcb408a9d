//! Integration tests for the diagnostics pipeline.
//!
//! Every test runs the real pipeline on deterministic data (NO MOCKS):
//! - Structure builder, entropy and coherence on fixed scenarios
//! - Leave-one-out stability ordering, interruption and parallel parity
//! - Geometry delta invariance under rigid motions and scaling
//! - Shared projection across fields of different dimensionality
//! - Backend fallback and verification

mod helpers;
mod backend_tests;
mod geometry_tests;
mod property_tests;
mod scenario_tests;
mod stability_tests;
