//! Domain types shared by the store and the GraphQL surface.

pub mod employers;

pub use employers::{Employer, EmployerPatch, NewEmployer, seed_employers};
