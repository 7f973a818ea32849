//! Domain models

pub mod manifest;

pub use manifest::*;
