//! High-level operations.
//!
//! This module contains the implementation of projgen commands.

pub mod generate;

pub use generate::{generate, render_all, GenerateOptions, GenerateReport, GeneratorInputs};
