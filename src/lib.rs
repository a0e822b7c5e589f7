//! projgen - Visual Studio solution generator for modular C++ codebases
//!
//! This crate provides the core library functionality for projgen:
//! loading the project graph, resolving modules, roles and references per
//! configuration, and emitting project, filters, solution and module-list
//! files.

pub mod core;
pub mod emit;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test fixtures for projgen unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides project graph builders and the built-in
/// target definitions.
#[cfg(test)]
pub mod test_support;

pub use core::{ProjectDef, ProjectGraph, ProjectRole, TargetDefs};
pub use resolver::{resolve, Resolution, ResolveError};
