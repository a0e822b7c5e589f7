//! Core data structures for projgen.
//!
//! - The project graph loaded from `ProjectDefs.json`
//! - Target platforms and inheriting target configurations

pub mod project;
pub mod targets;

pub use project::{DirectoryMapping, ExtraFile, FileType, ProjectDef, ProjectGraph, ProjectRole};
pub use targets::{TargetConfiguration, TargetDefs, TargetPlatform};
