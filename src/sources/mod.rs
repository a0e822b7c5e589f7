//! Project sources.
//!
//! Finds the files each project is built from: the project's own directory,
//! its mapped directories and its explicitly listed files.

pub mod files;

pub use files::{classify_listed_file, classify_walked_file, collect_project_files, ResolvedFile};
