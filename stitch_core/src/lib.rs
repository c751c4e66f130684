//! `stitch_core` is the library behind the `stitch` build tool. It assembles
//! distributable script artifacts from a source tree: a primary source file
//! runs through an ordered chain of text transformations and the result is
//! written to a target path.
//!
//! ## Processing Pipeline
//!
//! ```text
//! stitch.toml
//!   → StitchConfig (artifact declarations, version source, lint settings)
//!   → BuildContext (version + build date, computed once)
//!   → BuildPlan (paths resolved, templates rendered, chains constructed)
//!   → Artifact / TreeArtifact (read → chain → normalize → atomic write)
//!   → optional zip archive
//! ```
//!
//! ## Modules
//!
//! - [`header`]: Detects and strips a leading `/* ... */` license header.
//! - [`placeholder`]: `#INCLUDE name#` and `#name#` value substitution.
//! - [`include`]: `#INCLUDE file` directive scanning and recursive
//!   resolution over ordered search roots.
//! - [`transform`]: The [`Transformation`] enum and [`TransformationChain`].
//! - [`config`]: Loading `stitch.toml`.
//! - [`project`]: Turning a config into a [`BuildPlan`] and running it.
//! - [`tree`] and [`package`]: Directory artifacts and zip packaging.
//! - [`lint`]: Lightweight static checks over script sources.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use chrono::NaiveDate;
//! use stitch_core::BuildPlan;
//! use stitch_core::build_project;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let (_, plan) = BuildPlan::load(Path::new("."), date).unwrap();
//! let report = build_project(&plan).unwrap();
//!
//! for path in report.written() {
//!     println!("{}", path.display());
//! }
//! ```

pub use assembler::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use project::*;
pub use transform::*;

pub mod assembler;
pub mod config;
pub mod context;
#[allow(unused_assignments)]
mod error;
pub mod files;
pub mod header;
pub mod include;
pub mod lint;
pub mod package;
pub mod placeholder;
pub mod project;
pub mod transform;
pub mod tree;

#[cfg(test)]
mod __fixtures;
