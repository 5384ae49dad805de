//! SwiftUI code generation for appforge app definitions.
//!
//! The pipeline runs in four stages per screen:
//!
//! - [`normalize`] validates a raw component tree against the catalog and fills defaults
//! - [`references`] checks every cross-screen, model and binding reference at once
//! - [`builder`] lowers normalized trees into the view IR in [`ir`]
//! - [`printer`] renders the IR as formatted Swift source
//!
//! [`generate`] drives all of them and returns the ordered file set.
//!
//! # Example
//!
//! ```ignore
//! use appforge_codegen::generate;
//!
//! let result = generate(&app)?;
//! for file in &result.files {
//!     println!("{}", file.path);
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod generate;
pub mod ir;
pub mod naming;
pub mod normalize;
pub mod printer;
pub mod references;
pub mod signatures;

pub use config::{GeneratorConfig, Limits};
pub use error::{BuildError, CodegenError, Result};
pub use generate::{generate, generate_with, CodegenResult};
pub use normalize::{normalize, NormalizedNode, NormalizedTree};
pub use printer::GeneratedFile;
pub use references::check_references;
