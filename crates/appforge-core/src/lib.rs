//! Core types for the appforge code generator.
//!
//! This crate provides the foundational types shared by every pipeline stage:
//! - The app definition model (screens, component trees, bindings, actions, models)
//! - Value types (OKLCH and sRGB colors, node paths)
//! - Schema and reference error types

pub mod ast;
pub mod errors;
pub mod types;

pub use ast::*;
pub use errors::*;
pub use types::*;
