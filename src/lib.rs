//! TypeScript client bindings for web application routes.
//!
//! Two tree-to-text compilers do the work:
//! - [`types::render`] turns signature type trees into TypeScript types;
//! - [`path::render`] turns route patterns into path-building expressions.
//!
//! [`signatures`] and [`routes`] join their output per named route, and
//! [`emit`] writes the routes file.
pub mod error;
pub mod types;
pub mod path;
pub mod naming;
pub mod signatures;
pub mod routes;
pub mod emit;
pub mod load;
pub mod generate;

pub use error::{Diagnostic, Error, MissingRequiredSegment, Result};
pub use generate::{Generated, generate};
