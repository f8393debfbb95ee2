#![forbid(unsafe_code)]
//! ciswift: Swift code generation for resolved Ć programs
//!
//! The input is a fully resolved program tree ([`ast`]), built in memory or deserialized from JSON. The
//! [`backend`] translates it into one Swift source file in a single pass; [`cli`] is a thin driver over it.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: The emitter writes Swift force-unwraps (`!`) and `preconditionFailure()` as *text*. These
//!   are output strings, not panics in the generator.

pub mod backend;
pub mod cli;

pub use ciswift_ast as ast;

pub use backend::{EmitConfig, EmitError, SwiftCodegen};
