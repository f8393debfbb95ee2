//! Provide the Swift target vocabulary and pure naming helpers shared by the ciswift backend.
//!
//! This crate is intentionally small and dependency-light. It contains deterministic helpers that the
//! backend uses when it spells identifiers and literals in generated Swift.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, and no AST types.
//! - Current scope: the Swift reserved-word registry (identifier escaping), identifier casing, and
//!   Swift string literal escaping.

pub mod lang;
pub mod strings;
