//! Swift language vocabulary registries.
//!
//! The design goal is to avoid stringly-typed checks scattered across the backend. Callers ask the
//! registry whether a spelling is reserved instead of keeping private keyword lists.
//!
//! ## Examples
//! ```rust
//! use ciswift_core::lang::swift_keywords;
//!
//! assert!(swift_keywords::is_keyword("func"));
//! assert!(!swift_keywords::is_keyword("count"));
//! ```

pub mod swift_keywords;
