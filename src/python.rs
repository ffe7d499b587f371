//! Python pipeline
//!
//! Wires the generic extraction and decoration engines to Python's lexical
//! and block structure:
//! - [`extract`]: raw text → typed tokens, handling triple-quoted and
//!   escaped string literals, `#` comments, tab-aware indentation and
//!   underscore-split identifiers
//! - [`decorate`]: typed tokens → nested tree, resolving each block
//!   construct's boundary (multi-line bracketed headers, backslash
//!   continuation, lambda colons, blank lines) and reattaching decorator
//!   markers to the class or function they annotate
//!
//! Both operations are pure functions of their input and never fail;
//! malformed source degrades to under-recognition.

pub mod boundary;
pub mod decorate;
pub mod extract;


pub use decorate::decorate;
pub use extract::extract;
