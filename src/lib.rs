//! # pyscope
//!
//! A structural token-tree indexer for Python source.
//!
//! The pipeline has two stages: [`python::extract`] classifies raw character
//! units into typed tokens (strings, comments, indentation, identifiers), and
//! [`python::decorate`] folds the flat token stream into a nested tree of
//! block constructs (classes, functions, conditionals, loops, imports,
//! decorators). Both stages are best-effort: malformed input degrades to
//! under-recognition, never to an error.
//!
//! The [`index`] module carries the surrounding tooling: recursive file
//! enumeration, ignore-pattern filtering, content hashing, and a persisted
//! file-hash index for incremental reindexing.

pub mod formats;
pub mod index;
pub mod processor;
pub mod python;
pub mod token;
