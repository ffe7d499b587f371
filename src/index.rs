//! Repository indexing collaborators
//!
//! Everything the incremental reindexing job needs around the core pipeline:
//! recursive file enumeration ([`walker`]), gitignore-style exclusion rules
//! ([`ignore`]), content digests ([`hash`]) and the persisted file-hash
//! index ([`store`]).
//!
//! These are the only components with hard failures in the whole system
//! (unsupported hash algorithm, missing file, store I/O); the parsing core
//! never raises.

use std::fmt;

pub mod hash;
pub mod ignore;
pub mod store;
pub mod walker;

/// Errors raised by the indexing collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexError {
    /// Hash algorithm name is not one of the supported set
    UnsupportedAlgorithm(String),
    /// A file to digest does not exist or is not a regular file
    FileNotFound(String),
    /// Underlying I/O failure
    Io(String),
    /// Persisted index could not be read or written
    Store(String),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::UnsupportedAlgorithm(name) => {
                write!(f, "Unsupported hash algorithm: {}", name)
            }
            IndexError::FileNotFound(path) => write!(f, "File not found: {}", path),
            IndexError::Io(msg) => write!(f, "IO error: {}", msg),
            IndexError::Store(msg) => write!(f, "Index store error: {}", msg),
        }
    }
}

impl std::error::Error for IndexError {}
