//! Output formatters for token streams and token trees

pub mod treeviz;

pub use treeviz::to_treeviz_str;
