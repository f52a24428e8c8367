//! SVN CLI wrapper and output parsers.

pub mod client;
pub mod parser;

pub use client::{SvnClient, VersionControl};
pub use parser::*;
