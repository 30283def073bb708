//! Dataset fetch adapter.
//!
//! Pulls the examples of a named dataset from a LangSmith-compatible service
//! and flattens each one into an annotatable [`DatasetRecord`].

pub mod error;
pub mod schema;
pub mod normalize;
pub mod source;
pub mod cache;
pub mod langsmith;

pub use error::*;
pub use schema::*;
pub use normalize::*;
pub use source::*;
pub use cache::*;
pub use langsmith::*;
