//! Annotation session: an editable, task-partitioned grid over fetched
//! dataset records, driven by explicit actions.

pub mod error;
pub mod grid;
pub mod files;
pub mod session;

pub use error::*;
pub use grid::*;
pub use files::*;
pub use session::*;
