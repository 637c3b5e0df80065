//! Forum domain model and read views.
//!
//! # Responsibility
//! - Define identifiers and view records returned by the query service.
//! - Hold input validation and page arithmetic that need no store access.
//!
//! # Invariants
//! - Identifiers are assigned by the store and never reused.
//! - Views are detached snapshots; they never borrow from a connection.

pub mod page;
pub mod person;
pub mod views;

/// Store-assigned identifier of a person row.
pub type PersonId = i64;
/// Store-assigned identifier of a forum row.
pub type ForumId = i64;
/// Store-assigned identifier of a topic row.
pub type TopicId = i64;
/// Store-assigned identifier of a post row.
pub type PostId = i64;
