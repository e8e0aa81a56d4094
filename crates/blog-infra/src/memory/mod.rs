//! In-memory storage - used when no database is configured and in tests.
//! Data is lost on process restart.

mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;

#[cfg(test)]
mod tests;

pub use store::{
    InMemoryAuthorRepository, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryTagRepository, MemoryDatabase,
};
