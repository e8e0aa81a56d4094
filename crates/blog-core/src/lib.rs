//! # Blog Core
//!
//! The domain layer of the blog backend.
//! Holds the entities, the publication-visibility policy, pagination and the
//! read/submit services. No infrastructure dependencies live here; storage
//! and time are reached through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;
pub mod visibility;

pub use error::{DomainError, RepoError, ValidationErrors};
pub use pagination::{Page, PageRequest, PaginationConfig};
