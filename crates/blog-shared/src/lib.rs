//! # Blog Shared
//!
//! Request and response shapes of the public blog API.
//! Kept free of server crates so clients can reuse them.

pub mod datetime;
pub mod dto;
pub mod response;

pub use response::{ErrorResponse, PaginatedResponse};
