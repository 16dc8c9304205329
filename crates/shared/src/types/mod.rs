//! Common types used across the application.

pub mod id;
pub mod pagination;

pub use id::*;
pub use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest, SortDirection};
