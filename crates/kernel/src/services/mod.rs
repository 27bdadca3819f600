//! Application services.
//!
//! Services hold the request-independent logic behind the HTTP routes and
//! talk to storage through [`DirectoryStore`](crate::storage::DirectoryStore).

pub mod directory;

pub use directory::{
    CategoryDetail, CategoryListing, ConventionDetail, DirectoryService, PageLimits,
};
