//! Convention listing: filter criteria, predicate builder, and SQL rendering.
//!
//! A listing request flows through these pieces in order:
//! [`ListingParams`] (raw query string) → [`ConventionFilters`] →
//! [`ConventionQueryBuilder`] → [`Predicate`] → [`ListingQuery`], which a
//! storage backend either renders with [`ListingStatement`] or evaluates
//! in process with [`Predicate::matches`].

pub mod filter;
pub mod params;
pub mod predicate;
pub mod query_builder;
pub mod statement;
pub mod types;

pub use filter::{ConventionFilters, DateWindow};
pub use params::{ListingParams, ListingRequest};
pub use predicate::{CategoryColumn, Condition, ConventionColumn, Operator, Predicate, Value};
pub use query_builder::ConventionQueryBuilder;
pub use statement::ListingStatement;
pub use types::{ListingPage, ListingQuery, Pagination, SortField, SortOrder};
