//! Database models.

pub mod category;
pub mod convention;

pub use category::{Category, CategorySummary, CreateCategory, NewCategory};
pub use convention::{Convention, ConventionRow, CreateConvention, NewConvention};
