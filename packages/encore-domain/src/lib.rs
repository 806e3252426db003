pub mod merge;
pub mod page;
pub mod query;
