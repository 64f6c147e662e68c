pub mod client;
pub mod models;
pub mod query_builder;
pub mod repository;

pub use client::{BackendClient, BackendError};
pub use query_builder::QueryBuilder;
pub use repository::Repository;
