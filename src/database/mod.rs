pub mod models;
pub mod schema;
pub mod store;

pub use schema::init_schema;
pub use store::{ExecResult, Store, StoreError};
