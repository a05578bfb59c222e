mod pool;
mod tables;

pub use pool::create_pool;
pub use tables::{BookCatalog, Tables};
