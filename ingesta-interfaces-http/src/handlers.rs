pub mod ingest_handlers;
pub mod ops_handlers;

pub use ingest_handlers::*;
pub use ops_handlers::*;
