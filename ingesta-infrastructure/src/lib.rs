pub mod config;
pub mod storage;

pub use config::*;
pub use storage::*;
