// Storage port trait (interface)
// Defines what the domain needs from the object-storage infrastructure

pub mod storage;

pub use storage::*;
