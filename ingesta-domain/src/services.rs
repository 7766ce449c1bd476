// Domain services: the pure stages of the ingestion pipeline
pub mod auth;
pub mod normalizer;
pub mod raw_payload;
pub mod validator;

pub use auth::*;
pub use normalizer::*;
pub use raw_payload::*;
pub use validator::*;
