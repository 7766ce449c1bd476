// Domain entities
pub mod model;
pub mod raw_document;
pub mod record;

pub use model::*;
pub use raw_document::*;
pub use record::*;
