// Domain value objects
pub mod identifiers;
pub mod input_shape;
pub mod storage_key;
pub mod validation_mode;

pub use identifiers::*;
pub use input_shape::*;
pub use storage_key::*;
pub use validation_mode::*;
