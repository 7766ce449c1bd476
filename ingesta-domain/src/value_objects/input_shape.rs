// Input shape value object

use serde::{Deserialize, Serialize};

/// Container shape a request body was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputShape {
    /// `[{...}, {...}]`
    Array,
    /// `{"body": [{...}]}`
    Envelope,
    /// `{...}`
    Single,
}

impl InputShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputShape::Array => "array",
            InputShape::Envelope => "envelope",
            InputShape::Single => "single",
        }
    }
}
