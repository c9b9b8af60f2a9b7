//! Data models for references and tool inputs.
//!
//! Records serialize with snake_case field names so tool output matches
//! what MCP clients already consume.

mod enums;
mod inputs;
mod record;

pub use enums::ResponseFormat;
pub use inputs::*;
pub use record::{ProviderMeta, Record};
