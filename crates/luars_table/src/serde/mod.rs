/// JSON conversion for Lua values
///
/// Enabled by the `serde` feature. Conversion goes through
/// `serde_json::Value` rather than `Serialize` impls on the value types.
mod serializer;

pub use serializer::{to_string as lua_to_json_string, to_value as lua_to_json};
