/// Serializer for converting Lua values to serde_json::Value
///
/// - nil -> null
/// - boolean -> boolean
/// - number -> number (integers stay integers)
/// - string -> string
/// - table with only a hole-free array segment -> array
/// - any other table -> object; keys must be strings or numbers
/// - functions and userdata -> error
use crate::lua_value::{LuaTable, LuaValue};
use crate::lua_vm::{LuaError, LuaResult};
use ahash::RandomState;
use serde_json::{Map, Number, Value as JsonValue};
use std::collections::HashSet;

/// Convert a Lua value to a serde_json::Value
pub fn to_value(lua_value: &LuaValue) -> LuaResult<JsonValue> {
    let mut visited = HashSet::with_hasher(RandomState::new());
    to_value_internal(lua_value, &mut visited)
}

/// Convert a Lua value to a JSON string
pub fn to_string(lua_value: &LuaValue, pretty: bool) -> LuaResult<String> {
    let json_value = to_value(lua_value)?;
    let result = if pretty {
        serde_json::to_string_pretty(&json_value)
    } else {
        serde_json::to_string(&json_value)
    };
    result.map_err(|e| LuaError::runtime(format!("failed to serialize to JSON: {}", e)))
}

fn to_value_internal(
    lua_value: &LuaValue,
    visited: &mut HashSet<usize, RandomState>,
) -> LuaResult<JsonValue> {
    match lua_value {
        LuaValue::Nil => Ok(JsonValue::Null),
        LuaValue::Boolean(b) => Ok(JsonValue::Bool(*b)),
        LuaValue::Integer(i) => Ok(JsonValue::Number(Number::from(*i))),
        LuaValue::Float(n) => Number::from_f64(*n)
            .map(JsonValue::Number)
            .ok_or_else(|| LuaError::runtime(format!("cannot serialize number {} to JSON", n))),
        LuaValue::String(s) => Ok(JsonValue::String(s.as_str().to_string())),
        LuaValue::Table(t) => {
            let addr = t.as_ptr() as usize;
            if !visited.insert(addr) {
                return Err(LuaError::runtime("circular reference detected in table"));
            }
            let table = t.borrow();
            let result = if is_array_like(&table) {
                table_to_json_array(&table, visited)
            } else {
                table_to_json_object(&table, visited)
            };
            visited.remove(&addr);
            result
        }
        other => Err(LuaError::runtime(format!(
            "cannot serialize {} to JSON",
            other.type_name()
        ))),
    }
}

/// Empty tables count as arrays
fn is_array_like(table: &LuaTable) -> bool {
    table.hash_len() == 0 && table.array_values().iter().all(|v| !v.is_nil())
}

fn table_to_json_array(
    table: &LuaTable,
    visited: &mut HashSet<usize, RandomState>,
) -> LuaResult<JsonValue> {
    let items = table
        .array_values()
        .iter()
        .map(|v| to_value_internal(v, visited))
        .collect::<LuaResult<Vec<_>>>()?;
    Ok(JsonValue::Array(items))
}

fn table_to_json_object(
    table: &LuaTable,
    visited: &mut HashSet<usize, RandomState>,
) -> LuaResult<JsonValue> {
    let mut map = Map::new();
    for (key, value) in table.pairs() {
        let key = match &key {
            LuaValue::String(s) => s.as_str().to_string(),
            LuaValue::Integer(_) | LuaValue::Float(_) => key.to_string(),
            other => {
                return Err(LuaError::runtime(format!(
                    "cannot use {} as a JSON object key",
                    other.type_name()
                )));
            }
        };
        map.insert(key, to_value_internal(&value, visited)?);
    }
    Ok(JsonValue::Object(map))
}
