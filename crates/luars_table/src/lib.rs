// Lua table core
// Hybrid array/hash storage, resumable traversal and an interpreter-aware sort

#[cfg(test)]
mod test;

pub mod gc;
pub mod lua_value;
pub mod lua_vm;
pub mod stdlib;

#[cfg(feature = "serde")]
pub mod serde;

pub use gc::TableCollector;
pub use lua_value::{LuaTable, LuaTableRef, LuaValue, MultiValue};
pub use lua_vm::{LuaCaller, LuaError, LuaResult, NativeCaller, TableOption};
