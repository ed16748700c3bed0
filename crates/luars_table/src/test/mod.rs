pub mod test_sort;
pub mod test_stdlib_table;


use crate::LuaValue;

pub(crate) fn int(i: i64) -> LuaValue {
    LuaValue::integer(i)
}

pub(crate) fn s(x: &str) -> LuaValue {
    LuaValue::string(x)
}
