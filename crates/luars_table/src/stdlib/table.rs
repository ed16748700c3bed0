// Table library
// Implements: concat, getn, insert, maxn, remove, sort, unpack

use crate::lua_value::{CFunction, LuaValue, MultiValue};
use crate::lua_vm::lua_limits::MAX_UNPACK_RESULTS;
use crate::lua_vm::{LuaCaller, LuaError, LuaResult};
use crate::stdlib::sort_table;
use crate::{LuaTable, LuaTableRef};

const TABLE_FUNCTIONS: &[(&str, CFunction)] = &[
    ("concat", table_concat),
    ("getn", table_getn),
    ("insert", table_insert),
    ("maxn", table_maxn),
    ("remove", table_remove),
    ("sort", table_sort),
    ("unpack", table_unpack),
];

/// Build the `table` library as a table of native functions
pub fn create_table_lib() -> LuaTable {
    let mut lib = LuaTable::new(0, TABLE_FUNCTIONS.len());
    for (name, func) in TABLE_FUNCTIONS {
        lib.raw_set_str(*name, LuaValue::cfunction(*func));
    }
    lib
}

fn check_table(args: &[LuaValue], func: &'static str) -> LuaResult<LuaTableRef> {
    match args.first() {
        Some(LuaValue::Table(t)) => Ok(t.clone()),
        other => Err(LuaError::bad_argument(
            1,
            func,
            format!(
                "table expected, got {}",
                other.map_or("no value", LuaValue::type_name)
            ),
        )),
    }
}

fn check_integer(args: &[LuaValue], index: usize, func: &'static str) -> LuaResult<i64> {
    let value = args.get(index - 1);
    value.and_then(LuaValue::as_integer).ok_or_else(|| {
        LuaError::bad_argument(
            index,
            func,
            format!(
                "number expected, got {}",
                value.map_or("no value", LuaValue::type_name)
            ),
        )
    })
}

/// Integer argument that defaults when absent or nil
fn opt_integer(args: &[LuaValue], index: usize, func: &'static str, default: i64) -> LuaResult<i64> {
    match args.get(index - 1) {
        None | Some(LuaValue::Nil) => Ok(default),
        Some(_) => check_integer(args, index, func),
    }
}

/// table.concat(list [, sep [, i [, j]]])
fn table_concat(_: &mut dyn LuaCaller, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = check_table(args, "concat")?;
    let sep = match args.get(1) {
        None | Some(LuaValue::Nil) => String::new(),
        Some(LuaValue::String(s)) => s.as_str().to_string(),
        Some(v @ (LuaValue::Integer(_) | LuaValue::Float(_))) => v.to_string(),
        Some(other) => {
            return Err(LuaError::bad_argument(
                2,
                "concat",
                format!("string expected, got {}", other.type_name()),
            ));
        }
    };

    let t = table.borrow();
    let i = opt_integer(args, 3, "concat", 1)?;
    let j = opt_integer(args, 4, "concat", t.len() as i64)?;

    let mut out = String::new();
    let mut int_buffer = itoa::Buffer::new();
    for idx in i..=j {
        match t.raw_get_int(idx) {
            LuaValue::String(s) => out.push_str(s.as_str()),
            LuaValue::Integer(n) => out.push_str(int_buffer.format(n)),
            v @ LuaValue::Float(_) => out.push_str(&v.to_string()),
            other => {
                return Err(LuaError::runtime(format!(
                    "invalid value (at index {}) in table for 'concat' (got {})",
                    idx,
                    other.type_name()
                )));
            }
        }
        if idx < j {
            out.push_str(&sep);
        }
    }
    Ok(MultiValue::single(LuaValue::from(out)))
}

/// table.getn(list)
fn table_getn(_: &mut dyn LuaCaller, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = check_table(args, "getn")?;
    let n = table.len() as i64;
    Ok(MultiValue::single(LuaValue::integer(n)))
}

/// table.insert(list, [pos,] value)
fn table_insert(_: &mut dyn LuaCaller, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = check_table(args, "insert")?;
    match args.len() {
        2 => table.borrow_mut().append(args[1].clone()),
        3 => {
            let pos = check_integer(args, 2, "insert")?;
            table.borrow_mut().insert(pos, args[2].clone());
        }
        _ => return Err(LuaError::runtime("wrong number of arguments to 'insert'")),
    }
    Ok(MultiValue::empty())
}

/// table.maxn(list)
fn table_maxn(_: &mut dyn LuaCaller, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = check_table(args, "maxn")?;
    let n = table.borrow().max_index() as i64;
    Ok(MultiValue::single(LuaValue::integer(n)))
}

/// table.remove(list [, pos]) - without `pos` pops the last element
fn table_remove(_: &mut dyn LuaCaller, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = check_table(args, "remove")?;
    let pos = opt_integer(args, 2, "remove", -1)?;
    let removed = table.borrow_mut().remove(pos);
    Ok(MultiValue::single(removed))
}

/// table.sort(list [, comp])
fn table_sort(caller: &mut dyn LuaCaller, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = check_table(args, "sort")?;
    let comparator = match args.get(1) {
        None | Some(LuaValue::Nil) => None,
        Some(f) if f.is_function() => Some(f),
        Some(other) => {
            return Err(LuaError::bad_argument(
                2,
                "sort",
                format!("function expected, got {}", other.type_name()),
            ));
        }
    };
    sort_table::table_sort(caller, &table, comparator)?;
    Ok(MultiValue::empty())
}

/// table.unpack(list [, i [, j]])
fn table_unpack(_: &mut dyn LuaCaller, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = check_table(args, "unpack")?;
    let t = table.borrow();
    let i = opt_integer(args, 2, "unpack", 1)?;
    let j = opt_integer(args, 3, "unpack", t.len() as i64)?;
    if i > j {
        return Ok(MultiValue::empty());
    }
    if j.saturating_sub(i) >= MAX_UNPACK_RESULTS {
        return Err(LuaError::runtime("too many results to unpack"));
    }
    let values = (i..=j).map(|idx| t.raw_get_int(idx)).collect();
    Ok(MultiValue::multiple(values))
}
