// Call boundary between the table core and an interpreter
mod lua_error;
pub mod lua_limits;
mod table_option;

pub use lua_error::LuaError;
pub use table_option::TableOption;

use crate::lua_value::{LuaValue, MultiValue};
use lua_limits::MAX_CALL_DEPTH;

pub type LuaResult<T> = Result<T, LuaError>;

/// Capability used by the core to call back into the interpreter.
///
/// The sort adapter only ever reaches user code through this trait, so a
/// failing call surfaces as an ordinary `Err` at the call site.
pub trait LuaCaller {
    /// Call `func` with `args` and collect every result.
    fn call(&mut self, func: &LuaValue, args: &[LuaValue]) -> LuaResult<MultiValue>;

    /// Default strict order used when no comparator is supplied.
    fn less_than(&mut self, a: &LuaValue, b: &LuaValue) -> LuaResult<bool> {
        default_less_than(a, b)
    }
}

/// Numbers compare numerically, strings bytewise; anything else is an error.
pub fn default_less_than(a: &LuaValue, b: &LuaValue) -> LuaResult<bool> {
    match (a, b) {
        (LuaValue::Integer(x), LuaValue::Integer(y)) => Ok(x < y),
        (LuaValue::Float(x), LuaValue::Float(y)) => Ok(x < y),
        (LuaValue::Integer(i), LuaValue::Float(f)) => Ok(int_lt_float(*i, *f)),
        (LuaValue::Float(f), LuaValue::Integer(i)) => Ok(float_lt_int(*f, *i)),
        (LuaValue::String(x), LuaValue::String(y)) => Ok(x.as_bytes() < y.as_bytes()),
        _ => Err(LuaError::CompareError(a.type_name(), b.type_name())),
    }
}

// 2^63, exactly representable as f64
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// `i < f` without rounding `i` through f64
fn int_lt_float(i: i64, f: f64) -> bool {
    if f.is_nan() {
        false
    } else if f >= TWO_POW_63 {
        true
    } else if f < -TWO_POW_63 {
        false
    } else {
        // f is in [-2^63, 2^63), so its ceiling fits in i64
        i < f.ceil() as i64
    }
}

/// `f < i` without rounding `i` through f64
fn float_lt_int(f: f64, i: i64) -> bool {
    if f.is_nan() {
        false
    } else if f >= TWO_POW_63 {
        false
    } else if f < -TWO_POW_63 {
        true
    } else {
        (f.floor() as i64) < i
    }
}

/// Minimal caller that runs native functions directly.
///
/// Script functions belong to a host interpreter and cannot be run here.
pub struct NativeCaller {
    depth: usize,
    max_depth: usize,
}

impl NativeCaller {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_CALL_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Default for NativeCaller {
    fn default() -> Self {
        Self::new()
    }
}

impl LuaCaller for NativeCaller {
    fn call(&mut self, func: &LuaValue, args: &[LuaValue]) -> LuaResult<MultiValue> {
        match func {
            LuaValue::CFunction(f) => {
                if self.depth >= self.max_depth {
                    return Err(LuaError::runtime("stack overflow"));
                }
                self.depth += 1;
                let result = f(self, args);
                self.depth -= 1;
                result
            }
            LuaValue::Function(f) => Err(LuaError::runtime(format!(
                "cannot call script function '{}' outside its interpreter",
                f.name()
            ))),
            other => Err(LuaError::NotCallable(other.type_name())),
        }
    }
}
