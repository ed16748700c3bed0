// Value model used by the table core
// Only what is needed to classify keys, compare values and store them
mod lua_table;
mod lua_value;

use crate::lua_vm::{LuaCaller, LuaResult};
use smol_str::SmolStr;
use std::any::Any;
use std::borrow::Borrow;
use std::fmt;

pub use lua_table::{LuaTable, LuaTableRef, Pairs};
pub use lua_value::{LuaValue, LuaValueKind, float_to_integer};

/// Multi-return values from Lua functions
/// - Empty: no return values
/// - Single: one value (no heap allocation, most common case)
/// - Many: 2+ values stored in Vec
#[derive(Debug, Clone)]
pub enum MultiValue {
    Empty,
    Single(LuaValue),
    Many(Vec<LuaValue>),
}

impl MultiValue {
    #[inline(always)]
    pub fn empty() -> Self {
        MultiValue::Empty
    }

    #[inline(always)]
    pub fn single(value: LuaValue) -> Self {
        MultiValue::Single(value)
    }

    pub fn multiple(mut values: Vec<LuaValue>) -> Self {
        match values.len() {
            0 => MultiValue::Empty,
            1 => MultiValue::Single(values.swap_remove(0)),
            _ => MultiValue::Many(values),
        }
    }

    pub fn all_values(self) -> Vec<LuaValue> {
        match self {
            MultiValue::Empty => Vec::new(),
            MultiValue::Single(v) => vec![v],
            MultiValue::Many(v) => v,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        match self {
            MultiValue::Empty => 0,
            MultiValue::Single(_) => 1,
            MultiValue::Many(v) => v.len(),
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First value, the only one kept by single-result calls
    #[inline(always)]
    pub fn first(&self) -> Option<&LuaValue> {
        match self {
            MultiValue::Empty => None,
            MultiValue::Single(v) => Some(v),
            MultiValue::Many(v) => v.first(),
        }
    }

    /// Get value at index (0-based)
    pub fn get(&self, index: usize) -> Option<&LuaValue> {
        match self {
            MultiValue::Empty => None,
            MultiValue::Single(v) => (index == 0).then_some(v),
            MultiValue::Many(v) => v.get(index),
        }
    }
}

/// Native function callable through a `LuaCaller`
pub type CFunction = fn(&mut dyn LuaCaller, &[LuaValue]) -> LuaResult<MultiValue>;

/// Immutable Lua string
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LuaString(SmolStr);

impl LuaString {
    pub fn new(s: &str) -> Self {
        LuaString(SmolStr::new(s))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<str> for LuaString {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for LuaString {
    fn from(s: &str) -> Self {
        LuaString::new(s)
    }
}

impl From<String> for LuaString {
    fn from(s: String) -> Self {
        LuaString(SmolStr::from(s))
    }
}

impl fmt::Debug for LuaString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.as_str())
    }
}

impl fmt::Display for LuaString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Handle to a script function owned by a host interpreter.
///
/// The table core never runs these itself; it hands them back to the
/// interpreter through `LuaCaller::call`.
#[derive(Debug)]
pub struct LuaFunction {
    proto: u32,
    name: SmolStr,
}

impl LuaFunction {
    pub fn new(proto: u32, name: &str) -> Self {
        Self {
            proto,
            name: SmolStr::new(name),
        }
    }

    #[inline]
    pub fn proto(&self) -> u32 {
        self.proto
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Opaque host data
pub struct LuaUserdata {
    data: Box<dyn Any>,
}

impl LuaUserdata {
    pub fn new<T: Any>(data: T) -> Self {
        Self {
            data: Box::new(data),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }
}

impl fmt::Debug for LuaUserdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "userdata")
    }
}
