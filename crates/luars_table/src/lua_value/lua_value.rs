// LuaValue - tagged value with Lua equality and hashing
//
// Integers and floats with the same mathematical value are equal and hash
// alike, so `t[2]` and `t[2.0]` name one key. NaN is never stored as a key,
// which keeps `Eq` sound for everything that reaches a hash segment.
use crate::lua_value::{CFunction, LuaFunction, LuaString, LuaTableRef, LuaUserdata};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LuaValueKind {
    Nil,
    Boolean,
    Number,
    String,
    Table,
    Function,
    Userdata,
}

#[derive(Clone, Default)]
pub enum LuaValue {
    #[default]
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(LuaString),
    Table(LuaTableRef),
    /// Script function owned by the host interpreter
    Function(Rc<LuaFunction>),
    /// Native function
    CFunction(CFunction),
    Userdata(Rc<LuaUserdata>),
}

/// Exact integer value of a float, if it has one that fits in i64
#[inline]
pub fn float_to_integer(n: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything below it and integral fits
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if n.fract() == 0.0 && n >= -LIMIT && n < LIMIT {
        Some(n as i64)
    } else {
        None
    }
}

impl LuaValue {
    #[inline(always)]
    pub const fn nil() -> Self {
        LuaValue::Nil
    }

    #[inline(always)]
    pub const fn boolean(b: bool) -> Self {
        LuaValue::Boolean(b)
    }

    #[inline(always)]
    pub const fn integer(i: i64) -> Self {
        LuaValue::Integer(i)
    }

    #[inline(always)]
    pub const fn float(n: f64) -> Self {
        LuaValue::Float(n)
    }

    pub fn string(s: &str) -> Self {
        LuaValue::String(LuaString::new(s))
    }

    pub fn table(t: LuaTableRef) -> Self {
        LuaValue::Table(t)
    }

    pub fn function(f: LuaFunction) -> Self {
        LuaValue::Function(Rc::new(f))
    }

    pub fn cfunction(f: CFunction) -> Self {
        LuaValue::CFunction(f)
    }

    pub fn userdata(u: LuaUserdata) -> Self {
        LuaValue::Userdata(Rc::new(u))
    }

    pub fn kind(&self) -> LuaValueKind {
        match self {
            LuaValue::Nil => LuaValueKind::Nil,
            LuaValue::Boolean(_) => LuaValueKind::Boolean,
            LuaValue::Integer(_) | LuaValue::Float(_) => LuaValueKind::Number,
            LuaValue::String(_) => LuaValueKind::String,
            LuaValue::Table(_) => LuaValueKind::Table,
            LuaValue::Function(_) | LuaValue::CFunction(_) => LuaValueKind::Function,
            LuaValue::Userdata(_) => LuaValueKind::Userdata,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind() {
            LuaValueKind::Nil => "nil",
            LuaValueKind::Boolean => "boolean",
            LuaValueKind::Number => "number",
            LuaValueKind::String => "string",
            LuaValueKind::Table => "table",
            LuaValueKind::Function => "function",
            LuaValueKind::Userdata => "userdata",
        }
    }

    #[inline(always)]
    pub fn is_nil(&self) -> bool {
        matches!(self, LuaValue::Nil)
    }

    #[inline(always)]
    pub fn is_number(&self) -> bool {
        matches!(self, LuaValue::Integer(_) | LuaValue::Float(_))
    }

    #[inline(always)]
    pub fn is_string(&self) -> bool {
        matches!(self, LuaValue::String(_))
    }

    #[inline(always)]
    pub fn is_table(&self) -> bool {
        matches!(self, LuaValue::Table(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, LuaValue::Function(_) | LuaValue::CFunction(_))
    }

    /// Lua truthiness: only nil and false are falsy
    #[inline(always)]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, LuaValue::Nil | LuaValue::Boolean(false))
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            LuaValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value, converting floats that hold an exact integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LuaValue::Integer(i) => Some(*i),
            LuaValue::Float(n) => float_to_integer(*n),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            LuaValue::Integer(i) => Some(*i as f64),
            LuaValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LuaValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&LuaTableRef> {
        match self {
            LuaValue::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Canonical key form: floats holding an exact integer become integers
    pub(crate) fn normalize_key(self) -> Self {
        match self {
            LuaValue::Float(n) => match float_to_integer(n) {
                Some(i) => LuaValue::Integer(i),
                None => LuaValue::Float(n),
            },
            other => other,
        }
    }
}

impl PartialEq for LuaValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LuaValue::Nil, LuaValue::Nil) => true,
            (LuaValue::Boolean(a), LuaValue::Boolean(b)) => a == b,
            (LuaValue::Integer(a), LuaValue::Integer(b)) => a == b,
            (LuaValue::Float(a), LuaValue::Float(b)) => a == b,
            (LuaValue::Integer(a), LuaValue::Float(b)) | (LuaValue::Float(b), LuaValue::Integer(a)) => {
                float_to_integer(*b) == Some(*a)
            }
            (LuaValue::String(a), LuaValue::String(b)) => a == b,
            (LuaValue::Table(a), LuaValue::Table(b)) => a.ptr_eq(b),
            (LuaValue::Function(a), LuaValue::Function(b)) => Rc::ptr_eq(a, b),
            (LuaValue::CFunction(a), LuaValue::CFunction(b)) => *a as usize == *b as usize,
            (LuaValue::Userdata(a), LuaValue::Userdata(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for LuaValue {}

impl Hash for LuaValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            LuaValue::Nil => 0u8.hash(state),
            LuaValue::Boolean(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            LuaValue::Integer(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            LuaValue::Float(n) => match float_to_integer(*n) {
                // must agree with the Integer arm since 2 == 2.0
                Some(i) => {
                    2u8.hash(state);
                    i.hash(state);
                }
                None => {
                    3u8.hash(state);
                    n.to_bits().hash(state);
                }
            },
            LuaValue::String(s) => {
                4u8.hash(state);
                s.hash(state);
            }
            LuaValue::Table(t) => {
                5u8.hash(state);
                t.as_ptr().hash(state);
            }
            LuaValue::Function(f) => {
                6u8.hash(state);
                Rc::as_ptr(f).hash(state);
            }
            LuaValue::CFunction(f) => {
                7u8.hash(state);
                (*f as usize).hash(state);
            }
            LuaValue::Userdata(u) => {
                8u8.hash(state);
                Rc::as_ptr(u).hash(state);
            }
        }
    }
}

impl fmt::Debug for LuaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuaValue::String(s) => write!(f, "{:?}", s),
            other => fmt::Display::fmt(other, f),
        }
    }
}

impl fmt::Display for LuaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuaValue::Nil => f.write_str("nil"),
            LuaValue::Boolean(b) => write!(f, "{}", b),
            LuaValue::Integer(i) => {
                let mut buffer = itoa::Buffer::new();
                f.write_str(buffer.format(*i))
            }
            LuaValue::Float(n) => {
                if n.is_nan() {
                    f.write_str(if n.is_sign_negative() { "-nan" } else { "nan" })
                } else if n.is_infinite() {
                    f.write_str(if *n > 0.0 { "inf" } else { "-inf" })
                } else if n.fract() == 0.0 && n.abs() < 1e16 {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            LuaValue::String(s) => f.write_str(s.as_str()),
            LuaValue::Table(t) => write!(f, "table: {:p}", t.as_ptr()),
            LuaValue::Function(func) => write!(f, "function: {:p}", Rc::as_ptr(func)),
            LuaValue::CFunction(func) => write!(f, "function: builtin: {:#x}", *func as usize),
            LuaValue::Userdata(u) => write!(f, "userdata: {:p}", Rc::as_ptr(u)),
        }
    }
}

impl From<bool> for LuaValue {
    fn from(b: bool) -> Self {
        LuaValue::Boolean(b)
    }
}

impl From<i64> for LuaValue {
    fn from(i: i64) -> Self {
        LuaValue::Integer(i)
    }
}

impl From<f64> for LuaValue {
    fn from(n: f64) -> Self {
        LuaValue::Float(n)
    }
}

impl From<&str> for LuaValue {
    fn from(s: &str) -> Self {
        LuaValue::string(s)
    }
}

impl From<String> for LuaValue {
    fn from(s: String) -> Self {
        LuaValue::String(LuaString::from(s))
    }
}

impl From<LuaString> for LuaValue {
    fn from(s: LuaString) -> Self {
        LuaValue::String(s)
    }
}

impl From<LuaTableRef> for LuaValue {
    fn from(t: LuaTableRef) -> Self {
        LuaValue::Table(t)
    }
}
