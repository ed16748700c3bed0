// LuaTable - hybrid array/hash storage
// - array segment for integer keys 1..n
// - string segment and general segment for everything else
mod hash_table;
mod table_iter;
mod value_array;

use crate::LuaValue;
use crate::lua_value::LuaString;
use crate::lua_value::lua_table::{hash_table::LuaHashTable, value_array::LuaValueArray};
use crate::lua_vm::{LuaError, LuaResult, TableOption};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

pub(crate) use table_iter::TableCursor;
pub use table_iter::Pairs;

/// Which segment a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyRoute {
    /// 1-based slot of the array segment
    Array(usize),
    Hash,
    Invalid(&'static str),
}

/// Route a key. Strings and every non-array key go to the hash segments,
/// which split them further by tag.
#[inline]
pub(crate) fn route_key(key: &LuaValue, max_array_index: usize) -> KeyRoute {
    let index = match key {
        LuaValue::Integer(i) => *i,
        LuaValue::Float(n) => {
            if n.is_nan() {
                return KeyRoute::Invalid("NaN");
            }
            match key.as_integer() {
                Some(i) => i,
                None => return KeyRoute::Hash,
            }
        }
        LuaValue::Nil => return KeyRoute::Invalid("nil"),
        _ => return KeyRoute::Hash,
    };
    if index >= 1 && (index as u64) < (max_array_index as u64) {
        KeyRoute::Array(index as usize)
    } else {
        KeyRoute::Hash
    }
}

pub struct LuaTable {
    array: LuaValueArray,
    hash: LuaHashTable,
    cursor: Option<TableCursor>,
    meta: Option<LuaTableRef>,
    max_array_index: usize,
}

impl LuaTable {
    /// Create a table with pre-sized segments
    pub fn new(asize: usize, hsize: usize) -> Self {
        Self::with_option(&TableOption {
            initial_array_capacity: asize,
            initial_hash_capacity: hsize,
            ..TableOption::default()
        })
    }

    pub fn with_option(option: &TableOption) -> Self {
        Self {
            array: LuaValueArray::new(option.initial_array_capacity),
            hash: LuaHashTable::new(option.initial_hash_capacity),
            cursor: None,
            meta: None,
            max_array_index: option.max_array_index,
        }
    }

    #[inline]
    pub fn max_array_index(&self) -> usize {
        self.max_array_index
    }

    pub fn get_metatable(&self) -> Option<LuaTableRef> {
        self.meta.clone()
    }

    pub fn set_metatable(&mut self, metatable: Option<LuaTableRef>) {
        self.meta = metatable;
    }

    /// Slots in the array segment, holes included
    #[inline]
    pub fn array_len(&self) -> usize {
        self.array.size()
    }

    /// Live entries in the two hash segments
    #[inline]
    pub fn hash_len(&self) -> usize {
        self.hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.max_n() == 0 && self.hash.is_empty()
    }

    /// Length as the `#` operator sees it: one border of the array segment.
    /// With holes this need not be the highest populated index; see
    /// [`LuaTable::max_index`] for that.
    pub fn len(&self) -> usize {
        self.array.border()
    }

    /// Highest populated index of the array segment, 0 if none
    pub fn max_index(&self) -> usize {
        self.array.max_n()
    }

    pub fn raw_get(&self, key: &LuaValue) -> LuaValue {
        match route_key(key, self.max_array_index) {
            KeyRoute::Array(index) => self.array.get_int(index),
            KeyRoute::Hash => self.hash.get(key),
            KeyRoute::Invalid(_) => LuaValue::Nil,
        }
    }

    /// Store `value` under `key`; nil deletes hash entries and leaves holes
    /// in the array segment. Array keys past the end pad the segment with
    /// nil up to the key, so a far key costs memory proportional to it.
    pub fn raw_set(&mut self, key: LuaValue, value: LuaValue) -> LuaResult<()> {
        match route_key(&key, self.max_array_index) {
            KeyRoute::Array(index) => self.array.set_int(index, value),
            KeyRoute::Hash => self.hash.set(key.normalize_key(), value),
            KeyRoute::Invalid(what) => return Err(LuaError::InvalidKey(what)),
        }
        Ok(())
    }

    #[inline]
    pub fn raw_get_int(&self, key: i64) -> LuaValue {
        if key >= 1 && (key as u64) < (self.max_array_index as u64) {
            self.array.get_int(key as usize)
        } else {
            self.hash.get(&LuaValue::Integer(key))
        }
    }

    pub fn raw_set_int(&mut self, key: i64, value: LuaValue) {
        if key >= 1 && (key as u64) < (self.max_array_index as u64) {
            self.array.set_int(key as usize, value);
        } else {
            self.hash.set(LuaValue::Integer(key), value);
        }
    }

    #[inline]
    pub fn raw_get_str(&self, key: &str) -> LuaValue {
        self.hash.get_str(key)
    }

    pub fn raw_set_str(&mut self, key: impl Into<LuaString>, value: LuaValue) {
        self.hash.set_str(key.into(), value);
    }

    /// Lookup for keys expected outside the array segment. Array-eligible
    /// integer keys still read their array slot.
    pub fn raw_get_h(&self, key: &LuaValue) -> LuaValue {
        match route_key(key, self.max_array_index) {
            KeyRoute::Array(index) => self.array.get_int(index),
            _ => self.hash.get(key),
        }
    }

    /// Store for keys expected outside the array segment. An array-eligible
    /// integer key is stored in its array slot so every key keeps a single
    /// home.
    pub fn raw_set_h(&mut self, key: LuaValue, value: LuaValue) -> LuaResult<()> {
        match route_key(&key, self.max_array_index) {
            KeyRoute::Array(index) => self.array.set_int(index, value),
            KeyRoute::Hash => self.hash.set(key.normalize_key(), value),
            KeyRoute::Invalid(what) => return Err(LuaError::InvalidKey(what)),
        }
        Ok(())
    }

    /// Push onto the end of the array segment
    #[inline]
    pub fn append(&mut self, value: LuaValue) {
        self.array.push(value);
    }

    /// Insert at `pos`, shifting `pos..` up by one.
    ///
    /// Positions past the end behave like a plain store at `pos`; positions
    /// `<= 0` are stored under that numeric key outside the array segment.
    pub fn insert(&mut self, pos: i64, value: LuaValue) {
        let alen = self.array.size() as i64;
        if pos > alen || pos <= 0 {
            self.raw_set_int(pos, value);
        } else {
            self.array.insert_at(pos as usize, value);
        }
    }

    /// Remove at `pos`, shifting later elements down.
    ///
    /// Positions past the end remove nothing and return nil. The last
    /// position and positions `<= 0` pop the final element.
    pub fn remove(&mut self, pos: i64) -> LuaValue {
        self.array.remove(pos)
    }

    pub(crate) fn array_values(&self) -> &[LuaValue] {
        &self.array.array
    }

    pub(crate) fn set_array_values(&mut self, values: Vec<LuaValue>) {
        self.array.array = values;
    }

    /// Visit every value this table keeps alive: stored keys and values, the
    /// metatable and any keys held by a traversal cursor.
    pub(crate) fn trace<F>(&self, mut visit: F)
    where
        F: FnMut(&LuaValue),
    {
        for v in &self.array.array {
            visit(v);
        }
        for (_, v) in self.hash.iter_str() {
            visit(v);
        }
        for (k, v) in self.hash.iter_general() {
            visit(k);
            visit(v);
        }
        if let Some(cursor) = &self.cursor {
            for k in cursor.references() {
                visit(k);
            }
        }
        if let Some(meta) = &self.meta {
            visit(&LuaValue::Table(meta.clone()));
        }
    }

    /// Empty the table, handing back the old contents so the caller decides
    /// when they are dropped.
    pub(crate) fn take_contents(&mut self) -> LuaTable {
        let empty = LuaTable::with_option(&TableOption {
            max_array_index: self.max_array_index,
            ..TableOption::default()
        });
        std::mem::replace(self, empty)
    }
}

impl Default for LuaTable {
    fn default() -> Self {
        Self::with_option(&TableOption::default())
    }
}

/// Shared, reference-identity handle to a table
#[derive(Clone)]
pub struct LuaTableRef(Rc<RefCell<LuaTable>>);

impl LuaTableRef {
    pub fn new(table: LuaTable) -> Self {
        LuaTableRef(Rc::new(RefCell::new(table)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, LuaTable> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, LuaTable> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &LuaTableRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn as_ptr(&self) -> *const RefCell<LuaTable> {
        Rc::as_ptr(&self.0)
    }

    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    pub fn downgrade(&self) -> Weak<RefCell<LuaTable>> {
        Rc::downgrade(&self.0)
    }

    pub fn upgrade(weak: &Weak<RefCell<LuaTable>>) -> Option<Self> {
        weak.upgrade().map(LuaTableRef)
    }

    pub(crate) fn inner(&self) -> &RefCell<LuaTable> {
        &self.0
    }

    pub fn get(&self, key: &LuaValue) -> LuaValue {
        self.borrow().raw_get(key)
    }

    pub fn set(&self, key: LuaValue, value: LuaValue) -> LuaResult<()> {
        self.borrow_mut().raw_set(key, value)
    }

    pub fn len(&self) -> usize {
        self.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.borrow().is_empty()
    }

    pub fn next(&self, key: &LuaValue) -> LuaResult<Option<(LuaValue, LuaValue)>> {
        self.borrow_mut().next(key)
    }

    /// Like [`LuaTable::for_each`], but over a copy of the entries taken up
    /// front, so `f` may read or modify this same table.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&LuaValue, &LuaValue),
    {
        let entries: Vec<(LuaValue, LuaValue)> = self.borrow().pairs().collect();
        for (k, v) in &entries {
            f(k, v);
        }
    }
}

impl Default for LuaTableRef {
    fn default() -> Self {
        LuaTableRef::new(LuaTable::default())
    }
}

impl fmt::Debug for LuaTableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table: {:p}", self.as_ptr())
    }
}
