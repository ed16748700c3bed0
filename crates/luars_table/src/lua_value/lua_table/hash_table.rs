use crate::LuaValue;
use crate::lua_value::LuaString;
use ahash::RandomState;
use std::collections::{HashMap, hash_map};

/// The two hash segments of a table.
///
/// String keys live in `strdict`, every other non-array key in `dict`.
/// Neither map ever holds a nil value: storing nil removes the key.
pub struct LuaHashTable {
    strdict: HashMap<LuaString, LuaValue, RandomState>,
    dict: HashMap<LuaValue, LuaValue, RandomState>,
    /// Bumped whenever a new key is added; cursors compare against it
    version: u64,
}

impl LuaHashTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            strdict: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            dict: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            version: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strdict.len() + self.dict.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strdict.is_empty() && self.dict.is_empty()
    }

    #[inline(always)]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn get_str(&self, key: &str) -> LuaValue {
        self.strdict.get(key).cloned().unwrap_or_default()
    }

    /// Lookup in whichever map owns the key
    pub fn get(&self, key: &LuaValue) -> LuaValue {
        let found = match key {
            LuaValue::String(s) => self.strdict.get(s.as_str()),
            other => self.dict.get(other),
        };
        found.cloned().unwrap_or_default()
    }

    pub fn set_str(&mut self, key: LuaString, value: LuaValue) {
        if value.is_nil() {
            self.strdict.remove(key.as_str());
        } else if self.strdict.insert(key, value).is_none() {
            self.version = self.version.wrapping_add(1);
        }
    }

    /// `key` must already be normalized and valid
    pub fn set(&mut self, key: LuaValue, value: LuaValue) {
        match key {
            LuaValue::String(s) => self.set_str(s, value),
            key => {
                if value.is_nil() {
                    self.dict.remove(&key);
                } else if self.dict.insert(key, value).is_none() {
                    self.version = self.version.wrapping_add(1);
                }
            }
        }
    }

    pub fn iter_str(&self) -> hash_map::Iter<'_, LuaString, LuaValue> {
        self.strdict.iter()
    }

    pub fn iter_general(&self) -> hash_map::Iter<'_, LuaValue, LuaValue> {
        self.dict.iter()
    }

    /// All keys, string segment first
    pub fn keys(&self) -> Vec<LuaValue> {
        let mut keys = Vec::with_capacity(self.len());
        keys.extend(self.strdict.keys().cloned().map(LuaValue::String));
        keys.extend(self.dict.keys().cloned());
        keys
    }
}
