// Traversal: visit-all and the resumable `next` protocol
use super::{KeyRoute, LuaTable, route_key};
use crate::LuaValue;
use crate::lua_vm::{LuaError, LuaResult};
use ahash::RandomState;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Snapshot of the hash segments' keys, taken when a traversal leaves the
/// array segment. `k2i` maps each key back to its position in `keys`.
pub(crate) struct TableCursor {
    keys: Vec<LuaValue>,
    k2i: HashMap<LuaValue, usize, RandomState>,
    version: u64,
}

impl TableCursor {
    fn position(&self, key: &LuaValue) -> Option<usize> {
        self.k2i.get(key).copied()
    }

    /// Every key the snapshot holds a reference to
    pub(crate) fn references(&self) -> impl Iterator<Item = &LuaValue> {
        self.keys.iter().chain(self.k2i.keys())
    }
}

impl LuaTable {
    /// Step a traversal: return the entry after `key`, or `None` once every
    /// entry has been produced.
    ///
    /// `key` must be nil (restart) or the key this method returned last for
    /// the same traversal. Keys cleared to nil mid-traversal are skipped.
    /// Adding keys mid-traversal forces a snapshot rebuild, after which the
    /// remaining order is unspecified.
    pub fn next(&mut self, key: &LuaValue) -> LuaResult<Option<(LuaValue, LuaValue)>> {
        let start = if key.is_nil() {
            self.cursor = None;
            0
        } else if let Some(pos) = self.array_position(key) {
            pos
        } else {
            return self.next_in_hash(key);
        };

        let array = &self.array.array;
        if let Some(index) = (start..array.len()).find(|&i| !array[i].is_nil()) {
            return Ok(Some((
                LuaValue::Integer(index as i64 + 1),
                array[index].clone(),
            )));
        }

        if self.hash.is_empty() {
            self.cursor = None;
            return Ok(None);
        }
        self.build_cursor();
        Ok(self.yield_from(0))
    }

    /// 1-based position to resume the array scan from when `key` is
    /// array-eligible. Such keys never live in the hash segments, so one past
    /// a shrunk array (the caller popped it) resumes at the array's end.
    fn array_position(&self, key: &LuaValue) -> Option<usize> {
        match route_key(key, self.max_array_index) {
            KeyRoute::Array(i) => Some(i.min(self.array.size())),
            _ => None,
        }
    }

    fn next_in_hash(&mut self, key: &LuaValue) -> LuaResult<Option<(LuaValue, LuaValue)>> {
        let version = self.hash.version();
        let stale = self.cursor.as_ref().is_none_or(|c| c.version != version);
        if stale {
            debug!(version, "table changed during traversal, rebuilding cursor");
            self.build_cursor();
        }

        let position = self.cursor.as_ref().and_then(|c| c.position(key));
        match position {
            Some(pos) => Ok(self.yield_from(pos + 1)),
            None => {
                self.cursor = None;
                Err(LuaError::InvalidNextKey)
            }
        }
    }

    fn build_cursor(&mut self) {
        let keys = self.hash.keys();
        let mut k2i = HashMap::with_capacity_and_hasher(keys.len(), RandomState::new());
        for (i, k) in keys.iter().enumerate() {
            k2i.insert(k.clone(), i);
        }
        trace!(keys = keys.len(), "materialized traversal cursor");
        self.cursor = Some(TableCursor {
            keys,
            k2i,
            version: self.hash.version(),
        });
    }

    /// First live entry at or after `start` in the snapshot
    fn yield_from(&mut self, start: usize) -> Option<(LuaValue, LuaValue)> {
        let cursor = self.cursor.as_ref()?;
        for key in cursor.keys.iter().skip(start) {
            let value = self.hash.get(key);
            if !value.is_nil() {
                return Some((key.clone(), value));
            }
        }
        self.cursor = None;
        None
    }

    /// Call `f` for every entry: array slots in index order (holes skipped),
    /// then the string segment, then the general segment.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&LuaValue, &LuaValue),
    {
        for (k, v) in self.pairs() {
            f(&k, &v);
        }
    }

    /// Iterator over all entries, in `for_each` order
    pub fn pairs(&self) -> Pairs<'_> {
        Pairs {
            table: self,
            array_index: 0,
            str_iter: None,
            general_iter: None,
        }
    }
}

type StrIter<'a> = std::collections::hash_map::Iter<'a, crate::lua_value::LuaString, LuaValue>;
type GeneralIter<'a> = std::collections::hash_map::Iter<'a, LuaValue, LuaValue>;

pub struct Pairs<'a> {
    table: &'a LuaTable,
    array_index: usize,
    str_iter: Option<StrIter<'a>>,
    general_iter: Option<GeneralIter<'a>>,
}

impl Iterator for Pairs<'_> {
    type Item = (LuaValue, LuaValue);

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        let array = &table.array.array;
        while self.array_index < array.len() {
            let index = self.array_index;
            self.array_index += 1;
            if !array[index].is_nil() {
                return Some((LuaValue::Integer(index as i64 + 1), array[index].clone()));
            }
        }

        let str_iter = self
            .str_iter
            .get_or_insert_with(|| table.hash.iter_str());
        if let Some((k, v)) = str_iter.next() {
            return Some((LuaValue::String(k.clone()), v.clone()));
        }

        let general_iter = self
            .general_iter
            .get_or_insert_with(|| table.hash.iter_general());
        general_iter.next().map(|(k, v)| (k.clone(), v.clone()))
    }
}
