use crate::LuaValue;
use crate::lua_vm::lua_limits::LARGE_PADDING_WARN;
use tracing::debug;

/// Array segment: logical keys `1..=array.len()` stored at `0..array.len()`.
///
/// Slots may hold nil; holes never shrink the segment.
pub struct LuaValueArray {
    pub(crate) array: Vec<LuaValue>,
}

impl LuaValueArray {
    pub fn new(capacity: usize) -> Self {
        Self {
            array: Vec::with_capacity(capacity),
        }
    }

    /// Number of slots, holes included
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.array.len()
    }

    /// Value at 1-based `key`, nil when out of range
    #[inline(always)]
    pub fn get_int(&self, key: usize) -> LuaValue {
        match key.checked_sub(1).and_then(|index| self.array.get(index)) {
            Some(v) => v.clone(),
            None => LuaValue::Nil,
        }
    }

    /// Store at 1-based `key` (`key >= 1`), padding with nil when it lies
    /// past the end.
    pub fn set_int(&mut self, key: usize, value: LuaValue) {
        let index = key - 1;
        let alen = self.array.len();
        if index < alen {
            self.array[index] = value;
        } else {
            let gap = index - alen;
            if gap > LARGE_PADDING_WARN {
                debug!(key, gap, "padding array segment with nil");
            }
            self.array.resize(index, LuaValue::Nil);
            self.array.push(value);
        }
    }

    #[inline]
    pub fn push(&mut self, value: LuaValue) {
        self.array.push(value);
    }

    /// Insert at 1-based `pos` in `1..=size()`, shifting later slots right
    pub fn insert_at(&mut self, pos: usize, value: LuaValue) {
        self.array.insert(pos - 1, value);
    }

    /// Remove at 1-based `pos`.
    ///
    /// Positions past the end remove nothing. The last position and any
    /// position `<= 0` pop the final slot, the way `table.remove(t)` does.
    pub fn remove(&mut self, pos: i64) -> LuaValue {
        let alen = self.array.len() as i64;
        if pos > alen {
            return LuaValue::Nil;
        }
        if pos == alen || pos <= 0 {
            return self.array.pop().unwrap_or_default();
        }
        self.array.remove((pos - 1) as usize)
    }

    /// A border: scanning backward, the first non-nil slot whose successor is
    /// nil (or the end of the segment). Holes below it are not inspected.
    pub fn border(&self) -> usize {
        let mut prev_is_nil = true;
        for (i, v) in self.array.iter().enumerate().rev() {
            if prev_is_nil && !v.is_nil() {
                return i + 1;
            }
            prev_is_nil = v.is_nil();
        }
        0
    }

    /// Highest populated 1-based index, 0 when every slot is nil
    pub fn max_n(&self) -> usize {
        self.array
            .iter()
            .rposition(|v| !v.is_nil())
            .map_or(0, |i| i + 1)
    }
}
