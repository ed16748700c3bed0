use crate::lua_vm::lua_limits::{DEFAULT_ARRAY_CAPACITY, DEFAULT_HASH_CAPACITY, MAX_ARRAY_INDEX};

#[derive(Debug, Clone)]
pub struct TableOption {
    /// Exclusive upper bound for keys routed into the array segment
    pub max_array_index: usize,
    pub initial_array_capacity: usize,
    pub initial_hash_capacity: usize,
}

impl Default for TableOption {
    fn default() -> Self {
        Self {
            max_array_index: MAX_ARRAY_INDEX,
            initial_array_capacity: DEFAULT_ARRAY_CAPACITY,
            initial_hash_capacity: DEFAULT_HASH_CAPACITY,
        }
    }
}
