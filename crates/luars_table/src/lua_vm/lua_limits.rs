//! Table limits and default sizing constants.
//!
//! All magic numbers that control table layout are collected here.

/// Integer keys at or above this bound never enter the array segment.
/// A single huge key would otherwise force an equally huge allocation.
pub const MAX_ARRAY_INDEX: usize = 67_108_864;

/// Default capacity reserved for the array segment of a fresh table.
pub const DEFAULT_ARRAY_CAPACITY: usize = 0;

/// Default capacity reserved for each hash segment of a fresh table.
pub const DEFAULT_HASH_CAPACITY: usize = 0;

/// Padding runs longer than this are reported at debug level.
pub const LARGE_PADDING_WARN: usize = 4096;

/// Slices at or below this length are sorted by insertion sort.
pub const SORT_INSERTION_THRESHOLD: usize = 12;

/// Maximum nesting of native calls made through `NativeCaller`.
pub const MAX_CALL_DEPTH: usize = 200;

/// Upper bound on the values `table.unpack` may produce in one call.
pub const MAX_UNPACK_RESULTS: i64 = 1_000_000;
