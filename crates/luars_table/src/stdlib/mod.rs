// Builtins layered over the table core
pub mod sort_table;
pub mod table;

pub use sort_table::{LuaValueSorter, SortInterface, sort, sort_values, table_sort};
pub use table::create_table_lib;
