// Cycle collector for reference-counted tables
//
// Tables are shared through `Rc`, which frees acyclic garbage on its own but
// leaks cycles (`t.self = t`, parent <-> child links, metatable loops).
// `TableCollector` tracks the tables it creates and reclaims unreachable
// cycles by trial deletion:
// - gc_refs: strong count of each tracked table minus references held by
//   other tracked tables
// - roots: tables with gc_refs > 0 are referenced from outside the tracked
//   set (stack, host, untraced userdata) or are currently borrowed
// - mark: everything reachable from a root survives
// - clear: the remaining tables are emptied, which breaks their cycles and
//   lets `Rc` free them
use crate::lua_value::{LuaTable, LuaTableRef, LuaValue};
use crate::lua_vm::TableOption;
use ahash::RandomState;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;
use tracing::debug;

pub struct TableCollector {
    tracked: Vec<Weak<RefCell<LuaTable>>>,
    option: TableOption,
}

impl TableCollector {
    pub fn new() -> Self {
        Self::with_option(TableOption::default())
    }

    pub fn with_option(option: TableOption) -> Self {
        Self {
            tracked: Vec::new(),
            option,
        }
    }

    /// Create a table configured by this collector's option and track it
    pub fn create_table(&mut self) -> LuaTableRef {
        let table = LuaTableRef::new(LuaTable::with_option(&self.option));
        self.track(&table);
        table
    }

    pub fn track(&mut self, table: &LuaTableRef) {
        self.tracked.push(table.downgrade());
    }

    /// Tracked tables that are still alive
    pub fn live_count(&self) -> usize {
        self.tracked.iter().filter(|w| w.strong_count() > 0).count()
    }

    /// Reclaim tables only kept alive by cycles among tracked tables.
    /// Returns how many tables were cleared.
    pub fn collect(&mut self) -> usize {
        self.tracked.retain(|w| w.strong_count() > 0);

        let mut tables: Vec<LuaTableRef> = Vec::with_capacity(self.tracked.len());
        let mut index: HashMap<*const RefCell<LuaTable>, usize, RandomState> =
            HashMap::with_capacity_and_hasher(self.tracked.len(), RandomState::new());
        for weak in &self.tracked {
            if let Some(table) = LuaTableRef::upgrade(weak) {
                if !index.contains_key(&table.as_ptr()) {
                    index.insert(table.as_ptr(), tables.len());
                    tables.push(table);
                }
            }
        }

        // one strong reference per table is our own `tables` entry
        let mut gc_refs: Vec<isize> = tables
            .iter()
            .map(|t| t.strong_count() as isize - 1)
            .collect();
        let mut edges: Vec<Vec<usize>> = vec![Vec::new(); tables.len()];
        let mut pinned = vec![false; tables.len()];

        for (i, table) in tables.iter().enumerate() {
            match table.inner().try_borrow() {
                Ok(t) => t.trace(|v| {
                    if let LuaValue::Table(child) = v {
                        if let Some(&j) = index.get(&child.as_ptr()) {
                            gc_refs[j] -= 1;
                            edges[i].push(j);
                        }
                    }
                }),
                Err(_) => pinned[i] = true,
            }
        }

        let mut reachable = vec![false; tables.len()];
        let mut stack: Vec<usize> = (0..tables.len())
            .filter(|&i| gc_refs[i] > 0 || pinned[i])
            .collect();
        for &i in &stack {
            reachable[i] = true;
        }
        while let Some(i) = stack.pop() {
            for &j in &edges[i] {
                if !reachable[j] {
                    reachable[j] = true;
                    stack.push(j);
                }
            }
        }

        // Take every garbage table's contents before dropping any of them,
        // so no drop runs while another garbage table is borrowed.
        let mut contents = Vec::new();
        for (i, table) in tables.iter().enumerate() {
            if !reachable[i] {
                if let Ok(mut t) = table.inner().try_borrow_mut() {
                    contents.push(t.take_contents());
                }
            }
        }
        let cleared = contents.len();
        drop(contents);
        drop(tables);

        self.tracked.retain(|w| w.strong_count() > 0);
        debug!(
            cleared,
            live = self.tracked.len(),
            "table cycle collection finished"
        );
        cleared
    }
}

impl Default for TableCollector {
    fn default() -> Self {
        Self::new()
    }
}
