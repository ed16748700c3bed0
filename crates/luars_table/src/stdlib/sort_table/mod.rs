use crate::lua_vm::lua_limits::SORT_INSERTION_THRESHOLD;
use crate::lua_vm::{LuaCaller, LuaError, LuaResult};
use crate::{LuaTableRef, LuaValue};
use tracing::debug;

/// What a comparison sort needs from the sequence it orders.
///
/// `less` may call back into the interpreter and therefore fail; a failure
/// aborts the sort and leaves the sequence partially ordered.
pub trait SortInterface {
    fn len(&self) -> usize;

    fn swap(&mut self, i: usize, j: usize);

    fn less(&mut self, i: usize, j: usize) -> LuaResult<bool>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sort adapter over a slice of values with an optional user comparator
pub struct LuaValueSorter<'a> {
    caller: &'a mut dyn LuaCaller,
    comparator: Option<&'a LuaValue>,
    values: &'a mut [LuaValue],
}

impl<'a> LuaValueSorter<'a> {
    pub fn new(
        caller: &'a mut dyn LuaCaller,
        values: &'a mut [LuaValue],
        comparator: Option<&'a LuaValue>,
    ) -> Self {
        Self {
            caller,
            comparator,
            values,
        }
    }
}

impl SortInterface for LuaValueSorter<'_> {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.values.swap(i, j);
    }

    fn less(&mut self, i: usize, j: usize) -> LuaResult<bool> {
        let (a, b) = (&self.values[i], &self.values[j]);
        match self.comparator {
            Some(comp) => {
                let results = self
                    .caller
                    .call(comp, &[a.clone(), b.clone()])
                    .map_err(|e| {
                        debug!(error = %e, "sort comparator failed");
                        LuaError::ComparatorFailure(Box::new(e))
                    })?;
                Ok(results.first().is_some_and(LuaValue::is_truthy))
            }
            None => self.caller.less_than(a, b),
        }
    }
}

/// Sort `values` in place with `comparator`, or the caller's default order.
pub fn sort_values(
    caller: &mut dyn LuaCaller,
    values: &mut [LuaValue],
    comparator: Option<&LuaValue>,
) -> LuaResult<()> {
    let mut sorter = LuaValueSorter::new(caller, values, comparator);
    sort(&mut sorter)
}

/// Sort the array segment of `table`.
///
/// The segment is copied out before sorting and written back afterwards,
/// so a comparator may read or modify `table` without a borrow conflict;
/// its modifications to the array segment are overwritten. On error the
/// partially sorted copy is still written back.
pub fn table_sort(
    caller: &mut dyn LuaCaller,
    table: &LuaTableRef,
    comparator: Option<&LuaValue>,
) -> LuaResult<()> {
    let mut values = table.borrow().array_values().to_vec();
    if values.len() < 2 {
        return Ok(());
    }
    let result = sort_values(caller, &mut values, comparator);
    table.borrow_mut().set_array_values(values);
    result
}

/// Unstable comparison sort over any `SortInterface`.
///
/// Introsort: quicksort with a median-of-three pivot, heapsort once the
/// recursion budget runs out, insertion sort for short ranges. Every scan is
/// bounded by range indices, so an inconsistent `less` still terminates.
pub fn sort<S: SortInterface + ?Sized>(data: &mut S) -> LuaResult<()> {
    let n = data.len();
    if n < 2 {
        return Ok(());
    }
    let max_depth = 2 * (usize::BITS - n.leading_zeros()) as usize;
    quick_sort(data, 0, n, max_depth)
}

fn quick_sort<S: SortInterface + ?Sized>(
    data: &mut S,
    mut a: usize,
    mut b: usize,
    mut depth: usize,
) -> LuaResult<()> {
    while b - a > SORT_INSERTION_THRESHOLD {
        if depth == 0 {
            return heap_sort(data, a, b);
        }
        depth -= 1;
        let p = partition(data, a, b)?;
        // recurse into the smaller side, loop on the larger
        if p - a < b - p - 1 {
            quick_sort(data, a, p, depth)?;
            a = p + 1;
        } else {
            quick_sort(data, p + 1, b, depth)?;
            b = p;
        }
    }
    if b - a > 1 {
        insertion_sort(data, a, b)?;
    }
    Ok(())
}

/// Partition `[a, b)` around a median-of-three pivot; returns its final slot
fn partition<S: SortInterface + ?Sized>(data: &mut S, a: usize, b: usize) -> LuaResult<usize> {
    let last = b - 1;
    let mid = a + (b - a) / 2;
    median_of_three(data, a, mid, last)?;
    data.swap(mid, last);

    let mut store = a;
    for i in a..last {
        if data.less(i, last)? {
            data.swap(i, store);
            store += 1;
        }
    }
    data.swap(store, last);
    Ok(store)
}

/// Order slots `a`, `m`, `c` so the median lands in `m`
fn median_of_three<S: SortInterface + ?Sized>(
    data: &mut S,
    a: usize,
    m: usize,
    c: usize,
) -> LuaResult<()> {
    if data.less(m, a)? {
        data.swap(m, a);
    }
    if data.less(c, m)? {
        data.swap(c, m);
        if data.less(m, a)? {
            data.swap(m, a);
        }
    }
    Ok(())
}

fn insertion_sort<S: SortInterface + ?Sized>(data: &mut S, a: usize, b: usize) -> LuaResult<()> {
    for i in a + 1..b {
        let mut j = i;
        while j > a && data.less(j, j - 1)? {
            data.swap(j, j - 1);
            j -= 1;
        }
    }
    Ok(())
}

fn heap_sort<S: SortInterface + ?Sized>(data: &mut S, a: usize, b: usize) -> LuaResult<()> {
    let n = b - a;
    for root in (0..n / 2).rev() {
        sift_down(data, root, n, a)?;
    }
    for end in (1..n).rev() {
        data.swap(a, a + end);
        sift_down(data, 0, end, a)?;
    }
    Ok(())
}

/// Restore the max-heap property below `root` within `[first, first + hi)`
fn sift_down<S: SortInterface + ?Sized>(
    data: &mut S,
    mut root: usize,
    hi: usize,
    first: usize,
) -> LuaResult<()> {
    loop {
        let mut child = 2 * root + 1;
        if child >= hi {
            return Ok(());
        }
        if child + 1 < hi && data.less(first + child, first + child + 1)? {
            child += 1;
        }
        if !data.less(first + root, first + child)? {
            return Ok(());
        }
        data.swap(first + root, first + child);
        root = child;
    }
}
