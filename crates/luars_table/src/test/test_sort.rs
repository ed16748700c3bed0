// Tests for the sort adapter and the caller boundary
use super::{int, s};
use crate::lua_value::LuaFunction;
use crate::stdlib::{SortInterface, sort, sort_values, table_sort};
use crate::*;

fn greater(_: &mut dyn LuaCaller, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let a = args[0].as_number().unwrap_or_default();
    let b = args[1].as_number().unwrap_or_default();
    Ok(MultiValue::single(LuaValue::boolean(a > b)))
}

fn always_true(_: &mut dyn LuaCaller, _: &[LuaValue]) -> LuaResult<MultiValue> {
    Ok(MultiValue::single(LuaValue::boolean(true)))
}

fn no_results(_: &mut dyn LuaCaller, _: &[LuaValue]) -> LuaResult<MultiValue> {
    Ok(MultiValue::empty())
}

fn failing(_: &mut dyn LuaCaller, _: &[LuaValue]) -> LuaResult<MultiValue> {
    Err(LuaError::runtime("boom"))
}

fn recurse(caller: &mut dyn LuaCaller, _: &[LuaValue]) -> LuaResult<MultiValue> {
    caller.call(&LuaValue::cfunction(recurse), &[])
}

/// Deterministic pseudo-random integers
fn scrambled(n: usize) -> Vec<LuaValue> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            int((state >> 33) as i64 % 1000)
        })
        .collect()
}

fn integers(values: &[LuaValue]) -> Vec<i64> {
    values.iter().map(|v| v.as_integer().unwrap()).collect()
}

fn array_table(values: Vec<LuaValue>) -> LuaTableRef {
    let t = LuaTableRef::default();
    for v in values {
        t.borrow_mut().append(v);
    }
    t
}

#[test]
fn test_sort_default_order() {
    let t = array_table(vec![int(3), int(1), int(2)]);
    let mut caller = NativeCaller::new();
    table_sort(&mut caller, &t, None).unwrap();
    assert_eq!(integers(t.borrow().array_values()), vec![1, 2, 3]);
}

#[test]
fn test_sort_mixed_numbers_and_strings() {
    let mut values = vec![LuaValue::float(2.5), int(1), LuaValue::float(-3.0), int(2)];
    let mut caller = NativeCaller::new();
    sort_values(&mut caller, &mut values, None).unwrap();
    assert_eq!(
        values,
        vec![LuaValue::float(-3.0), int(1), int(2), LuaValue::float(2.5)]
    );

    let mut words = vec![s("pear"), s("apple"), s("Zoo"), s("fig")];
    sort_values(&mut caller, &mut words, None).unwrap();
    assert_eq!(words, vec![s("Zoo"), s("apple"), s("fig"), s("pear")]);
}

#[test]
fn test_default_order_is_exact_across_number_kinds() {
    let two_53 = 1i64 << 53;
    let f = LuaValue::float(two_53 as f64);
    let mut caller = NativeCaller::new();
    assert!(caller.less_than(&f, &int(two_53 + 1)).unwrap());
    assert!(!caller.less_than(&int(two_53 + 1), &f).unwrap());
    assert!(!caller.less_than(&f, &int(two_53)).unwrap());
    assert!(caller.less_than(&int(1), &LuaValue::float(1.5)).unwrap());
    assert!(caller.less_than(&LuaValue::float(-1.5), &int(-1)).unwrap());
    assert!(caller.less_than(&int(i64::MAX), &LuaValue::float(f64::INFINITY)).unwrap());
    assert!(!caller.less_than(&int(0), &LuaValue::float(f64::NAN)).unwrap());
    assert!(!caller.less_than(&LuaValue::float(f64::NAN), &int(0)).unwrap());
}

#[test]
fn test_sort_large_input() {
    let original = scrambled(500);
    let mut expected = integers(&original);
    expected.sort();

    let mut values = original.clone();
    let mut caller = NativeCaller::new();
    sort_values(&mut caller, &mut values, None).unwrap();
    assert_eq!(integers(&values), expected);

    let comp = LuaValue::cfunction(greater);
    let mut values = original;
    sort_values(&mut caller, &mut values, Some(&comp)).unwrap();
    expected.reverse();
    assert_eq!(integers(&values), expected);
}

#[test]
fn test_sort_already_sorted_and_reversed() {
    let mut caller = NativeCaller::new();
    let mut ascending: Vec<LuaValue> = (0..200).map(int).collect();
    sort_values(&mut caller, &mut ascending, None).unwrap();
    assert_eq!(integers(&ascending), (0..200).collect::<Vec<_>>());

    let mut descending: Vec<LuaValue> = (0..200).rev().map(int).collect();
    sort_values(&mut caller, &mut descending, None).unwrap();
    assert_eq!(integers(&descending), (0..200).collect::<Vec<_>>());
}

#[test]
fn test_inconsistent_comparator_terminates() {
    let mut caller = NativeCaller::new();
    for comp in [LuaValue::cfunction(always_true), LuaValue::cfunction(no_results)] {
        let original = scrambled(1000);
        let mut values = original.clone();
        sort_values(&mut caller, &mut values, Some(&comp)).unwrap();

        // still a permutation of the input
        let mut got = integers(&values);
        let mut want = integers(&original);
        got.sort();
        want.sort();
        assert_eq!(got, want);
    }
}

#[test]
fn test_comparator_failure_propagates() {
    let t = array_table(vec![int(3), int(1), int(2)]);
    let mut caller = NativeCaller::new();
    let comp = LuaValue::cfunction(failing);
    let err = table_sort(&mut caller, &t, Some(&comp)).unwrap_err();
    assert_eq!(
        err,
        LuaError::ComparatorFailure(Box::new(LuaError::runtime("boom")))
    );
    // nothing was lost
    assert_eq!(t.borrow().array_len(), 3);
}

#[test]
fn test_default_order_rejects_mixed_types() {
    let t = array_table(vec![int(1), s("x"), int(2)]);
    let mut caller = NativeCaller::new();
    let err = table_sort(&mut caller, &t, None).unwrap_err();
    assert!(matches!(err, LuaError::CompareError(_, _)));
}

#[test]
fn test_sort_short_arrays() {
    let mut caller = NativeCaller::new();
    // a single non-comparable value needs no comparison
    let t = array_table(vec![LuaValue::boolean(true)]);
    table_sort(&mut caller, &t, None).unwrap();

    let t = LuaTableRef::default();
    table_sort(&mut caller, &t, None).unwrap();
    assert_eq!(t.borrow().array_len(), 0);
}

#[test]
fn test_script_comparator_needs_an_interpreter() {
    let t = array_table(vec![int(2), int(1)]);
    let mut caller = NativeCaller::new();
    let comp = LuaValue::function(LuaFunction::new(7, "cmp"));
    let err = table_sort(&mut caller, &t, Some(&comp)).unwrap_err();
    assert!(matches!(err, LuaError::ComparatorFailure(inner) if matches!(*inner, LuaError::RuntimeError(_))));
}

/// Caller that runs every script function as a numeric `<` comparator,
/// touching the table being sorted on each call.
struct ReentrantCaller {
    table: LuaTableRef,
    calls: usize,
}

impl LuaCaller for ReentrantCaller {
    fn call(&mut self, _func: &LuaValue, args: &[LuaValue]) -> LuaResult<MultiValue> {
        self.calls += 1;
        let _ = self.table.get(&int(1));
        self.table.borrow_mut().append(int(-1));
        self.table.set(s("seen"), int(self.calls as i64))?;
        let less = args[0].as_number() < args[1].as_number();
        Ok(MultiValue::single(LuaValue::boolean(less)))
    }
}

#[test]
fn test_comparator_may_touch_the_table() {
    let t = array_table(scrambled(50));
    let mut caller = ReentrantCaller {
        table: t.clone(),
        calls: 0,
    };
    let comp = LuaValue::function(LuaFunction::new(1, "lt"));
    table_sort(&mut caller, &t, Some(&comp)).unwrap();
    assert!(caller.calls > 0);

    // the sorted copy replaces whatever the comparator appended
    let sorted = integers(t.borrow().array_values());
    assert_eq!(sorted.len(), 50);
    assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(t.get(&s("seen")), int(caller.calls as i64));
}

#[test]
fn test_native_caller_limits() {
    let mut caller = NativeCaller::with_max_depth(16);
    let err = caller.call(&LuaValue::cfunction(recurse), &[]).unwrap_err();
    assert_eq!(err, LuaError::runtime("stack overflow"));
    assert_eq!(caller.depth(), 0);

    let err = caller.call(&int(1), &[]).unwrap_err();
    assert_eq!(err, LuaError::NotCallable("number"));
}

/// Plain integers, to drive `sort` without any Lua values involved
struct Numbers(Vec<i32>);

impl SortInterface for Numbers {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.0.swap(i, j);
    }

    fn less(&mut self, i: usize, j: usize) -> LuaResult<bool> {
        Ok(self.0[i] < self.0[j])
    }
}

#[test]
fn test_sort_interface() {
    let mut data = Numbers(vec![5, -1, 9, 0, 5, 3, 12, 7, 7, 1, 2, 8, 6, 4, 11, 10]);
    sort(&mut data).unwrap();
    assert!(data.0.windows(2).all(|w| w[0] <= w[1]));

    let mut empty = Numbers(Vec::new());
    assert!(empty.is_empty());
    sort(&mut empty).unwrap();
}
