// Tests for the table library functions
use super::{int, s};
use crate::stdlib::create_table_lib;
use crate::*;

struct Lib {
    lib: LuaTable,
    caller: NativeCaller,
}

impl Lib {
    fn new() -> Self {
        Lib {
            lib: create_table_lib(),
            caller: NativeCaller::new(),
        }
    }

    fn call(&mut self, name: &str, args: &[LuaValue]) -> LuaResult<Vec<LuaValue>> {
        let func = self.lib.raw_get_str(name);
        assert!(func.is_function(), "table.{} is missing", name);
        self.caller.call(&func, args).map(MultiValue::all_values)
    }
}

fn list(values: &[LuaValue]) -> LuaTableRef {
    let t = LuaTableRef::default();
    for v in values {
        t.borrow_mut().append(v.clone());
    }
    t
}

fn greater(_: &mut dyn LuaCaller, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let a = args[0].as_number().unwrap_or_default();
    let b = args[1].as_number().unwrap_or_default();
    Ok(MultiValue::single(LuaValue::boolean(a > b)))
}

#[test]
fn test_lib_has_every_function() {
    let lib = create_table_lib();
    for name in ["concat", "getn", "insert", "maxn", "remove", "sort", "unpack"] {
        assert!(lib.raw_get_str(name).is_function(), "missing {}", name);
    }
    assert_eq!(lib.hash_len(), 7);
}

#[test]
fn test_concat() {
    let mut lib = Lib::new();
    let t = list(&[s("a"), s("b"), s("c")]);

    let out = lib.call("concat", &[LuaValue::Table(t.clone())]).unwrap();
    assert_eq!(out, vec![s("abc")]);

    let out = lib.call("concat", &[LuaValue::Table(t.clone()), s(", ")]).unwrap();
    assert_eq!(out, vec![s("a, b, c")]);

    let out = lib
        .call("concat", &[LuaValue::Table(t.clone()), s("-"), int(2), int(3)])
        .unwrap();
    assert_eq!(out, vec![s("b-c")]);

    let out = lib.call("concat", &[LuaValue::Table(t), s("-"), int(3), int(2)]).unwrap();
    assert_eq!(out, vec![s("")]);

    let numbers = list(&[int(1), LuaValue::float(2.5), int(3)]);
    let out = lib.call("concat", &[LuaValue::Table(numbers), int(0)]).unwrap();
    assert_eq!(out, vec![s("102.503")]);
}

#[test]
fn test_concat_rejects_bad_values() {
    let mut lib = Lib::new();
    let t = list(&[s("a"), LuaValue::boolean(true)]);
    let err = lib.call("concat", &[LuaValue::Table(t)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid value (at index 2) in table for 'concat' (got boolean)"
    );

    let err = lib.call("concat", &[int(1)]).unwrap_err();
    assert!(matches!(
        err,
        LuaError::BadArgument {
            index: 1,
            func: "concat",
            ..
        }
    ));
}

#[test]
fn test_getn_and_maxn() {
    let mut lib = Lib::new();
    let t = list(&[int(1), int(2), int(3)]);
    t.borrow_mut().raw_set_int(5, int(5));
    t.borrow_mut().raw_set_int(5, LuaValue::Nil);
    t.borrow_mut().raw_set_int(2, LuaValue::Nil);

    let maxn = lib.call("maxn", &[LuaValue::Table(t.clone())]).unwrap();
    assert_eq!(maxn, vec![int(3)]);

    let getn = lib.call("getn", &[LuaValue::Table(t)]).unwrap();
    let n = getn[0].as_integer().unwrap();
    assert!(n == 1 || n == 3);
}

#[test]
fn test_insert_and_remove() {
    let mut lib = Lib::new();
    let t = list(&[s("a"), s("c")]);

    assert!(lib.call("insert", &[LuaValue::Table(t.clone()), s("d")]).unwrap().is_empty());
    lib.call("insert", &[LuaValue::Table(t.clone()), int(2), s("b")]).unwrap();
    assert_eq!(t.borrow().array_values(), &[s("a"), s("b"), s("c"), s("d")]);

    let removed = lib.call("remove", &[LuaValue::Table(t.clone())]).unwrap();
    assert_eq!(removed, vec![s("d")]);
    let removed = lib.call("remove", &[LuaValue::Table(t.clone()), int(1)]).unwrap();
    assert_eq!(removed, vec![s("a")]);
    let removed = lib.call("remove", &[LuaValue::Table(t.clone()), int(9)]).unwrap();
    assert_eq!(removed, vec![LuaValue::Nil]);
    assert_eq!(t.borrow().array_values(), &[s("b"), s("c")]);

    let err = lib.call("insert", &[LuaValue::Table(t.clone())]).unwrap_err();
    assert_eq!(err, LuaError::runtime("wrong number of arguments to 'insert'"));

    let err = lib.call("insert", &[LuaValue::Table(t), s("x"), int(1)]).unwrap_err();
    assert!(matches!(err, LuaError::BadArgument { index: 2, .. }));
}

#[test]
fn test_sort_through_library() {
    let mut lib = Lib::new();
    let t = list(&[int(2), int(9), int(4)]);
    lib.call("sort", &[LuaValue::Table(t.clone())]).unwrap();
    assert_eq!(t.borrow().array_values(), &[int(2), int(4), int(9)]);

    lib.call("sort", &[LuaValue::Table(t.clone()), LuaValue::cfunction(greater)])
        .unwrap();
    assert_eq!(t.borrow().array_values(), &[int(9), int(4), int(2)]);

    let err = lib.call("sort", &[LuaValue::Table(t), int(1)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "bad argument #2 to 'sort' (function expected, got number)"
    );
}

#[test]
fn test_unpack() {
    let mut lib = Lib::new();
    let t = list(&[int(1), int(2), int(3)]);

    let all = lib.call("unpack", &[LuaValue::Table(t.clone())]).unwrap();
    assert_eq!(all, vec![int(1), int(2), int(3)]);

    let tail = lib.call("unpack", &[LuaValue::Table(t.clone()), int(2)]).unwrap();
    assert_eq!(tail, vec![int(2), int(3)]);

    let padded = lib.call("unpack", &[LuaValue::Table(t.clone()), int(3), int(4)]).unwrap();
    assert_eq!(padded, vec![int(3), LuaValue::Nil]);

    assert!(lib.call("unpack", &[LuaValue::Table(t.clone()), int(4), int(1)]).unwrap().is_empty());

    let err = lib
        .call("unpack", &[LuaValue::Table(t), int(1), int(i64::MAX)])
        .unwrap_err();
    assert_eq!(err, LuaError::runtime("too many results to unpack"));
}
