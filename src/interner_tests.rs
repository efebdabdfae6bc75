use super::*;

#[test]
fn intern_is_idempotent() {
    let mut it = Interner::new();
    let a1 = it.intern("alice");
    let a2 = it.intern("alice");
    assert_eq!(a1, a2);
    assert_eq!(it.len(), 1);
}

#[test]
fn intern_assigns_dense_increasing_handles() {
    let mut it = Interner::new();
    assert_eq!(it.intern("a"), 0);
    assert_eq!(it.intern("b"), 1);
    assert_eq!(it.intern("c"), 2);
    assert_eq!(it.intern("a"), 0);
    assert_eq!(it.len(), 3);
}

#[test]
fn resolve_round_trips_intern() {
    let mut it = Interner::new();
    let h = it.intern("hello");
    assert_eq!(it.resolve(h).unwrap(), "hello");
}

#[test]
fn resolve_out_of_range_is_unknown_handle() {
    let it = Interner::new();
    let err = it.resolve(0).unwrap_err();
    assert!(matches!(err, GraphError::UnknownHandle { handle: 0, len: 0 }));
}

#[test]
fn lookup_has_no_side_effect() {
    let mut it = Interner::new();
    assert_eq!(it.lookup("missing"), None);
    assert_eq!(it.len(), 0);
    it.intern("present");
    assert_eq!(it.lookup("present"), Some(0));
    assert_eq!(it.lookup("missing"), None);
}

#[test]
fn from_ordered_preserves_handle_assignment() {
    let strings: Vec<Box<str>> = vec!["x".into(), "y".into(), "z".into()];
    let it = Interner::from_ordered(strings);
    assert_eq!(it.lookup("y"), Some(1));
    assert_eq!(it.resolve(2).unwrap(), "z");
}
