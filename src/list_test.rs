//! Tests for ImmutableList

use crate::list::ImmutableList;

#[test]
fn test_empty() {
    let list = ImmutableList::<u32>::new();
    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
    assert_eq!(list.head(), None);
    assert!(list.to_vec_ordered().is_empty());
}

#[test]
fn test_prepend_orders_newest_first() {
    let list = ImmutableList::new().prepend(1).prepend(2).prepend(3);

    assert_eq!(list.len(), 3);
    assert_eq!(list.head(), Some(&3));
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    assert_eq!(list.to_vec_ordered(), vec![1, 2, 3]);
}

#[test]
fn test_prepend_leaves_original_untouched() {
    let base = ImmutableList::new().prepend("a").prepend("b");
    let left = base.prepend("left");
    let right = base.prepend("right");

    assert_eq!(base.to_vec_ordered(), vec!["a", "b"]);
    assert_eq!(left.to_vec_ordered(), vec!["a", "b", "left"]);
    assert_eq!(right.to_vec_ordered(), vec!["a", "b", "right"]);
    assert!(!left.ptr_eq(&right));
}

#[test]
fn test_clone_shares_structure() {
    let list = ImmutableList::new().prepend(10).prepend(20);
    let copy = list.clone();

    assert!(copy.ptr_eq(&list));
    assert_eq!(copy.len(), list.len());
    assert!(ImmutableList::<i32>::new().ptr_eq(&ImmutableList::new()));
    assert!(!copy.ptr_eq(&ImmutableList::new()));
}

#[test]
fn test_iter_is_exact_size() {
    let mut list = ImmutableList::new();
    for i in 0..7 {
        list = list.prepend(i);
    }

    let mut iter = list.iter();
    assert_eq!(iter.len(), 7);
    iter.next();
    iter.next();
    assert_eq!(iter.len(), 5);
    assert_eq!((&list).into_iter().count(), 7);
}

#[test]
fn test_long_list_drops_without_overflow() {
    let mut list = ImmutableList::new();
    for i in 0..500_000u32 {
        list = list.prepend(i);
    }
    assert_eq!(list.len(), 500_000);
    drop(list);
}

#[test]
fn test_drop_keeps_shared_suffix() {
    let base = ImmutableList::new().prepend(1).prepend(2);
    let longer = base.prepend(3);
    drop(base);

    assert_eq!(longer.to_vec_ordered(), vec![1, 2, 3]);
}

#[test]
fn test_debug_lists_newest_first() {
    let list = ImmutableList::new().prepend(1).prepend(2);
    assert_eq!(format!("{list:?}"), "[2, 1]");
}
