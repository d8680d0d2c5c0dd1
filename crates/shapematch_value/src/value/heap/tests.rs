use super::*;

#[test]
fn test_heap_deref() {
    let h = Heap::new(vec![1, 2, 3]);
    assert_eq!(h.len(), 3);
}

#[test]
fn test_heap_clone_shares_identity() {
    let h1 = Heap::new("hello".to_string());
    let h2 = h1.clone();
    assert!(Heap::ptr_eq(&h1, &h2));
}

#[test]
fn test_heap_eq_is_structural() {
    let h1 = Heap::new("hello".to_string());
    let h2 = Heap::new("hello".to_string());
    let h3 = Heap::new("world".to_string());
    assert_eq!(h1, h2);
    assert_ne!(h1, h3);
    assert!(!Heap::ptr_eq(&h1, &h2));
}
