//! Tests for the sorted associative container

use rstest::rstest;

use branch_ledger::domain::{DomainError, OrderedMap};

fn map_of(keys: &[&str]) -> OrderedMap<String, usize> {
    let mut map = OrderedMap::new();
    for (i, key) in keys.iter().enumerate() {
        map.set(key.to_string(), i);
    }
    map
}

#[rstest]
#[case(&["c", "a", "b"])]
#[case(&["zeta", "Alpha", "beta", "10", "9"])]
#[case(&[])]
fn given_unsorted_inserts_when_iterating_then_ascending(#[case] keys: &[&str]) {
    // Arrange
    let map = map_of(keys);

    // Act
    let iterated: Vec<&String> = map.keys().collect();

    // Assert
    let mut expected: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    expected.sort();
    assert_eq!(iterated, expected.iter().collect::<Vec<_>>());
    for (i, key) in expected.iter().enumerate() {
        assert_eq!(map.key_at(i).unwrap(), key);
    }
}

#[test]
fn given_absent_key_when_get_or_delete_then_not_found() {
    // Arrange
    let mut map = map_of(&["a"]);

    // Act / Assert
    assert!(matches!(map.get("b"), Err(DomainError::NotFound(_))));
    assert!(matches!(map.delete("b"), Err(DomainError::NotFound(_))));
    assert_eq!(map.len(), 1);
}

#[test]
fn given_existing_key_when_set_then_replaced_in_place() {
    // Arrange
    let mut map = map_of(&["a", "b"]);

    // Act
    let previous = map.set("a".to_string(), 42);

    // Assert
    assert_eq!(previous, Some(0));
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("a"), Ok(&42));
}

#[test]
fn given_row_past_end_when_key_at_then_not_found() {
    let map = map_of(&["a"]);
    assert!(matches!(map.key_at(1), Err(DomainError::NotFound(_))));
    assert!(matches!(map.value_at(5), Err(DomainError::NotFound(_))));
}

#[test]
fn given_deleted_key_when_checked_then_absent_and_order_kept() {
    // Arrange
    let mut map = map_of(&["a", "b", "c"]);

    // Act
    let removed = map.delete("b").unwrap();

    // Assert
    assert_eq!(removed, 1);
    assert!(!map.contains("b"));
    assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec!["a", "c"]);
}
