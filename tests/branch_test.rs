//! Tests for Branch and Inventory: activities, split and merge conservation

use branch_ledger::domain::{
    Activity, Balance, Branch, Cents, DomainError, Inventory, Minutes, Units,
};

fn units(n: i64) -> Units {
    Units::new(n).unwrap()
}

fn funded_branch() -> Branch {
    let mut inventory = Inventory::new();
    inventory.acquire("apple", units(7)).unwrap();
    inventory.acquire("pear", units(2)).unwrap();
    Branch::from_parts(
        "Shop",
        "corner shop",
        Balance::new(100).unwrap(),
        Cents::new(40),
        Minutes::new(90).unwrap(),
        inventory,
    )
}

// ============================================================
// Activities
// ============================================================

#[test]
fn given_branch_when_earning_and_spending_then_profit_tracks_both() {
    // Arrange
    let mut branch = Branch::new("Shop", "");

    // Act
    branch.deposit(Cents::new(1000)).unwrap();
    branch.earn(Cents::new(250)).unwrap();
    branch.spend(Cents::new(100)).unwrap();
    branch.withdraw(Cents::new(50)).unwrap();

    // Assert
    assert_eq!(branch.balance(), Balance::new(1100).unwrap());
    assert_eq!(branch.profit(), Cents::new(150));
}

#[test]
fn given_small_balance_when_spending_more_then_insufficient_and_unchanged() {
    // Arrange
    let mut branch = Branch::new("Shop", "");
    branch.apply(Activity::Deposit, Cents::new(10)).unwrap();
    let before = branch.clone();

    // Act
    let result = branch.spend(Cents::new(11));

    // Assert
    assert!(matches!(result, Err(DomainError::Insufficient { .. })));
    assert_eq!(branch, before);
}

#[test]
fn given_funds_when_buying_then_balance_and_inventory_move_together() {
    // Arrange
    let mut branch = Branch::new("Shop", "");
    branch.deposit(Cents::new(500)).unwrap();

    // Act
    branch.buy("apple", units(3), Cents::new(120)).unwrap();
    branch.sell("apple", units(1), Cents::new(60)).unwrap();

    // Assert
    assert_eq!(branch.balance(), Balance::new(440).unwrap());
    assert_eq!(branch.profit(), Cents::new(-60));
    assert_eq!(branch.inventory().units_of("apple"), units(2));
}

#[test]
fn given_missing_item_when_selling_then_insufficient_and_no_income() {
    let mut branch = Branch::new("Shop", "");

    let result = branch.sell("apple", units(1), Cents::new(60));

    assert!(matches!(result, Err(DomainError::Insufficient { .. })));
    assert_eq!(branch.balance(), Balance::ZERO);
}

// ============================================================
// Inventory
// ============================================================

#[test]
fn given_zero_units_when_acquire_or_discard_then_no_op() {
    let mut inventory = Inventory::new();

    inventory.acquire("apple", Units::ZERO).unwrap();
    inventory.discard("apple", Units::ZERO).unwrap();

    assert!(inventory.is_empty());
}

#[test]
fn given_label_when_discarded_to_zero_then_removed() {
    // Arrange
    let mut inventory = Inventory::new();
    inventory.acquire("apple", units(2)).unwrap();

    // Act
    inventory.discard("apple", units(2)).unwrap();

    // Assert
    assert!(!inventory.contains("apple"));
}

#[test]
fn given_units_when_relabelled_then_moved_between_labels() {
    // Arrange
    let mut inventory = Inventory::new();
    inventory.acquire("apple", units(5)).unwrap();

    // Act
    inventory.relabel("apple", "green apple", units(2)).unwrap();

    // Assert
    assert_eq!(inventory.units_of("apple"), units(3));
    assert_eq!(inventory.units_of("green apple"), units(2));
}

// ============================================================
// Split and merge
// ============================================================

#[test]
fn given_branch_when_split_three_ways_and_merged_back_then_totals_restored() {
    // Arrange
    let original = funded_branch();

    // Act
    let mut children = original.split(3).unwrap().into_iter();
    let mut merged = children.next().unwrap();
    for child in children {
        merged.merge(child).unwrap();
    }

    // Assert
    assert_eq!(merged.balance(), Balance::new(100).unwrap());
    assert_eq!(merged.profit(), Cents::new(40));
    assert_eq!(merged.time_spent(), Minutes::new(90).unwrap());
    assert_eq!(merged.inventory().units_of("apple"), units(7));
    assert_eq!(merged.inventory().units_of("pear"), units(2));
}

#[test]
fn given_branch_when_split_then_children_named_and_shares_even() {
    // Arrange
    let original = funded_branch();

    // Act
    let children = original.split(3).unwrap();

    // Assert
    let names: Vec<&str> = children.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Shop (1)", "Shop (2)", "Shop (3)"]);
    let balances: Vec<i64> = children.iter().map(|c| c.balance().value()).collect();
    assert_eq!(balances, vec![34, 33, 33]);
    assert!(children.iter().all(|c| c.description() == "corner shop"));
    let apples: i64 = children
        .iter()
        .map(|c| c.inventory().units_of("apple").value())
        .sum();
    assert_eq!(apples, 7);
}

#[test]
fn given_one_way_when_split_then_range_violation() {
    let original = funded_branch();
    assert!(matches!(
        original.split(1),
        Err(DomainError::RangeViolation(_))
    ));
}
