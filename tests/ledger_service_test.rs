//! Tests for LedgerService: history, state replacement, reset and replay

use branch_ledger::application::services::{LedgerService, LedgerState};
use branch_ledger::application::{ApplicationError, BranchAction, Command, ItemAction};
use branch_ledger::domain::{Activity, Branch, Cents, Minutes, Registry, Units};
use branch_ledger::util::testing::init_test_setup;

fn funded_service() -> LedgerService {
    let mut service = LedgerService::new();
    let commands = [
        Command::branch("Initial", BranchAction::Rename("Shop".to_string())),
        Command::branch(
            "Shop",
            BranchAction::Money {
                activity: Activity::Deposit,
                amount: Cents::new(10_000),
            },
        ),
        Command::item("Shop", "apple", Units::new(4).unwrap(), ItemAction::Buy(Cents::new(400))),
        Command::branch("Shop", BranchAction::Split(2)),
        Command::distribute(Activity::Earn, Cents::new(1_001)),
        Command::Clock {
            minutes: Minutes::new(95).unwrap(),
        },
        Command::branch("Shop (1)", BranchAction::Merge("Shop (2)".to_string())),
    ];
    for command in &commands {
        service.execute(command).unwrap();
    }
    service
}

// ============================================================
// execute() / history
// ============================================================

#[test]
fn given_commands_when_executed_then_history_holds_canonical_lines() {
    // Arrange
    init_test_setup();

    // Act
    let service = funded_service();

    // Assert
    assert_eq!(
        service.history(),
        [
            "branch('Initial').rename('Shop')",
            "branch('Shop').deposit($100.00)",
            "branch('Shop').item('apple').units(4).buy($4.00)",
            "branch('Shop').split(2)",
            "earn($10.01)",
            "clock(1h 35m)",
            "branch('Shop (1)').merge(branch('Shop (2)'))",
        ]
    );
}

#[test]
fn given_failing_command_when_executed_then_state_and_history_unchanged() {
    // Arrange
    let mut service = funded_service();
    let before = service.get_state();

    // Act
    let result = service.execute(&Command::item(
        "Shop (1)",
        "apple",
        Units::new(5).unwrap(),
        ItemAction::Sell(Cents::new(100)),
    ));

    // Assert
    assert!(result.is_err());
    assert_eq!(service.get_state(), before);
}

// ============================================================
// replay()
// ============================================================

#[test]
fn given_history_when_replayed_then_identical_ledger() {
    // Arrange
    let service = funded_service();

    // Act
    let rebuilt = service.replay(service.history()).unwrap();

    // Assert
    assert_eq!(rebuilt.ledger(), service.ledger());
    assert_eq!(rebuilt.history(), service.history());
}

#[test]
fn given_unparsable_line_when_replayed_then_error_names_line() {
    let service = LedgerService::new();
    let history = vec![
        "branch('Initial').deposit($1.00)".to_string(),
        "bogus()".to_string(),
    ];

    let result = service.replay(&history);

    assert!(matches!(
        result,
        Err(ApplicationError::Replay { line: 2, .. })
    ));
}

// ============================================================
// get_state() / set_state() / reset()
// ============================================================

#[test]
fn given_state_when_round_tripped_then_equal() {
    // Arrange
    let service = funded_service();
    let mut other = LedgerService::new();

    // Act
    other.set_state(service.get_state()).unwrap();

    // Assert
    assert_eq!(other.get_state(), service.get_state());
}

#[test]
fn given_key_not_matching_name_when_set_state_then_invalid_state_and_unchanged() {
    // Arrange
    let mut service = funded_service();
    let before = service.get_state();
    let mut registry = Registry::new();
    registry.set("A".to_string(), Branch::new("B", ""));

    // Act
    let result = service.set_state(LedgerState {
        registry,
        history: vec![],
    });

    // Assert
    assert!(matches!(result, Err(ApplicationError::InvalidState { .. })));
    assert_eq!(service.get_state(), before);
}

#[test]
fn given_malformed_history_when_set_state_then_invalid_state() {
    let mut service = LedgerService::new();
    let mut state = service.get_state();
    state.history.push("not a command".to_string());

    let result = service.set_state(state);

    assert!(matches!(result, Err(ApplicationError::InvalidState { .. })));
}

#[test]
fn given_used_ledger_when_reset_then_seed_only() {
    let mut service = funded_service();

    service.reset();

    assert_eq!(service.ledger().len(), 1);
    assert!(service.ledger().contains("Initial"));
    assert!(service.history().is_empty());
}
