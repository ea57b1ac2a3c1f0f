//! Tests for the textual command grammar

use rstest::rstest;

use branch_ledger::application::{BranchAction, Command, ItemAction};
use branch_ledger::domain::{Activity, Cents, DomainError, Minutes, Units};

#[rstest]
#[case("withdraw($12.34)", Command::distribute(Activity::Withdraw, Cents::new(1234)))]
#[case("clock(2h 05m)", Command::Clock { minutes: Minutes::new(125).unwrap() })]
#[case(
    "branch('Bob\\'s').describe('a \\\\ b')",
    Command::branch("Bob's", BranchAction::Describe("a \\ b".to_string()))
)]
#[case(
    "branch('A').merge(branch('B'))",
    Command::branch("A", BranchAction::Merge("B".to_string()))
)]
#[case(
    "branch('A').item('nut').units(12).relabel('bolt')",
    Command::item("A", "nut", Units::new(12).unwrap(), ItemAction::Relabel("bolt".to_string()))
)]
#[case(
    "branch('A').item('nut').sell($0.50)",
    Command::item("A", "nut", Units::ONE, ItemAction::Sell(Cents::new(50)))
)]
fn given_canonical_line_when_parsed_then_command_and_same_text(
    #[case] line: &str,
    #[case] expected: Command,
) {
    // Act
    let command: Command = line.parse().unwrap();

    // Assert
    assert_eq!(command, expected);
    assert_eq!(command.to_string(), line);
}

#[rstest]
#[case("deposit($1.234)")]
#[case("branch(A).split(2)")]
#[case("branch('A').split(two)")]
#[case("branch('A).split(2)")]
#[case("branch('A').fly()")]
#[case("")]
fn given_malformed_line_when_parsed_then_type_mismatch(#[case] line: &str) {
    let result = line.parse::<Command>();
    assert!(
        matches!(result, Err(DomainError::TypeMismatch { .. })),
        "{line:?} gave {result:?}"
    );
}
