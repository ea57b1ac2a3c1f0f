//! Tests for command line parsing

use std::path::PathBuf;

use clap::Parser;

use branch_ledger::cli::args::{BranchCommands, Cli, Commands, ItemCommands};
use branch_ledger::domain::{Cents, RowNum, Selector, Units};

#[test]
fn given_global_flags_when_parsed_then_verbosity_and_state_set() {
    let cli = Cli::try_parse_from(["ledger", "-dd", "-f", "books.toml", "summary"]).unwrap();

    assert_eq!(cli.debug, 2);
    assert_eq!(cli.state, Some(PathBuf::from("books.toml")));
    assert!(matches!(cli.command, Some(Commands::Summary)));
}

#[test]
fn given_item_buy_when_parsed_then_row_selector_units_and_price() {
    // Act
    let cli = Cli::try_parse_from([
        "ledger", "branch", "2", "item", "apple", "--units", "3", "buy", "1.20",
    ])
    .unwrap();

    // Assert
    let Some(Commands::Branch { selector, command }) = cli.command else {
        panic!("expected branch command");
    };
    assert_eq!(selector, Selector::Row(RowNum::new(2).unwrap()));
    let BranchCommands::Item {
        item,
        units,
        command,
    } = command
    else {
        panic!("expected item command");
    };
    assert_eq!(item, Selector::Name("apple".to_string()));
    assert_eq!(units, Units::new(3).unwrap());
    assert!(matches!(command, ItemCommands::Buy { price } if price == Cents::new(120)));
}

#[test]
fn given_split_without_ways_when_parsed_then_two() {
    let cli = Cli::try_parse_from(["ledger", "branch", "Shop", "split"]).unwrap();

    assert!(matches!(
        cli.command,
        Some(Commands::Branch {
            command: BranchCommands::Split { ways: 2 },
            ..
        })
    ));
}

#[test]
fn given_fractional_cent_amount_when_parsed_then_rejected() {
    assert!(Cli::try_parse_from(["ledger", "deposit", "1.234"]).is_err());
}

#[test]
fn given_row_zero_when_parsed_then_rejected() {
    assert!(Cli::try_parse_from(["ledger", "branch", "0", "show"]).is_err());
}
