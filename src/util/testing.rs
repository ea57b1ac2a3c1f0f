//! Shared test setup: logging and ledger fixtures

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::services::LedgerService;
use crate::application::{BranchAction, Command};
use crate::domain::{Activity, Cents, DEFAULT_BRANCH_NAME};

static TEST_SETUP: Once = Once::new();

/// Install the test subscriber once per process.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
}

/// A ledger whose seed branch is split into one branch per entry of
/// `balances`, renamed and funded as given (balances in cents).
///
/// Panics on invalid input; meant for tests only.
pub fn ledger_with_balances(balances: &[(&str, i64)]) -> LedgerService {
    let mut service = LedgerService::new();
    let seed = DEFAULT_BRANCH_NAME;
    let mut run = |command: Command| {
        service
            .execute(&command)
            .unwrap_or_else(|e| panic!("fixture command {command} failed: {e}"));
    };

    let names: Vec<String> = if balances.len() > 1 {
        run(Command::branch(seed, BranchAction::Split(balances.len())));
        (1..=balances.len()).map(|i| format!("{seed} ({i})")).collect()
    } else {
        vec![seed.to_string()]
    };
    for ((name, cents), old) in balances.iter().zip(&names) {
        if old.as_str() != *name {
            run(Command::branch(old.clone(), BranchAction::Rename(name.to_string())));
        }
        if *cents > 0 {
            run(Command::branch(
                *name,
                BranchAction::Money {
                    activity: Activity::Deposit,
                    amount: Cents::new(*cents),
                },
            ));
        }
    }
    service
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_balances_when_building_fixture_then_branches_funded() {
        init_test_setup();

        let service = ledger_with_balances(&[("A", 3000), ("B", 7000)]);

        let ledger = service.ledger();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.branch("A").unwrap().balance().value(), 3000);
        assert_eq!(ledger.branch("B").unwrap().balance().value(), 7000);
    }
}
