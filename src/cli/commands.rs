//! Command dispatch
//!
//! Every mutating invocation loads the snapshot, executes exactly one ledger
//! command and saves the result.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, info, instrument};

use crate::application::services::LedgerService;
use crate::application::{BranchAction, Command, ItemAction};
use crate::cli::args::{BranchCommands, Cli, Commands, ConfigCommands, ItemCommands};
use crate::cli::output;
use crate::cli::table::{Column, Table};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{Activity, Branch, Cents, Ledger, Minutes, RowNum, Selector};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given (try --help)".to_string(),
        ));
    };
    if let Commands::Completion { shell } = command {
        return cmd_completion(*shell);
    }

    let container = ServiceContainer::new(load_settings(cli)?);
    match command {
        Commands::Init { force } => cmd_init(&container, *force),
        Commands::Summary => cmd_summary(&container),
        Commands::Branches { descriptions } => cmd_branches(&container, *descriptions),
        Commands::Deposit { amount } => cmd_distribute(&container, Activity::Deposit, *amount),
        Commands::Withdraw { amount } => cmd_distribute(&container, Activity::Withdraw, *amount),
        Commands::Earn { amount } => cmd_distribute(&container, Activity::Earn, *amount),
        Commands::Spend { amount } => cmd_distribute(&container, Activity::Spend, *amount),
        Commands::Clock { hours } => cmd_clock(&container, *hours),
        Commands::History => cmd_history(&container),
        Commands::Replay => cmd_replay(&container),
        Commands::Branch { selector, command } => cmd_branch(&container, selector, command),
        Commands::Config { command } => cmd_config(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Settings from config and environment, with `--state` taking precedence.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load()?;
    if let Some(state) = &cli.state {
        settings.state_file = Some(state.clone());
    }
    debug!("state file: {}", settings.state_path().display());
    Ok(settings)
}

/// Execute one command against the stored ledger and save it.
fn apply(
    container: &ServiceContainer,
    service: &mut LedgerService,
    command: Command,
) -> CliResult<()> {
    service.execute(&command)?;
    container.save_ledger(service)?;
    output::success(&command);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_init(container: &ServiceContainer, force: bool) -> CliResult<()> {
    let path = container.store.path();
    if container.store.exists() && !force {
        return Err(CliError::Usage(format!(
            "ledger already exists: {} (use --force to start over)",
            path.display()
        )));
    }
    let service = container.fresh_ledger();
    container.save_ledger(&service)?;
    info!("initialized ledger at {}", path.display());
    output::action("Created", &path.display());
    Ok(())
}

fn figures_table() -> Table {
    let mut table = Table::new([
        Column::right(0),
        Column::right(3),
        Column::right(3),
        Column::right(3),
    ]);
    table.row(["Balance", "Profit", "Time Spent", "Wage"]);
    table
}

#[instrument(skip(container))]
fn cmd_summary(container: &ServiceContainer) -> CliResult<()> {
    let service = container.open_ledger()?;
    let ledger = service.ledger();
    let mut table = figures_table();
    table.row([
        ledger.total_balance()?.to_string(),
        ledger.total_profit()?.to_string(),
        ledger.total_time_spent()?.to_string(),
        ledger.total_wage()?.to_string(),
    ]);
    output::info(&table.render());
    Ok(())
}

fn print_branch_summaries(ledger: &Ledger) {
    let mut table = Table::new([
        Column::left(0),
        Column::left(1),
        Column::right(3),
        Column::right(3),
        Column::right(3),
        Column::right(3),
    ]);
    table.row(["", "", "Balance", "Profit", "Time Spent", "Wage"]);
    for (index, branch) in ledger.branches().enumerate() {
        table.row([
            RowNum::from_index(index).to_string(),
            branch.name().to_string(),
            branch.balance().to_string(),
            branch.profit().to_string(),
            branch.time_spent().to_string(),
            branch.wage().to_string(),
        ]);
    }
    output::info(&table.render());
}

fn print_branch_descriptions(ledger: &Ledger) {
    for (index, branch) in ledger.branches().enumerate() {
        output::header(&format!("{} {}", RowNum::from_index(index), branch.name()));
        output::info("");
        output::info(branch.description());
        output::info("");
    }
}

#[instrument(skip(container))]
fn cmd_branches(container: &ServiceContainer, descriptions: bool) -> CliResult<()> {
    let service = container.open_ledger()?;
    if descriptions {
        print_branch_descriptions(service.ledger());
    } else {
        print_branch_summaries(service.ledger());
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_distribute(container: &ServiceContainer, activity: Activity, amount: Cents) -> CliResult<()> {
    let mut service = container.open_ledger()?;
    apply(container, &mut service, Command::distribute(activity, amount))
}

#[instrument(skip(container))]
fn cmd_clock(container: &ServiceContainer, minutes: Minutes) -> CliResult<()> {
    let mut service = container.open_ledger()?;
    apply(container, &mut service, Command::Clock { minutes })
}

#[instrument(skip(container))]
fn cmd_history(container: &ServiceContainer) -> CliResult<()> {
    let service = container.open_ledger()?;
    for line in service.history() {
        output::info(line);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_replay(container: &ServiceContainer) -> CliResult<()> {
    let service = container.open_ledger()?;
    let rebuilt = service.replay(service.history())?;
    if rebuilt.ledger() != service.ledger() {
        output::warning("stored branches differ from their history; keeping the replayed ones");
    }
    container.save_ledger(&rebuilt)?;
    info!("replayed {} commands", rebuilt.history().len());
    output::success(&format!("replayed {} commands", rebuilt.history().len()));
    Ok(())
}

fn print_branch(branch: &Branch) {
    output::header(branch.name());
    let mut table = figures_table();
    table.row([
        branch.balance().to_string(),
        branch.profit().to_string(),
        branch.time_spent().to_string(),
        branch.wage().to_string(),
    ]);
    output::info(&table.render());
}

fn print_inventory(branch: &Branch) {
    let mut table = Table::new([Column::left(0), Column::left(1), Column::right(3)]);
    table.row(["", "", "Units"]);
    for (index, (label, units)) in branch.inventory().iter().enumerate() {
        table.row([
            RowNum::from_index(index).to_string(),
            label.clone(),
            units.to_string(),
        ]);
    }
    output::info(&table.render());
}

fn item_action(command: &ItemCommands) -> ItemAction {
    match command {
        ItemCommands::Acquire => ItemAction::Acquire,
        ItemCommands::Discard => ItemAction::Discard,
        ItemCommands::Relabel { new_label } => ItemAction::Relabel(new_label.clone()),
        ItemCommands::Buy { price } => ItemAction::Buy(*price),
        ItemCommands::Sell { price } => ItemAction::Sell(*price),
    }
}

fn money(activity: Activity, amount: Cents) -> BranchAction {
    BranchAction::Money { activity, amount }
}

#[instrument(skip(container))]
fn cmd_branch(
    container: &ServiceContainer,
    selector: &Selector,
    command: &BranchCommands,
) -> CliResult<()> {
    let mut service = container.open_ledger()?;
    let name = service.resolve_branch(selector)?;
    let branch = service.ledger().branch(&name)?;
    let action = match command {
        BranchCommands::Show => {
            print_branch(branch);
            return Ok(());
        }
        BranchCommands::Name => {
            output::info(branch.name());
            return Ok(());
        }
        BranchCommands::Description => {
            output::info(branch.description());
            return Ok(());
        }
        BranchCommands::Inventory => {
            print_inventory(branch);
            return Ok(());
        }
        BranchCommands::Rename { new_name } => BranchAction::Rename(new_name.clone()),
        BranchCommands::Describe { description } => BranchAction::Describe(description.clone()),
        BranchCommands::Deposit { amount } => money(Activity::Deposit, *amount),
        BranchCommands::Withdraw { amount } => money(Activity::Withdraw, *amount),
        BranchCommands::Earn { amount } => money(Activity::Earn, *amount),
        BranchCommands::Spend { amount } => money(Activity::Spend, *amount),
        BranchCommands::Clock { hours } => BranchAction::Clock(*hours),
        BranchCommands::Split { ways } => BranchAction::Split(*ways),
        BranchCommands::Merge { other } => BranchAction::Merge(service.resolve_branch(other)?),
        BranchCommands::Item {
            item,
            units,
            command,
        } => BranchAction::Item {
            label: service.resolve_item(&name, item)?,
            units: *units,
            action: item_action(command),
        },
    };
    apply(container, &mut service, Command::branch(name, action))
}

#[instrument(skip(container))]
fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Config", &path.display()),
                None => output::warning("no config directory on this platform"),
            }
            output::action("State", &container.settings.state_path().display());
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("no config directory on this platform".to_string())
            })?;
            write_template(&RealFileSystem, &path, *force)?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}

fn write_template(fs: &dyn FileSystem, path: &Path, force: bool) -> CliResult<()> {
    if fs.exists(path) && !force {
        return Err(CliError::Usage(format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    fs.ensure_parent(path)
        .and_then(|()| fs.write_atomic(path, &Settings::template()))
        .map_err(|e| InfraError::io(format!("writing {}", path.display()), e))?;
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_existing_config_when_init_without_force_then_usage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.toml");
        std::fs::write(&path, "# mine").unwrap();

        let result = write_template(&RealFileSystem, &path, false);

        assert!(matches!(result, Err(CliError::Usage(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");
    }

    #[test]
    fn given_missing_config_when_init_then_template_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ledger.toml");

        write_template(&RealFileSystem, &path, false).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), Settings::template());
    }
}
