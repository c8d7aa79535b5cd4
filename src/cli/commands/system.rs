use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::table::{Table, TableColumn};
use crate::store::{Operation, StoreSnapshot};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new(
            "load",
            "Reload transactions and categories",
            "load",
            cmd_load,
        ),
    ]
}

pub(crate) fn maintenance_definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "status",
            "Show store status, busy flags and errors",
            "status",
            cmd_status,
        ),
        CommandEntry::new(
            "clear-errors",
            "Clear recorded operation errors",
            "clear-errors",
            cmd_clear_errors,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        output_section("Available commands");
        output::info(command_table(&context.registry).render());
        output::hint("Use `help <command>` for usage.");
        return Ok(());
    };
    match context.command(&name.to_lowercase()) {
        Some(entry) => {
            output_section(format!("Help: {}", entry.name));
            output::info(entry.description);
            output::info(format!("usage: {}", entry.usage));
        }
        None => context.suggest_command(name),
    }
    Ok(())
}

fn command_table(registry: &CommandRegistry) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("Command"),
        TableColumn::left("Description"),
    ]);
    for entry in registry.list() {
        table.push(vec![entry.name.to_string(), entry.description.to_string()]);
    }
    table
}

fn cmd_load(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.block_on(context.state.reload())?;
    output::success(format!(
        "Loaded {} transactions and {} categories.",
        context.state.transactions.len(),
        context.state.categories.len()
    ));
    Ok(())
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    print_store("Transactions", &context.state.transactions.snapshot());
    print_store("Categories", &context.state.categories.snapshot());
    Ok(())
}

fn print_store<R>(title: &str, snapshot: &StoreSnapshot<R>) {
    output_section(title);
    output::info(format!("  status  : {}", snapshot.status));
    output::info(format!("  records : {}", snapshot.items.len()));
    output::info(format!("  version : {}", snapshot.version));
    let busy: Vec<String> = Operation::ALL
        .iter()
        .filter(|op| snapshot.is_busy(**op))
        .map(ToString::to_string)
        .collect();
    if !busy.is_empty() {
        output::info(format!("  busy    : {}", busy.join(", ")));
    }
    for (op, message) in snapshot.errors() {
        output::warning(format!("{} error: {}", op, message));
    }
}

fn cmd_clear_errors(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.state.clear_errors();
    output::success("Errors cleared.");
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Finance Tracker {}", meta.version));
    output::info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    output::info(format!("  Built at     : {}", meta.timestamp));
    output::info(format!("  Target       : {}", meta.target));
    output::info(format!("  Profile      : {}", meta.profile));
    output::info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
