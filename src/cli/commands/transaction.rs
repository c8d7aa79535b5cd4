use chrono::Local;

use crate::cli::core::{
    flag, parse_date, short_id, split_flags, CommandError, CommandResult, ShellContext,
};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::currency::parse_amount;
use crate::domain::{TransactionDraft, TransactionKind};

const USAGE: &str = "transaction <add|edit|delete> ...";
const ADD_USAGE: &str =
    "transaction add <income|expense> <amount> <description> [--date YYYY-MM-DD] [--category NAME]";
const EDIT_USAGE: &str = "transaction edit <id> [--type T] [--amount A] [--description D] [--date YYYY-MM-DD] [--category NAME]";
const DELETE_USAGE: &str = "transaction delete <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "transaction",
        "Add, edit or delete transactions",
        USAGE,
        cmd_transaction,
    )]
}

fn cmd_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::usage(USAGE));
    };
    context.ensure_loaded()?;
    match subcommand.to_ascii_lowercase().as_str() {
        "add" => handle_add(context, rest),
        "edit" => handle_edit(context, rest),
        "delete" | "remove" => handle_delete(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown transaction subcommand `{}`",
            other
        ))),
    }
}

fn parse_kind(value: &str) -> Result<TransactionKind, CommandError> {
    value.parse().map_err(CommandError::InvalidArguments)
}

fn parse_positive(value: &str) -> Result<rust_decimal::Decimal, CommandError> {
    parse_amount(value).map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positionals, flags) = split_flags(args, &["date", "category"])?;
    let [kind, amount, description @ ..] = positionals.as_slice() else {
        return Err(CommandError::usage(ADD_USAGE));
    };
    if description.is_empty() {
        return Err(CommandError::usage(ADD_USAGE));
    }
    let date = match flag(&flags, "date") {
        Some(value) => parse_date(value)?,
        None => Local::now().date_naive(),
    };
    let draft = TransactionDraft::new(
        parse_kind(kind)?,
        description.join(" "),
        parse_positive(amount)?,
        date,
        flag(&flags, "category").unwrap_or_default(),
    );

    let created = context.block_on(context.state.transactions.create(draft))?;
    output::success(format!(
        "Added {} `{}` ({}{}) as {}.",
        created.kind,
        created.description,
        created.kind.sign(),
        context.format_amount(created.amount),
        short_id(created.id)
    ));
    Ok(())
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positionals, flags) = split_flags(
        args,
        &["type", "amount", "description", "date", "category"],
    )?;
    let [id] = positionals.as_slice() else {
        return Err(CommandError::usage(EDIT_USAGE));
    };
    if flags.is_empty() {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass at least one option".into(),
        ));
    }

    let mut updated = context.resolve_transaction(id)?;
    for (name, value) in &flags {
        match *name {
            "type" => updated.kind = parse_kind(value)?,
            "amount" => updated.amount = parse_positive(value)?,
            "description" => updated.description = value.to_string(),
            "date" => updated.date = parse_date(value)?,
            "category" => updated.category = value.to_string(),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `--{}`",
                    other
                )))
            }
        }
    }

    let saved = context.block_on(context.state.transactions.update(updated))?;
    output::success(format!("Updated transaction {}.", short_id(saved.id)));
    Ok(())
}

fn handle_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::usage(DELETE_USAGE));
    };
    let target = context.resolve_transaction(id)?;
    if !context.confirm(&format!("Delete `{}`?", target.description))? {
        output::info("Deletion cancelled.");
        return Ok(());
    }
    let removed = context.block_on(context.state.transactions.delete(target.id))?;
    output::success(format!("Deleted transaction {}.", short_id(removed)));
    Ok(())
}
