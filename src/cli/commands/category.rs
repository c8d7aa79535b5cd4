use crate::cli::core::{short_id, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::domain::CategoryDraft;

const USAGE: &str = "category <add|rename|delete|list> ...  (quote multi-word names)";
const RENAME_USAGE: &str =
    "category rename <name|id> <new name>  (quote a multi-word current name: \"Eating Out\")";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "Manage categories",
        USAGE,
        cmd_category,
    )]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::usage(USAGE));
    };
    context.ensure_loaded()?;
    match subcommand.to_ascii_lowercase().as_str() {
        "add" => handle_add(context, rest),
        "rename" | "edit" => handle_rename(context, rest),
        "delete" | "remove" => handle_delete(context, rest),
        "list" => handle_list(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown category subcommand `{}`",
            other
        ))),
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage("category add <name>"));
    }
    let draft = CategoryDraft::new(args.join(" "));
    let created = context.block_on(context.state.categories.create(draft))?;
    output::success(format!("Category `{}` added.", created.name));
    Ok(())
}

fn handle_rename(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [current, new_name @ ..] = args else {
        return Err(CommandError::usage(RENAME_USAGE));
    };
    if new_name.is_empty() {
        return Err(CommandError::usage(RENAME_USAGE));
    }
    let category = context.resolve_category(current)?;
    let previous = category.name.clone();
    let renamed = category.renamed(new_name.join(" "));
    let saved = context.block_on(context.state.categories.update(renamed))?;
    output::success(format!("Category `{}` renamed to `{}`.", previous, saved.name));
    Ok(())
}

fn handle_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage("category delete <name|id>"));
    }
    let category = context.resolve_category(&args.join(" "))?;
    let usage = context.state.category_usage(category.id)?;
    if let Some(warning) = usage.warning() {
        output::warning(warning);
    }
    if !context.confirm(&format!("Delete category `{}`?", category.name))? {
        output::info("Deletion cancelled.");
        return Ok(());
    }
    context.block_on(context.state.categories.delete(category.id))?;
    output::success(format!("Category `{}` deleted.", category.name));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let categories = context.state.categories.items();
    if categories.is_empty() {
        output::warning("No categories defined.");
        return Ok(());
    }
    let mut table = Table::new(vec![TableColumn::left("Id"), TableColumn::left("Name")]);
    for category in categories {
        table.push(vec![short_id(category.id), category.name]);
    }
    output::info(table.render());
    Ok(())
}
