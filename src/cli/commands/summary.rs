use crate::cli::core::{flag, short_id, split_flags, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::view::{CategoryFilter, TransactionQuery};

const LIST_USAGE: &str = "list [--search TEXT] [--category NAME|All]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show totals and expenses by category",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "list",
            "List transactions, newest first",
            LIST_USAGE,
            cmd_list,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.ensure_loaded()?;
    let summary = context.state.summary();

    output_section("Summary");
    output::info(format!(
        "  Total income   : {}",
        context.format_amount(summary.total_income)
    ));
    output::info(format!(
        "  Total expenses : {}",
        context.format_amount(summary.total_expenses)
    ));
    output::info(format!(
        "  Net balance    : {}",
        context.format_amount(summary.net_balance)
    ));

    output_section("Expenses by category");
    if summary.category_breakdown.is_empty() {
        output::info("  No expenses recorded.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::left("Color"),
    ]);
    for slice in summary.category_slices() {
        table.push(vec![
            slice.label,
            context.format_amount(slice.value),
            slice.color.to_string(),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positionals, flags) = split_flags(args, &["search", "category"])?;
    if !positionals.is_empty() {
        return Err(CommandError::usage(LIST_USAGE));
    }
    context.ensure_loaded()?;

    let query = TransactionQuery::new(
        flag(&flags, "search").unwrap_or_default(),
        flag(&flags, "category")
            .map(CategoryFilter::from)
            .unwrap_or_default(),
    );
    let visible = context.state.visible_transactions(&query);
    if visible.is_empty() {
        output::warning("No transactions match.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Date"),
        TableColumn::left("Description").max_width(32),
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
    ]);
    for txn in &visible {
        table.push(vec![
            short_id(txn.id),
            context.format_date(txn.date),
            txn.description.clone(),
            if txn.has_category() {
                txn.category.clone()
            } else {
                "-".into()
            },
            format!("{}{}", txn.kind.sign(), context.format_amount(txn.amount)),
        ]);
    }
    output::info(table.render());
    output::info(format!("{} transaction(s)", visible.len()));
    Ok(())
}
