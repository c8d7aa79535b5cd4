//! Core CLI loop, dispatch, and shell context helpers.

use std::{future::Future, io};

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm};
use rust_decimal::Decimal;
use rustyline::error::ReadlineError;
use tokio::runtime::{Builder, Runtime};
use uuid::Uuid;

use crate::config::{Config, ConfigManager};
use crate::currency::{format_currency, format_date, CurrencyCode, LocaleConfig};
use crate::domain::{Category, Transaction};
use crate::errors::{ConfigError, RepositoryError, StoreError};
use crate::state::FinanceState;

use super::commands;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};

pub const SCRIPT_ENV: &str = "FINANCE_TRACKER_CLI_SCRIPT";

/// Shortest id prefix accepted where a transaction or category id is expected.
const MIN_ID_PREFIX: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failures that stop the shell.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Seed(#[from] RepositoryError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Command failed: {0}")]
    Command(String),
}

/// Failure of a single command; reported and the shell carries on.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn usage(usage: &str) -> Self {
        CommandError::InvalidArguments(format!("usage: {}", usage))
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub state: FinanceState,
    pub locale: LocaleConfig,
    pub currency: CurrencyCode,
    pub last_command: Option<String>,
    pub running: bool,
    runtime: Runtime,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        Self::with_config(mode, config, config_manager)
    }

    pub fn with_config(
        mode: CliMode,
        config: Config,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        output::set_preferences(OutputPreferences {
            color: config.color && mode == CliMode::Interactive,
            quiet_mode: config.quiet,
        });

        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("finance-tracker")
            .enable_all()
            .build()?;
        let state = FinanceState::from_config(&config)?;
        tracing::debug!(config = %config_manager.path().display(), ?mode, "shell context ready");

        Ok(Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            locale: config.locale_config(),
            currency: config.currency_code(),
            config,
            config_manager,
            state,
            last_command: None,
            running: true,
            runtime,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        let pending = self.state.transactions.snapshot().errors().len()
            + self.state.categories.snapshot().errors().len();
        if pending > 0 {
            format!("finance ({} error{})> ", pending, if pending == 1 { "" } else { "s" })
        } else {
            "finance> ".to_string()
        }
    }

    pub(crate) fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// Drives a store future to completion on the shell's runtime.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Loads both stores the first time any data is needed.
    pub(crate) fn ensure_loaded(&self) -> CommandResult {
        if self.state.is_loaded() {
            return Ok(());
        }
        if self.mode == CliMode::Interactive {
            output::info("Loading data...");
        }
        self.block_on(self.state.ensure_loaded())?;
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.closest(input) {
            output::info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(self.ask("Exit shell?", true)?)
    }

    /// Asks before a destructive action; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        match self.mode {
            CliMode::Script => Ok(true),
            CliMode::Interactive => self.ask(prompt, false),
        }
    }

    fn ask(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        let origin = self.last_command.as_deref().unwrap_or("command");
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(format!("{}: {}", origin, message));
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Store(StoreError::Load(message)) => {
                output::error(format!("{}: could not load data ({})", origin, message));
                output::hint("Run `load` to try again.");
                Ok(())
            }
            other => {
                output::error(format!("{}: {}", origin, other));
                Ok(())
            }
        }
    }

    pub(crate) fn format_amount(&self, amount: Decimal) -> String {
        format_currency(amount, &self.currency, &self.locale)
    }

    pub(crate) fn format_date(&self, date: NaiveDate) -> String {
        format_date(&self.locale, date)
    }

    /// Finds a category by case-insensitive name or by id prefix.
    pub(crate) fn resolve_category(&self, key: &str) -> Result<Category, CommandError> {
        let needle = key.trim().to_lowercase();
        let found = self.state.categories.read(|items| {
            items
                .iter()
                .find(|category| category.normalized_name() == needle)
                .cloned()
                .or_else(|| unique_by_id(items, key, |category| category.id))
        });
        found.ok_or_else(|| StoreError::not_found("Category not found").into())
    }

    /// Finds a transaction by full id or unique id prefix.
    pub(crate) fn resolve_transaction(&self, key: &str) -> Result<Transaction, CommandError> {
        self.state
            .transactions
            .read(|items| unique_by_id(items, key, |txn| txn.id))
            .ok_or_else(|| StoreError::not_found("Transaction not found").into())
    }
}

/// First eight hex digits of an id, as shown in listings.
pub(crate) fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

fn unique_by_id<T: Clone>(items: &[T], key: &str, id_of: impl Fn(&T) -> Uuid) -> Option<T> {
    if let Ok(id) = Uuid::parse_str(key.trim()) {
        return items.iter().find(|item| id_of(item) == id).cloned();
    }
    let prefix = key.trim().to_lowercase().replace('-', "");
    if prefix.len() < MIN_ID_PREFIX {
        return None;
    }
    let mut matches = items
        .iter()
        .filter(|item| id_of(item).simple().to_string().starts_with(&prefix));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only.clone()),
        _ => None,
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

/// Splits `--flag value` pairs out of `args`, returning positionals and flags.
pub(crate) fn split_flags<'a>(
    args: &[&'a str],
    known: &[&str],
) -> Result<(Vec<&'a str>, Vec<(&'a str, &'a str)>), CommandError> {
    let mut positionals = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        if let Some(name) = arg.strip_prefix("--") {
            if !known.contains(&name) {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{}`",
                    arg
                )));
            }
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("missing value for `{}`", arg))
            })?;
            flags.push((name, value));
        } else {
            positionals.push(arg);
        }
    }
    Ok((positionals, flags))
}

pub(crate) fn flag<'a>(flags: &[(&'a str, &'a str)], name: &str) -> Option<&'a str> {
    flags
        .iter()
        .rev()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
}
