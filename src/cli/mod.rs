//! Interactive and scripted shell over [`FinanceState`](crate::state::FinanceState).

pub mod commands;
pub mod core;
pub mod output;
pub mod registry;
mod shell;
pub mod table;

pub use self::core::{CliError, CliMode, CommandError, ShellContext};
pub use shell::run_cli;
