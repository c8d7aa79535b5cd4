use std::path::PathBuf;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, section as output_section, OutputPreferences};
use crate::cli::registry::CommandEntry;
use crate::config::Config;
use crate::store::MutationOrdering;

const USAGE: &str = "config <show | set KEY VALUE>";
const KEYS: &str = "locale, currency, ordering, load-ms, mutation-ms, seed-dir, color, quiet";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change saved preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            show(context);
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => set(context, key, &value.join(" ")),
        _ => Err(CommandError::usage(USAGE)),
    }
}

fn show(context: &ShellContext) {
    let config = &context.config;
    output_section("Configuration");
    output::info(format!("  file        : {}", context.config_manager.path().display()));
    output::info(format!("  locale      : {}", config.locale));
    output::info(format!("  currency    : {}", config.currency));
    output::info(format!("  ordering    : {}", ordering_name(config.ordering)));
    output::info(format!("  load-ms     : {}", config.latency.load_ms));
    output::info(format!("  mutation-ms : {}", config.latency.mutation_ms));
    let seed = config
        .seed_dir
        .as_ref()
        .map_or_else(|| "built-in".to_string(), |dir| dir.display().to_string());
    output::info(format!("  seed-dir    : {}", seed));
    output::info(format!("  color       : {}", on_off(config.color)));
    output::info(format!("  quiet       : {}", on_off(config.quiet)));
}

/// Whether a changed setting is visible right away or only after a restart.
#[derive(Debug, PartialEq, Eq)]
enum Applies {
    Now,
    NextStart,
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let key = key.to_ascii_lowercase();
    let applies = apply(&mut context.config, &key, value)?;
    context.config_manager.save(&context.config)?;
    tracing::info!(%key, %value, "config saved");

    match key.as_str() {
        "locale" => context.locale = context.config.locale_config(),
        "currency" => context.currency = context.config.currency_code(),
        "color" | "quiet" => output::set_preferences(OutputPreferences {
            color: context.config.color && context.is_interactive(),
            quiet_mode: context.config.quiet,
        }),
        _ => {}
    }

    output::success(format!("Saved {} = {}.", key, value));
    if applies == Applies::NextStart {
        output::hint("Takes effect the next time the shell starts.");
    }
    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<Applies, CommandError> {
    match key {
        "locale" => config.locale = value.to_string(),
        "currency" => config.currency = value.trim().to_uppercase(),
        "color" => config.color = parse_switch(value)?,
        "quiet" => config.quiet = parse_switch(value)?,
        "ordering" => {
            config.ordering = match value.to_ascii_lowercase().as_str() {
                "interleaved" => MutationOrdering::Interleaved,
                "serialized" => MutationOrdering::Serialized,
                _ => return Err(invalid(key, value, "interleaved or serialized")),
            };
            return Ok(Applies::NextStart);
        }
        "load-ms" => {
            config.latency.load_ms = parse_millis(key, value)?;
            return Ok(Applies::NextStart);
        }
        "mutation-ms" => {
            config.latency.mutation_ms = parse_millis(key, value)?;
            return Ok(Applies::NextStart);
        }
        "seed-dir" => {
            config.seed_dir = match value {
                "builtin" | "built-in" => None,
                path => Some(PathBuf::from(path)),
            };
            return Ok(Applies::NextStart);
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown setting `{}`; expected one of {}",
                other, KEYS
            )))
        }
    }
    Ok(Applies::Now)
}

fn parse_switch(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(invalid("switch", value, "on or off")),
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64, CommandError> {
    value
        .parse()
        .map_err(|_| invalid(key, value, "a whole number of milliseconds"))
}

fn invalid(key: &str, value: &str, expected: &str) -> CommandError {
    CommandError::InvalidArguments(format!(
        "invalid value `{}` for {}: expected {}",
        value, key, expected
    ))
}

fn ordering_name(ordering: MutationOrdering) -> &'static str {
    match ordering {
        MutationOrdering::Interleaved => "interleaved",
        MutationOrdering::Serialized => "serialized",
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restart_only_settings_are_flagged() {
        let mut config = Config::default();
        assert_eq!(apply(&mut config, "quiet", "on").unwrap(), Applies::Now);
        assert_eq!(
            apply(&mut config, "ordering", "Serialized").unwrap(),
            Applies::NextStart
        );
        assert!(config.quiet);
        assert_eq!(config.ordering, MutationOrdering::Serialized);
    }

    #[test]
    fn bad_values_leave_config_unchanged() {
        let mut config = Config::default();
        assert!(apply(&mut config, "load-ms", "fast").is_err());
        assert!(apply(&mut config, "color", "maybe").is_err());
        assert!(apply(&mut config, "theme", "dark").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn seed_dir_can_be_reset_to_builtin() {
        let mut config = Config::default();
        apply(&mut config, "seed-dir", "/tmp/data").unwrap();
        assert_eq!(config.seed_dir, Some(PathBuf::from("/tmp/data")));
        apply(&mut config, "seed-dir", "builtin").unwrap();
        assert_eq!(config.seed_dir, None);
    }
}
