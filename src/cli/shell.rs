use std::io::{self, BufRead, StdinLock};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    history::DefaultHistory,
    Cmd, Context as ReadlineContext, Editor, Helper, Highlighter, Hinter, KeyEvent, Validator,
};

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext, SCRIPT_ENV};
use crate::cli::output;

/// Runs the shell, reading commands from stdin when `FINANCE_TRACKER_CLI_SCRIPT`
/// is set and from an interactive line editor otherwise.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    tracing::info!(?mode, "shell started");

    match mode {
        CliMode::Interactive => {
            output::info("Finance Tracker shell. Type `help` for commands.");
            let source = EditorSource::new(&context)?;
            drive(&mut context, source)
        }
        CliMode::Script => drive(&mut context, ScriptSource::new()),
    }
}

/// What a line source produced for one prompt.
enum Input {
    Line(String),
    Interrupted,
    Closed,
}

trait LineSource {
    fn next(&mut self, prompt: &str) -> Result<Input, CliError>;
}

struct EditorSource {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl EditorSource {
    fn new(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(CommandHelper::new(context.command_names())));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn next(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.trim()).ok();
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                Ok(Input::Closed)
            }
            Err(err) => Err(err.into()),
        }
    }
}

struct ScriptSource {
    stdin: StdinLock<'static>,
}

impl ScriptSource {
    fn new() -> Self {
        Self {
            stdin: io::stdin().lock(),
        }
    }
}

impl LineSource for ScriptSource {
    fn next(&mut self, _prompt: &str) -> Result<Input, CliError> {
        let mut line = String::new();
        if self.stdin.read_line(&mut line)? == 0 {
            return Ok(Input::Closed);
        }
        // comments only make sense in scripts
        if line.trim_start().starts_with('#') {
            line.clear();
        }
        Ok(Input::Line(line))
    }
}

fn drive(context: &mut ShellContext, mut source: impl LineSource) -> Result<(), CliError> {
    while context.running {
        let line = match source.next(&context.prompt())? {
            Input::Line(line) => line,
            Input::Interrupted if context.confirm_exit()? => break,
            Input::Interrupted => continue,
            Input::Closed => break,
        };
        if let LoopControl::Exit = execute(context, line.trim())? {
            context.running = false;
        }
    }
    Ok(())
}

/// Runs one command line; command failures are reported, never propagated.
fn execute(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not parse `{}`: {}", line, err));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    let command = raw.to_lowercase();
    tracing::debug!(%command, args = rest.len(), "dispatching");
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

/// Second-word completions for commands that take a subcommand.
const SUBCOMMANDS: &[(&str, &[&str])] = &[
    ("category", &["add", "rename", "delete", "list"]),
    ("transaction", &["add", "edit", "delete"]),
    ("config", &["show", "set"]),
];

#[derive(Helper, Hinter, Highlighter, Validator)]
struct CommandHelper {
    commands: Vec<&'static str>,
}

impl CommandHelper {
    fn new(mut commands: Vec<&'static str>) -> Self {
        commands.sort_unstable();
        commands.dedup();
        Self { commands }
    }

    /// Words that may follow `previous`, or top-level commands when nothing
    /// has been typed yet.
    fn candidates(&self, previous: &[&str]) -> &[&'static str] {
        match previous {
            [] | ["help"] => self.commands.as_slice(),
            [command] => SUBCOMMANDS
                .iter()
                .find(|(name, _)| command.eq_ignore_ascii_case(name))
                .map_or(&[][..], |(_, subs)| *subs),
            _ => &[],
        }
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        let start = typed.rfind(char::is_whitespace).map_or(0, |idx| idx + 1);
        let partial = typed[start..].to_ascii_lowercase();
        let previous: Vec<&str> = typed[..start].split_whitespace().collect();

        let matches = self
            .candidates(&previous)
            .iter()
            .filter(|word| word.starts_with(&partial))
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((start, matches))
    }
}
