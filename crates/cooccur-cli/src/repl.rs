//! A small interactive shell over one co-occurrence graph.
//!
//! By default we use `rustyline` for line editing and tab completion.
//! A minimal stdin-based fallback exists behind `--no-default-features`.
//!
//! The graph is owned by [`ReplState`] and handed to every command by
//! reference; there is no process-wide graph.

use anyhow::{anyhow, Result};
use colored::Colorize;
use cooccur_graph::Graph;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const PROMPT: &str = "cooccur> ";

pub struct ReplState {
    pub graph: Graph,
}

impl ReplState {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }
}

enum ReplControl {
    Continue,
    Exit,
}

pub fn cmd_repl(state: &mut ReplState) -> Result<()> {
    #[cfg(feature = "repl-rustyline")]
    {
        return cmd_repl_rustyline(state);
    }
    #[cfg(not(feature = "repl-rustyline"))]
    {
        return cmd_repl_simple(state);
    }
}

pub fn cmd_repl_script(
    state: &mut ReplState,
    script: Option<&PathBuf>,
    commands: &[String],
    continue_on_error: bool,
    quiet: bool,
) -> Result<()> {
    let mut lines: Vec<String> = Vec::new();

    if let Some(script_path) = script {
        let text = if script_path.as_os_str() == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            fs::read_to_string(script_path)?
        };
        lines.extend(text.lines().map(str::to_string));
    }
    lines.extend(commands.iter().cloned());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_lines(state, &lines, continue_on_error, quiet, &mut out)
}

fn run_lines(
    state: &mut ReplState,
    lines: &[String],
    continue_on_error: bool,
    quiet: bool,
    out: &mut dyn Write,
) -> Result<()> {
    for (idx, raw_line) in lines.iter().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if !quiet {
            writeln!(out, "{PROMPT}{line}")?;
        }
        debug!(line = idx + 1, command = line, "running scripted command");

        let result = split_command_line(line)
            .and_then(|tokens| dispatch_repl_line_result(state, &tokens, out));
        match result {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => {
                if continue_on_error {
                    eprintln!("{} {e:#}", "error:".red().bold());
                } else {
                    return Err(anyhow!("script failed at line {}: {e:#}", idx + 1));
                }
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "repl-rustyline"))]
fn cmd_repl_simple(state: &mut ReplState) -> Result<()> {
    print_banner(state);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("{}", PROMPT.cyan().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = split_command_line(line)
            .and_then(|tokens| dispatch_repl_line_result(state, &tokens, &mut stdout));
        match result {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => eprintln!("{} {e:#}", "error:".red().bold()),
        }
    }

    Ok(())
}

#[cfg(feature = "repl-rustyline")]
fn cmd_repl_rustyline(state: &mut ReplState) -> Result<()> {
    use rustyline::error::ReadlineError;
    use rustyline::Editor;

    print_banner(state);

    let mut rl: Editor<ReplLineHelper, rustyline::history::DefaultHistory> =
        Editor::new().map_err(|e| anyhow!("failed to init rustyline: {e}"))?;
    rl.set_helper(Some(ReplLineHelper::new()));

    let mut known_entities = usize::MAX;
    let mut stdout = io::stdout();
    loop {
        // Entity names only change when the graph grows.
        if known_entities != state.graph.len() {
            known_entities = state.graph.len();
            if let Some(helper) = rl.helper_mut() {
                helper.refresh_names(&state.graph);
            }
        }

        let line = match rl.readline(PROMPT) {
            Ok(l) => l,
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(e) => return Err(anyhow!("readline error: {e}")),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        rl.add_history_entry(line)
            .map_err(|e| anyhow!("failed to record history: {e}"))?;

        let result = split_command_line(line)
            .and_then(|tokens| dispatch_repl_line_result(state, &tokens, &mut stdout));
        match result {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => eprintln!("{} {e:#}", "error:".red().bold()),
        }
    }

    Ok(())
}

fn print_banner(state: &ReplState) {
    println!("{}", "cooccur shell".green().bold());
    println!(
        "{} entities from {}. Type `help` for commands, `exit` to quit.\n",
        state.graph.len(),
        state.graph.source_path().display()
    );
}

/// Numbered choices of the classic menu map onto command words.
fn resolve_alias(cmd: &str) -> &str {
    match cmd {
        "1" => "read",
        "2" => "save",
        "3" => "describe",
        "4" => "graph",
        "5" => "top",
        other => other,
    }
}

fn dispatch_repl_line_result(
    state: &mut ReplState,
    tokens: &[String],
    out: &mut dyn Write,
) -> Result<ReplControl> {
    let Some((cmd, args)) = tokens.split_first() else {
        return Ok(ReplControl::Continue);
    };

    match resolve_alias(cmd) {
        "help" | "?" => print_help(out)?,
        "exit" | "quit" => return Ok(ReplControl::Exit),
        "read" => {
            if args.is_empty() {
                return Err(anyhow!("usage: read <path>..."));
            }
            for path in args {
                cmd_read(state, Path::new(path), out)?;
            }
        }
        "save" => {
            no_args("save", args)?;
            cmd_save(state, out)?;
        }
        "describe" => {
            let name = one_arg("describe", "<name>", args)?;
            writeln!(out, "{}", state.graph.describe_entity(name))?;
        }
        "graph" => {
            no_args("graph", args)?;
            write!(out, "{}", state.graph.describe())?;
        }
        "top" => cmd_top(state, args, out)?,
        "stats" => {
            no_args("stats", args)?;
            cmd_stats(state, out)?;
        }
        _ => return Err(anyhow!("unknown command `{cmd}` (type `help`)")),
    }

    Ok(ReplControl::Continue)
}

fn no_args(cmd: &str, args: &[String]) -> Result<()> {
    if !args.is_empty() {
        return Err(anyhow!("usage: {cmd}"));
    }
    Ok(())
}

fn one_arg<'a>(cmd: &str, usage: &str, args: &'a [String]) -> Result<&'a str> {
    match args {
        [arg] => Ok(arg.as_str()),
        _ => Err(anyhow!("usage: {cmd} {usage}")),
    }
}

pub fn cmd_read(state: &mut ReplState, path: &Path, out: &mut dyn Write) -> Result<()> {
    let report = state.graph.read(path)?;
    writeln!(
        out,
        "read {} words in {} sentences from {}, added {} new entities ({} ms)",
        report.words,
        report.sentences,
        path.display(),
        report.new_entities,
        report.elapsed.as_millis()
    )?;
    Ok(())
}

fn cmd_save(state: &ReplState, out: &mut dyn Write) -> Result<()> {
    let report = state.graph.save()?;
    writeln!(
        out,
        "saved {} entities and {} links to {} ({})",
        report.entities,
        report.links,
        report.path.display(),
        report.format.as_str()
    )?;
    Ok(())
}

fn cmd_top(state: &ReplState, args: &[String], out: &mut dyn Write) -> Result<()> {
    let (name, count) = match args {
        [name] => (name, state.graph.config().default_top_relations),
        [name, n] => {
            let count = n
                .parse::<usize>()
                .map_err(|_| anyhow!("invalid relation count `{n}`"))?;
            (name, count)
        }
        _ => return Err(anyhow!("usage: top <name> [count]")),
    };

    let Some(relations) = state.graph.top_relations(name, count) else {
        writeln!(out, "Entity '{name}' not found")?;
        return Ok(());
    };
    for link in relations {
        writeln!(out, "{}: {}", link.weight(), link.target())?;
    }
    Ok(())
}

fn cmd_stats(state: &ReplState, out: &mut dyn Write) -> Result<()> {
    let stats = state.graph.stats();
    writeln!(
        out,
        "entities={} links={} total_weight={} snapshot={}",
        stats.entities,
        stats.links,
        stats.total_weight,
        state.graph.source_path().display()
    )?;
    Ok(())
}

fn print_help(out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        r#"Commands:
  help | ?                  Show this help
  exit | quit               Exit the shell

  1 | read <path>...        Read text files into the graph
  2 | save                  Save the graph topology to its snapshot file
  3 | describe <name>       Show an entity and its weighted links
  4 | graph                 Show every entity and its links
  5 | top <name> [count]    Strongest relations of an entity (default count from config)
  stats                     Entity, link and weight totals

Names are matched case-insensitively. Quote paths containing spaces."#
    )?;
    Ok(())
}

/// Break a shell line into words.
///
/// Single or double quotes group words containing spaces, and a backslash
/// takes the next character literally. An unclosed quote is an error.
fn split_command_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut word: Option<String> = None;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (_, '\\') => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| anyhow!("dangling `\\` at end of line"))?;
                word.get_or_insert_with(String::new).push(escaped);
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => word.get_or_insert_with(String::new).push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                word.get_or_insert_with(String::new);
            }
            (None, c) if c.is_whitespace() => words.extend(word.take()),
            (None, c) => word.get_or_insert_with(String::new).push(c),
        }
    }

    if let Some(q) = quote {
        return Err(anyhow!("unclosed {q} quote"));
    }
    words.extend(word);
    Ok(words)
}

// =============================================================================
// Tab completion (rustyline)
// =============================================================================

#[cfg(feature = "repl-rustyline")]
const COMMANDS: &[&str] = &[
    "help", "exit", "quit", "read", "save", "describe", "graph", "top", "stats",
];

#[cfg(feature = "repl-rustyline")]
#[derive(rustyline::Helper, rustyline::Highlighter, rustyline::Hinter, rustyline::Validator)]
struct ReplLineHelper {
    files: rustyline::completion::FilenameCompleter,
    names: Vec<String>,
}

#[cfg(feature = "repl-rustyline")]
impl ReplLineHelper {
    fn new() -> Self {
        Self {
            files: rustyline::completion::FilenameCompleter::new(),
            names: Vec::new(),
        }
    }

    fn refresh_names(&mut self, graph: &Graph) {
        self.names = graph
            .entities()
            .map(|e| e.name().to_string())
            .take(4096)
            .collect();
    }

    fn pairs_from_prefix<'a, I>(items: I, prefix: &str) -> Vec<rustyline::completion::Pair>
    where
        I: IntoIterator<Item = &'a str>,
    {
        items
            .into_iter()
            .filter(|item| item.starts_with(prefix))
            .map(|item| rustyline::completion::Pair {
                display: item.to_string(),
                replacement: item.to_string(),
            })
            .collect()
    }
}

#[cfg(feature = "repl-rustyline")]
impl rustyline::completion::Completer for ReplLineHelper {
    type Candidate = rustyline::completion::Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &line[start..pos];
        let tokens: Vec<&str> = line[..start].split_whitespace().collect();

        let Some(cmd) = tokens.first() else {
            return Ok((start, Self::pairs_from_prefix(COMMANDS.iter().copied(), word)));
        };

        match resolve_alias(cmd) {
            "read" => rustyline::completion::Completer::complete(&self.files, line, pos, ctx),
            "describe" | "top" if tokens.len() == 1 => {
                let prefix = word.to_lowercase();
                Ok((
                    start,
                    Self::pairs_from_prefix(self.names.iter().map(String::as_str), &prefix),
                ))
            }
            _ => Ok((start, Vec::new())),
        }
    }
}
