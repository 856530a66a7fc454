mod commands;
mod date_phrase;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tdx_core::{TdxConfig, Transition};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::Context;
use commands::add::AddArgs;
use commands::list::ListArgs;

#[derive(Parser)]
#[command(name = "tdx", version)]
#[command(about = "Todo manager for vdir (iCalendar) directories")]
struct Cli {
    /// Path to the vdir folder (overrides TDX_PATH and the config file)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a todo
    #[command(visible_alias = "a")]
    Add(AddArgs),

    /// List todos (the default command)
    #[command(visible_aliases = ["ls", "l"])]
    List(ListArgs),

    /// Mark todos as completed
    ///
    /// Todos that are already completed or cancelled are refused. Nothing is
    /// written unless every listed todo can be completed.
    #[command(visible_alias = "do")]
    Done {
        #[arg(required = true)]
        ids: Vec<u32>,
    },

    /// Mark completed or cancelled todos as NEEDS-ACTION again
    ///
    /// Open todos are refused. Nothing is written unless every listed todo
    /// can be reopened.
    Undo {
        #[arg(required = true)]
        ids: Vec<u32>,
    },

    /// Mark todos as cancelled
    ///
    /// Todos that are already completed or cancelled are refused. Nothing is
    /// written unless every listed todo can be cancelled.
    Cancel {
        #[arg(required = true)]
        ids: Vec<u32>,
    },

    /// Toggle todos between completed and NEEDS-ACTION
    Toggle {
        #[arg(required = true)]
        ids: Vec<u32>,
    },

    /// Edit a todo in $VISUAL or $EDITOR
    #[command(visible_alias = "e")]
    Edit { id: u32 },

    /// Show every property of todos, by ID or file path
    Show {
        #[arg(required = true)]
        targets: Vec<String>,

        /// Print as JSON
        #[arg(long)]
        raw: bool,
    },

    /// Delete todos
    #[command(visible_aliases = ["del", "rm"])]
    Delete {
        #[arg(required = true)]
        ids: Vec<u32>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete completed and cancelled todos
    Purge {
        /// Only purge this list
        #[arg(short, long)]
        list: Option<String>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    init_logging();

    let mut config = TdxConfig::load()?;
    let args = with_default_opts(std::env::args().collect(), &config);
    let cli = Cli::parse_from(args);

    if let Some(path) = cli.path {
        config.path = path;
    }
    let root = config.vdir_path();
    debug!(root = %root.display(), "using vdir");

    let ctx = Context { config, root };

    match cli.command {
        Commands::Add(args) => commands::add::run(&ctx, args),
        Commands::List(args) => commands::list::run(&ctx, args),
        Commands::Done { ids } => commands::transition::run(&ctx, &ids, Transition::Complete),
        Commands::Undo { ids } => commands::transition::run(&ctx, &ids, Transition::Reopen),
        Commands::Cancel { ids } => commands::transition::run(&ctx, &ids, Transition::Cancel),
        Commands::Toggle { ids } => commands::transition::run(&ctx, &ids, Transition::Toggle),
        Commands::Edit { id } => commands::edit::run(&ctx, id),
        Commands::Show { targets, raw } => commands::show::run(&ctx, &targets, raw),
        Commands::Delete { ids, yes } => commands::delete::run(&ctx, &ids, yes),
        Commands::Purge { list, yes } => commands::purge::run(&ctx, list.as_deref(), yes),
    }
}

/// Log to stderr, filtered by TDX_LOG (default: warn).
fn init_logging() {
    let filter = EnvFilter::try_from_env("TDX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

const ADD_NAMES: [&str; 2] = ["add", "a"];
const LIST_NAMES: [&str; 3] = ["list", "ls", "l"];
const OTHER_NAMES: [&str; 13] = [
    "done", "do", "undo", "cancel", "toggle", "edit", "e", "show", "delete", "del", "rm", "purge",
    "help",
];
const INFO_FLAGS: [&str; 4] = ["-h", "--help", "-V", "--version"];

/// Splice the configured default options in after the subcommand, and fall
/// back to `list` when no subcommand is given.
fn with_default_opts(mut args: Vec<String>, config: &TdxConfig) -> Vec<String> {
    let is_command = |arg: &String| {
        let arg = arg.as_str();
        ADD_NAMES.contains(&arg) || LIST_NAMES.contains(&arg) || OTHER_NAMES.contains(&arg)
    };
    let split = |opts: &Option<String>| -> Vec<String> {
        opts.as_deref()
            .map(|o| o.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    };

    match args.iter().skip(1).position(is_command).map(|i| i + 1) {
        Some(i) => {
            let name = args[i].as_str();
            let opts = if ADD_NAMES.contains(&name) {
                split(&config.add_opts)
            } else if LIST_NAMES.contains(&name) {
                split(&config.list_opts)
            } else {
                Vec::new()
            };
            args.splice(i + 1..i + 1, opts);
        }
        None if !args.iter().any(|a| INFO_FLAGS.contains(&a.as_str())) => {
            args.push("list".to_string());
            args.extend(split(&config.list_opts));
        }
        None => {}
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn config_with_opts() -> TdxConfig {
        TdxConfig {
            list_opts: Some("--sort due -m".to_string()),
            add_opts: Some("-l inbox".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_subcommand_lists() {
        let out = with_default_opts(args(&["tdx", "-p", "/tmp/v"]), &config_with_opts());
        assert_eq!(out, args(&["tdx", "-p", "/tmp/v", "list", "--sort", "due", "-m"]));
    }

    #[test]
    fn test_opts_go_before_user_args() {
        let out = with_default_opts(args(&["tdx", "add", "buy", "milk"]), &config_with_opts());
        assert_eq!(out, args(&["tdx", "add", "-l", "inbox", "buy", "milk"]));
    }

    #[test]
    fn test_other_commands_untouched() {
        let input = args(&["tdx", "done", "3"]);
        assert_eq!(with_default_opts(input.clone(), &config_with_opts()), input);
    }

    #[test]
    fn test_help_is_not_rewritten() {
        let input = args(&["tdx", "--help"]);
        assert_eq!(with_default_opts(input.clone(), &config_with_opts()), input);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::parse_from(args(&["tdx", "ls", "-s", "ANY", "-t", "work", "milk"]));
        match cli.command {
            Commands::List(list) => {
                assert_eq!(list.status.as_deref(), Some("ANY"));
                assert_eq!(list.tag, vec!["work"]);
                assert_eq!(list.query, vec!["milk"]);
            }
            _ => panic!("expected list"),
        }
    }
}
