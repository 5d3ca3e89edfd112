//! Command-line surface: mode flags, helper subcommands and dispatch.

use crate::calculator::{self, Calculator};
use crate::config::Config;
use crate::helpers;
use crate::{gui, repl};
use anyhow::{Context, anyhow};
use clap::{ArgGroup, CommandFactory, Parser, Subcommand};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

const DEMO_EXPRESSIONS: [&str; 6] = [
    "2+2",
    "sqrt(16)",
    "sin(pi/2) + cos(0)",
    "pow(2, 8)",
    "10 % 3",
    "log(100, 10)",
];

#[derive(Parser, Debug)]
#[command(name = "calcpad")]
#[command(about = "Safe arithmetic calculator with an interactive loop and a graphical keypad")]
#[command(version)]
#[command(group(ArgGroup::new("mode").args(["cli", "gui", "expr"])))]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    /// Run the interactive loop
    #[arg(long)]
    pub cli: bool,

    /// Open the graphical calculator
    #[arg(long)]
    pub gui: bool,

    /// Evaluate one expression and exit
    #[arg(long, value_name = "EXPRESSION")]
    pub expr: Option<OsString>,

    /// Also copy the result of --expr to the clipboard
    #[arg(long, requires = "expr")]
    pub copy: bool,

    /// Print results with thousands separators
    #[arg(long)]
    pub grouped: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or publish GitHub repositories
    Github {
        #[command(subcommand)]
        action: GithubAction,
    },
    /// Upload a file to an HTTP endpoint as multipart form data
    Upload {
        /// File to send as the `file` part
        file: PathBuf,

        /// Endpoint URL; defaults to `upload.endpoint` from the config file
        #[arg(long)]
        endpoint: Option<String>,

        /// Bearer token for the endpoint
        #[arg(long, env = "UPLOAD_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Extra form field, repeatable
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

#[derive(Subcommand, Debug)]
pub enum GithubAction {
    /// Create a repository owned by the token's user
    Create {
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        private: bool,

        /// Personal access token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Commit a local directory and push it to an empty remote
    Publish {
        dir: PathBuf,

        remote_url: String,

        #[arg(long, default_value = helpers::DEFAULT_COMMIT_MESSAGE)]
        message: String,
    },
}

/// The calculator front end selected by the mode flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Repl,
    Gui,
    Expr(OsString),
    Demo,
}

impl Args {
    pub fn mode(&self) -> Mode {
        if self.cli {
            Mode::Repl
        } else if self.gui {
            Mode::Gui
        } else if let Some(expr) = &self.expr {
            Mode::Expr(expr.clone())
        } else {
            Mode::Demo
        }
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    debug!(?config, "Configuration loaded");

    let mode = args.mode();
    let grouped = args.grouped || config.display.grouped;
    let copy = args.copy;
    if let Some(command) = args.command {
        return run_command(command, &config);
    }

    let calculator = Calculator::default();
    let mut out = io::stdout();
    match mode {
        Mode::Repl => repl::run(&calculator, grouped),
        Mode::Gui => {
            if let Err(err) = gui::launch(calculator) {
                warn!("{}", err);
                writeln!(out, "{}. Run with --cli or --expr instead.", err)?;
            }
            Ok(())
        }
        Mode::Expr(expr) => {
            let result = calculator.evaluate_os(&expr);
            writeln!(out, "{}", repl::render_result(&result, grouped))?;
            if copy
                && let Ok(value) = &result
                && let Err(err) = calculator::copy_to_clipboard(value)
            {
                warn!("Failed to copy result: {:#}", err);
            }
            Ok(())
        }
        Mode::Demo => {
            Args::command()
                .print_help()
                .context("Failed to print help")?;
            write_demo(&calculator, &mut out, grouped)?;
            Ok(())
        }
    }
}

/// Print the demo block shown when no mode is given.
pub fn write_demo<W: Write>(calculator: &Calculator, out: &mut W, grouped: bool) -> io::Result<()> {
    writeln!(out, "\nDemo expressions you can try:")?;
    for expression in DEMO_EXPRESSIONS {
        match calculator.evaluate(expression) {
            Ok(value) => {
                let rendered = repl::render_result(&Ok(value), grouped);
                writeln!(out, "{}  ->  {}", expression, rendered)?;
            }
            Err(err) => debug!(expression, %err, "Skipping demo expression"),
        }
    }
    Ok(())
}

fn run_command(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Github {
            action:
                GithubAction::Create {
                    name,
                    description,
                    private,
                    token,
                },
        } => {
            let repo = helpers::create_github_repo(
                &config.github.api_url,
                &token,
                &name,
                &description,
                private,
            )
            .with_context(|| format!("Failed to create repository '{}'", name))?;
            let url = repo
                .get("html_url")
                .and_then(|url| url.as_str())
                .unwrap_or(&name);
            println!("Created {}", url);
        }
        Command::Github {
            action:
                GithubAction::Publish {
                    dir,
                    remote_url,
                    message,
                },
        } => {
            helpers::init_and_push_local_repo(&dir, &remote_url, &message)
                .with_context(|| format!("Failed to publish {}", dir.display()))?;
            println!("Pushed {} to {}", dir.display(), remote_url);
        }
        Command::Upload {
            file,
            endpoint,
            api_key,
            fields,
        } => {
            let endpoint = endpoint
                .or_else(|| config.upload.endpoint.clone())
                .ok_or_else(|| {
                    anyhow!("No upload endpoint given; pass --endpoint or set upload.endpoint")
                })?;
            let response = helpers::upload_file(&endpoint, &file, api_key.as_deref(), &fields)
                .with_context(|| format!("Failed to upload {}", file.display()))?;
            println!("{}", response);
        }
    }
    Ok(())
}
