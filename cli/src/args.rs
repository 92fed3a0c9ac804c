use std::path::{Path, PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use gqlpen_core::{HeaderScope, KeyPress};
use tracing::Subscriber;
use tracing_subscriber::{registry::LookupSpan, Layer};

mod log;

pub(crate) use log::{LogLevel, LogStyle};

pub(crate) type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

pub(crate) fn parse() -> Args {
    Args::parse()
}

#[derive(Debug, Parser)]
#[command(name = "gqlpen", version)]
/// A GraphQL playground for the terminal
pub(crate) struct Args {
    /// Path to the TOML configuration file
    #[arg(long, short, env = "GQLPEN_CONFIG_PATH", default_value = "./gqlpen.toml")]
    pub config: PathBuf,
    /// Directory holding the saved playground state. Overrides `storage_dir` from the configuration.
    #[arg(long, env = "GQLPEN_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,
    /// Set the logging level
    #[arg(long = "log", env = "GQLPEN_LOG")]
    pub log_level: Option<LogLevel>,
    /// Set the style of log output
    #[arg(long, env = "GQLPEN_LOG_STYLE", default_value_t = LogStyle::Text)]
    pub log_style: LogStyle,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Introspect the endpoint and keep its schema
    Introspect,
    /// Send a sheet to the endpoint and print the response
    Query(QueryCommand),
    /// Browse the documentation of the schema
    Docs(DocsCommand),
    /// Manage sheets
    #[command(subcommand)]
    Sheet(SheetCommand),
    /// Print the endpoint, or change it
    Endpoint {
        /// The new GraphQL endpoint
        url: Option<String>,
    },
    /// Manage the headers sent with requests
    Header(HeaderCommand),
    /// Summarize the saved playground
    Status,
    /// Trigger keyboard shortcuts, such as `ctrl+s`
    Press {
        #[arg(required = true)]
        keys: Vec<KeyPress>,
    },
}

#[derive(Debug, ClapArgs)]
pub(crate) struct QueryCommand {
    /// Run this sheet instead of the active one, and make it active
    #[arg(long, short)]
    pub sheet: Option<usize>,
    /// Replace the content of the sheet before running it
    pub query: Option<String>,
}

#[derive(Debug, ClapArgs)]
pub(crate) struct DocsCommand {
    /// Links to follow from the root page, by field or type name. Type names are also looked up
    /// directly.
    pub path: Vec<String>,
    /// Print the whole schema as SDL instead
    #[arg(long, conflicts_with = "path")]
    pub sdl: bool,
}

#[derive(Debug, Subcommand)]
pub(crate) enum SheetCommand {
    /// List the sheets, marking the active one
    List,
    /// Add an empty sheet and make it active
    Add,
    /// Make a sheet active
    Select { index: usize },
    Rename { index: usize, name: String },
    Remove { index: usize },
    /// Replace the content of a sheet
    Edit { index: usize, content: String },
}

#[derive(Debug, ClapArgs)]
pub(crate) struct HeaderCommand {
    /// Which header list to work on
    #[arg(long, short, value_enum, default_value_t = Scope::Global)]
    pub scope: Scope,
    #[command(subcommand)]
    pub action: HeaderAction,
}

#[derive(Debug, Subcommand)]
pub(crate) enum HeaderAction {
    List,
    Add { key: String, value: String },
    Remove { index: usize },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub(crate) enum Scope {
    /// Sent with every request
    Global,
    /// Sent when introspecting
    Introspection,
    /// Sent with queries
    Query,
}

impl From<Scope> for HeaderScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Global => HeaderScope::Global,
            Scope::Introspection => HeaderScope::Introspection,
            Scope::Query => HeaderScope::Query,
        }
    }
}

impl Args {
    pub fn config_path(&self) -> &Path {
        &self.config
    }

    pub fn log_format<S>(&self) -> BoxedLayer<S>
    where
        S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync,
    {
        // Command output goes to stdout, logs never do.
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        match self.log_style {
            LogStyle::Pretty => layer.pretty().boxed(),
            // for interactive terminals we provide colored output
            LogStyle::Text if atty::is(atty::Stream::Stderr) => layer.with_ansi(true).boxed(),
            LogStyle::Text => layer.with_ansi(false).boxed(),
            LogStyle::Json => layer.json().boxed(),
        }
    }
}
