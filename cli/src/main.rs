#![cfg_attr(test, allow(unused_crate_dependencies))]

use std::process;

use args::Args;
use config::Config;
use mimalloc::MiMalloc;
use tokio::runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod args;
mod commands;
mod config;
mod report;

fn main() {
    // notifications and errors go to stderr, so color follows that stream
    colored::control::set_override(atty::is(atty::Stream::Stderr));

    if let Err(error) = try_main() {
        report::error(&error);
        process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = args::parse();
    let config = Config::load(args.config_path())?;

    init_logging(&args, &config);

    let runtime = runtime::Builder::new_current_thread().enable_all().build()?;

    runtime.block_on(commands::run(args, config))
}

fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level.or(config.log_level).unwrap_or_default();

    tracing_subscriber::registry()
        .with(args.log_format())
        .with(EnvFilter::new(level.as_filter_str()))
        .init();
}
