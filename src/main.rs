mod commands;
mod config;
mod gh;
mod github;
mod prompt;
mod registry;
mod utils;

#[cfg(test)]
mod testing;

use std::process::ExitCode;

use clap::Parser;
use commands::{Opts, FAILURE};
use log::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let opts = Opts::parse();
    env_logger::builder()
        .filter_level(opts.verbose.log_level_filter())
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();

    match gh::cli(opts).await {
        Ok(status) => ExitCode::from(status),
        Err(e) => match e.downcast_ref::<clap::Error>() {
            Some(usage) => usage.exit(),
            None => {
                error!("{e:#}");
                ExitCode::from(FAILURE)
            }
        },
    }
}
