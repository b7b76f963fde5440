use std::process::ExitCode;

use log::LevelFilter;
use mcupload::{PublishError, cli::Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    match mcupload::cli::run_cli(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<PublishError>() {
        return e.exit_code();
    }
    if err.downcast_ref::<url::ParseError>().is_some() {
        return 2;
    }
    1
}
