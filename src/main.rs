#![allow(clippy::result_large_err)]

use anyhow::Context;
use muniai::app::MuniApp;
use muniai::config::Settings;
use muniai::telemetry;
use std::path::PathBuf;

enum CliCommand {
    Run { settings_path: Option<PathBuf> },
    Help,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise telemetry")?;

    match parse_cli_args(std::env::args().skip(1))? {
        CliCommand::Run { settings_path } => {
            let settings =
                Settings::load(settings_path.as_deref()).context("failed to load settings")?;

            let app = MuniApp::initialise(settings)
                .await
                .context("failed to construct application")?;

            app.run().await.context("application runtime error")
        }
        CliCommand::Help => {
            print_help();
            Ok(())
        }
    }
}

fn parse_cli_args<I>(args: I) -> anyhow::Result<CliCommand>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut settings_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                if settings_path.is_some() {
                    anyhow::bail!("settings path specified multiple times");
                }
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("expected path after {arg}"))?;
                settings_path = Some(PathBuf::from(value));
            }
            "-h" | "--help" => return Ok(CliCommand::Help),
            other => anyhow::bail!("unrecognised argument `{other}`"),
        }
    }

    Ok(CliCommand::Run { settings_path })
}

fn print_help() {
    println!(
        "\
Usage: muniai [OPTIONS]

Options:
  -c, --config <PATH>    Settings file layered under MUNIAI_* environment variables
                         (default: config/local, optional)
  -h, --help             Print this help message
"
    );
}
