// Entrypoint for the CLI application.
// - Keeps `main` small: resolve settings, build the API client and hand it
//   to the run driver together with the console reporter.
// - Fatal setup errors exit with 1, an interrupted run with 130.

use anyhow::Context;
use clap::Parser;
use photo_batch_uploader::api::ApiClient;
use photo_batch_uploader::cli::{Cli, Command};
use photo_batch_uploader::config::RunConfig;
use photo_batch_uploader::driver;
use photo_batch_uploader::interrupt::Interrupt;
use photo_batch_uploader::report::{self, ConsoleReporter};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();
    photo_batch_uploader::init_tracing(cli.common.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = RunConfig::from_cli(cli)?;
    let client = ApiClient::new(&config.api).context("Failed to set up the upload client")?;
    tracing::debug!(url = client.upload_url(), "upload endpoint");

    let title = match cli.command {
        Command::Upload { .. } => "Photo Upload",
        Command::Stress { .. } => "Photo Upload Stress Test",
    };
    report::print_banner(title, &config.api.event_id, &config.api.masked_key());

    let photos = driver::collect_photos(&config)?;
    let plan = driver::plan_run(&config, &photos);

    println!();
    if cli.common.yes {
        println!("✅ Auto-confirming upload of {} photos...", photos.len());
    } else if !report::confirm_start(photos.len())? {
        println!("Nothing uploaded.");
        return Ok(ExitCode::SUCCESS);
    }

    let interrupt = Interrupt::install_ctrlc()?;
    let mut reporter = ConsoleReporter::new();
    let summary = driver::execute(
        &config,
        &plan,
        &photos,
        Arc::new(client),
        &mut reporter,
        &interrupt,
        &mut rand::thread_rng(),
    );

    if summary.interrupted {
        Ok(ExitCode::from(130))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
