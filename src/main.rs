mod api;
mod app;
mod cli;
mod domain;
mod infra;
#[cfg(test)]
mod test_support;
mod ui;
mod usecases;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    infra::secrets::install_panic_redaction_hook();

    let cli = cli::Cli::parse();
    match app::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!(
                "agrolens: {}",
                infra::secrets::redact_text(&format!("{error:#}"))
            );
            ExitCode::FAILURE
        }
    }
}
