mod app;
mod cli;
mod data;
mod render;
mod state;
mod style;
mod ui;

use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use cli::Args;
use data::error::DataError;
use data::loader;
use state::ViewerState;

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    log::debug!("{args:?}");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<DataError>() {
            Some(err @ DataError::MissingInput(_)) => {
                println!("{err}");
                ExitCode::SUCCESS
            }
            Some(err @ DataError::IndexOutOfRange { .. }) => {
                println!();
                println!("{err}");
                println!();
                ExitCode::from(1)
            }
            _ => {
                log::error!("{e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run(args: &Args) -> Result<()> {
    let figure = loader::load(&args.input, args.index)?;

    if let Some(path) = &args.dump_json {
        figure.write_json(path)?;
        log::info!("Figure data written to {}", path.display());
    }

    render::render_png(&figure, &args.output).context("rendering figure")?;
    println!("Figure saved in file {}", args.output.display());

    if !args.batch {
        app::run_viewer(ViewerState::new(figure, args.output.clone()))
            .map_err(|e| anyhow!("viewer failed: {e}"))?;
    }

    Ok(())
}
