//! vrtrace command-line entry point.
//!
//! Run with: `vrtrace scene.obj --frames 300 --preview preview.png`

#![cfg_attr(test, allow(clippy::float_cmp))]

use std::process::ExitCode;

use clap::Parser;
use vrtrace::{load_mesh, Config, RaycastRenderer, Result, Session, SimulatedHmd};

mod cli;

use cli::Cli;

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    let mesh = load_mesh(&cli.mesh)?;
    let display = SimulatedHmd::new(config.headset.clone())?;
    let renderer =
        RaycastRenderer::new(config.options.background_color).with_shade_mode(cli.shade.into());

    let mut session = Session::with_renderer(&config.options, display, renderer, &mesh)?;
    let summary = session.run()?;
    log::info!(
        "done: {} frames{}",
        summary.frames,
        if summary.quit_requested { " (quit requested)" } else { "" }
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("vrtrace: {err}");
            ExitCode::FAILURE
        }
    }
}
