//! kiln's entry point: loads a configuration and replays its actions.

use kiln::{
    builder::Builder,
    cli::{get_args, Args},
    commands::ShellRunner,
    config::get_config,
    error::{default_error_handler, Result},
    renderer::MiniJinjaRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Info
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// # Flow
/// 1. Loads the configuration file from the config directory
/// 2. Builds the folder registry and template stack
/// 3. Decodes the configured action records
/// 4. Replays them (or lists them on a dry run)
fn run(args: Args) -> Result<()> {
    let renderer = MiniJinjaRenderer::new();
    let runner = ShellRunner::new();

    let config_file = get_config(&args.config_dir)?;
    let config = config_file.configuration(&args.config_dir)?;
    let mut actions = config_file.actions()?;

    let mut builder = Builder::new(&config, &renderer, &runner);
    builder.debug();

    if args.dry_run {
        for (index, record) in actions.records().iter().enumerate() {
            let state = if record.played { "played" } else { "pending" };
            println!("{index:>3}. {} ({state})", record.action.kind());
        }
        return Ok(());
    }

    let summary = actions.play_all(&mut builder);
    println!(
        "Generation completed: {} action(s) executed, {} failed, {} skipped.",
        summary.executed, summary.failed, summary.skipped
    );
    Ok(())
}
