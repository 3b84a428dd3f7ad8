use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::ArgMatches;
use log::LevelFilter;

use cardio_cli::cli::build_cli;
use cardio_cli::commands::{batch, check, demo, predict};
use cardio_cli::input::{config_from_arguments, patient_from_arguments};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CARDIO_LOG", "error,cardio=info"))
        .init();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("predict", sub_m)) => exit_on_error("Prediction", handle_predict(sub_m)),
        Some(("batch", sub_m)) => exit_on_error("Batch scoring", handle_batch(sub_m)),
        Some(("check", sub_m)) => exit_on_error("Artifact check", handle_check(sub_m)),
        Some(("demo", sub_m)) => exit_on_error("Demo", handle_demo(sub_m)),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn exit_on_error(what: &str, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("{} failed: {:#}", what, e);
            std::process::exit(1)
        }
    }
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let config = config_from_arguments(matches)?;
    let patient = patient_from_arguments(matches)?;
    predict::run_predict(&config, &patient, matches.get_flag("json"), &mut io::stdout().lock())?;
    Ok(())
}

fn handle_batch(matches: &ArgMatches) -> Result<()> {
    let config = config_from_arguments(matches)?;
    let input: &PathBuf = matches
        .get_one("input")
        .ok_or_else(|| anyhow::anyhow!("Missing patients file"))?;
    let output: Option<&PathBuf> = matches.get_one("output_file");
    log::info!("[Cardio] Batch scoring: {:?}", input);
    batch::run_batch(&config, input, output.map(PathBuf::as_path))?;
    Ok(())
}

fn handle_check(matches: &ArgMatches) -> Result<()> {
    let config = config_from_arguments(matches)?;
    check::run_check(&config, &mut io::stdout().lock())?;
    Ok(())
}

fn handle_demo(matches: &ArgMatches) -> Result<()> {
    let config = config_from_arguments(matches)?;
    demo::run_demo(&config, matches.get_flag("json"), &mut io::stdout().lock())?;
    Ok(())
}
