use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::process::ExitCode;

use image_checker::cli::{Args, CheckArgs, Command, ServeArgs};
use image_checker::config_file::ConfigFile;
use image_checker::image_check::{self, resolve_category, ImageCrateDecoder};
use image_checker::json_output::CheckResponse;
use image_checker::report;
use image_checker::server;
use image_checker::utils::{error_println, init_logging, print_banner};

/// Exit code for a rejected image
const EXIT_REJECTED: u8 = 1;
/// Exit code for a request error (unreadable image, unknown type)
const EXIT_ERROR: u8 = 2;

fn run_serve(serve_args: &ServeArgs, config_file: Option<&ConfigFile>) -> Result<ExitCode> {
    let config = serve_args.resolve(config_file)?;

    print_banner();
    log::debug!("Effective configuration: {:?}", config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .enable_all()
        .build()
        .context("Failed to initialize async runtime")?;

    log::info!("Starting {} worker threads", config.worker_threads());
    runtime.block_on(server::serve(config))?;

    Ok(ExitCode::SUCCESS)
}

fn run_check(check_args: &CheckArgs, config_file: Option<&ConfigFile>) -> Result<ExitCode> {
    let policy = check_args.transparency_policy(config_file)?;
    let bytes = fs::read(&check_args.image)
        .with_context(|| format!("Failed to read image: {}", check_args.image.display()))?;

    let decoder = ImageCrateDecoder::new(policy);
    let outcome = image_check::check_image(&decoder, &bytes, &check_args.image_type);

    match outcome {
        Ok(result) => {
            if check_args.json {
                CheckResponse::from(&result).emit();
            } else {
                let category = resolve_category(&check_args.image_type)?;
                report::print_check_report(&check_args.image, category, &result);
            }

            if result.success {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_REJECTED))
            }
        }
        Err(err) => {
            if check_args.json {
                CheckResponse::from(&err).emit();
            } else {
                error_println(&err.to_string());
                for hint in err.hints() {
                    eprintln!("        {}", hint);
                }
            }
            Ok(ExitCode::from(EXIT_ERROR))
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config_file = args.load_config_file()?;

    match &args.command {
        None => run_serve(&ServeArgs::default(), config_file.as_ref()),
        Some(Command::Serve(serve_args)) => run_serve(serve_args, config_file.as_ref()),
        Some(Command::Check(check_args)) => run_check(check_args, config_file.as_ref()),
        Some(Command::Rules) => {
            report::print_rules_table();
            Ok(ExitCode::SUCCESS)
        }
    }
}
