use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::image_check::TransparencyPolicy;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TransparencyMode {
    /// Count pixels whose alpha is exactly 0
    #[value(name = "fully-transparent")]
    FullyTransparent,
    /// Count pixels whose alpha is below full opacity
    #[value(name = "below-opaque")]
    BelowOpaque,
}

impl From<TransparencyMode> for TransparencyPolicy {
    fn from(mode: TransparencyMode) -> Self {
        match mode {
            TransparencyMode::FullyTransparent => TransparencyPolicy::FullyTransparent,
            TransparencyMode::BelowOpaque => TransparencyPolicy::BelowOpaque,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "image-checker",
    version,
    about = "Checks portrait and ID-photo uploads against fixed format, size and transparency rules",
    long_about = "
Image Checker

Validates that an uploaded photo is a PNG with the exact pixel size of its category,
an RGBA color mode and a transparent background, before it is accepted for
portrait (生活照) or ID-photo (证件照) submission.

Categories:
  portrait (生活照)   900×1200 PNG, RGBA, transparent background
  id-photo (证件照)   400×400 PNG, RGBA, transparent background

Example Usage:
  # Run the HTTP service on the default port (8000)
  image-checker serve

  # Custom port, 20 MiB upload limit, settings from a config file
  image-checker --config checker.json serve --port 9000 --max-upload-mb 20

  # Check a local file and print a table
  image-checker check -i photo.png -t id-photo

  # Same check, printing the JSON body the HTTP API would return
  image-checker check -i photo.png -t portrait --json

  # Show the rule table
  image-checker rules"
)]
pub struct Args {
    /// JSON config file; command-line flags take precedence over its values
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Subcommand to run (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service
    Serve(ServeArgs),
    /// Check one local image file
    Check(CheckArgs),
    /// Print the requirements of every category
    Rules,
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Address to listen on [default: 0.0.0.0]
    #[arg(long = "host", value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on [default: 8000]
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    pub port: Option<u16>,

    /// Maximum request body size in MiB [default: 10]
    #[arg(long = "max-upload-mb", value_name = "MB")]
    pub max_upload_mb: Option<usize>,

    /// Number of async worker threads (0 = auto-detect CPU cores)
    #[arg(short = 'j', long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Disable the permissive CORS layer
    #[arg(long = "no-cors")]
    pub no_cors: bool,

    /// Which alpha values count as transparent [default: fully-transparent]
    #[arg(long = "transparency", value_name = "POLICY")]
    pub transparency: Option<TransparencyMode>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Image file to check
    #[arg(short = 'i', long = "image", value_name = "FILE")]
    pub image: PathBuf,

    /// Image category: portrait, id-photo, 生活照 or 证件照
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub image_type: String,

    /// Print the JSON response body instead of a table
    #[arg(long = "json")]
    pub json: bool,

    /// Which alpha values count as transparent [default: fully-transparent]
    #[arg(long = "transparency", value_name = "POLICY")]
    pub transparency: Option<TransparencyMode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let args = Args::try_parse_from(["image-checker"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_parse_serve() {
        let args = Args::try_parse_from([
            "image-checker",
            "--config",
            "checker.json",
            "serve",
            "-p",
            "9000",
            "--max-upload-mb",
            "20",
            "--no-cors",
            "--transparency",
            "below-opaque",
        ])
        .unwrap();

        assert_eq!(args.config_file, Some(PathBuf::from("checker.json")));
        match args.command {
            Some(Command::Serve(serve)) => {
                assert_eq!(serve.port, Some(9000));
                assert_eq!(serve.max_upload_mb, Some(20));
                assert!(serve.no_cors);
                assert_eq!(serve.transparency, Some(TransparencyMode::BelowOpaque));
                assert!(serve.host.is_none());
            }
            other => panic!("expected serve, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_check() {
        let args =
            Args::try_parse_from(["image-checker", "check", "-i", "a.png", "-t", "证件照", "--json", "-v"])
                .unwrap();
        assert!(args.verbose);
        match args.command {
            Some(Command::Check(check)) => {
                assert_eq!(check.image, PathBuf::from("a.png"));
                assert_eq!(check.image_type, "证件照");
                assert!(check.json);
            }
            other => panic!("expected check, got {:?}", other),
        }
    }

    #[test]
    fn test_check_requires_image_and_type() {
        assert!(Args::try_parse_from(["image-checker", "check", "-t", "portrait"]).is_err());
        assert!(Args::try_parse_from(["image-checker", "check", "-i", "a.png"]).is_err());
    }

    #[test]
    fn test_invalid_transparency_mode() {
        assert!(Args::try_parse_from(["image-checker", "serve", "--transparency", "half"]).is_err());
    }
}
