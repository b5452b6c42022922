use anyhow::Result;
use console::style;
use std::time::Duration;

use crate::server::ServerConfig;

/// Largest accepted upload limit
pub const MAX_UPLOAD_LIMIT_MB: usize = 100;
/// Upper bound for explicit worker counts
pub const MAX_WORKERS: usize = 256;

/// Set up `env_logger`; `RUST_LOG` overrides the default filter
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init();
}

/// Print the startup banner
pub fn print_banner() {
    println!("{}", style("Image Checker").bold().blue());
    println!(
        "{}",
        style(format!(
            "Portrait / ID-photo upload validation, v{}",
            env!("CARGO_PKG_VERSION")
        ))
        .dim()
    );
    println!();
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Format a byte count using binary units
pub fn format_bytes(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * KIB;

    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Validate the effective server configuration before binding
pub fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.host.trim().is_empty() {
        return Err(anyhow::anyhow!("Host must not be empty"));
    }

    if config.port == 0 {
        return Err(anyhow::anyhow!("Port must be between 1 and 65535"));
    }

    let max_bytes = MAX_UPLOAD_LIMIT_MB * 1024 * 1024;
    if config.max_upload_bytes == 0 || config.max_upload_bytes > max_bytes {
        return Err(anyhow::anyhow!(
            "Upload limit must be between 1 and {} MiB, got: {} bytes",
            MAX_UPLOAD_LIMIT_MB,
            config.max_upload_bytes
        ));
    }

    if config.workers > MAX_WORKERS {
        return Err(anyhow::anyhow!(
            "Worker count too high (max {}), got: {}",
            MAX_WORKERS,
            config.workers
        ));
    }

    Ok(())
}

/// Print error message
pub fn error_println(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}
