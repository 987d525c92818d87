use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::settings::KitSettings;

const LOG_FILE_PREFIX: &str = "account-kit";

const KIT_CRATES: [&str; 4] = ["kit_core", "kit_infra", "kit_ui", "kit_app"];

/// Install the global subscriber described by `settings`: a daily-rolling
/// file under [`KitSettings::resolved_log_dir`] and, if `log_to_console` is
/// set, a compact stderr layer. `RUST_LOG` overrides `log_level`.
///
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn init_logging(settings: &KitSettings) -> Result<WorkerGuard> {
    let logs_dir = settings.resolved_log_dir()?;
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log directory: {}", logs_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console = settings.log_to_console.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter(&settings.log_level)?)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .with(console)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

fn env_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(kit_directives(level))
            .with_context(|| format!("Invalid log_level {level:?}")),
    }
}

/// `warn` for dependencies, `level` for the kit's own crates.
fn kit_directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for krate in KIT_CRATES {
        directives.push_str(&format!(",{krate}={level}"));
    }
    directives
}
