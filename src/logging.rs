use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Environment variable naming a log file path.
pub const LOG_ENV_VAR: &str = "PHOTO_STICKERS_LOG";

/// Initialize tracing.
///
/// - `PHOTO_STICKERS_LOG=<path>` writes logs to `{path}.{timestamp}.{pid}`.
/// - `verbose` adds a compact stderr layer.
///
/// With neither, no subscriber is installed and logging stays off.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(verbose: bool) {
    let file_layer = std::env::var(LOG_ENV_VAR).ok().and_then(|log_path| {
        // Unique name so concurrent runs don't clobber each other's logs.
        let pid = std::process::id();
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let unique_path = format!("{}.{}.{}", log_path, timestamp, pid);

        let Ok(file) = std::fs::File::create(&unique_path) else {
            eprintln!("Warning: Failed to create log file: {}", unique_path);
            return None;
        };

        Some(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .boxed(),
        )
    });

    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    });

    if file_layer.is_none() && stderr_layer.is_none() {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "photo_stickers=debug,info" } else { "info" })
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
}
