//! Logi do pliku `logs/terramark.log`.
//!
//! Terminal należy do interfejsu, więc nic nie idzie na stdout. Poziom
//! ustawia zmienna RUST_LOG (domyślnie `info`).

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Trzymaj przy życiu do końca programu; upuszczenie opróżnia bufor pliku.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Zakłada katalog, czyści log z poprzedniej sesji i rejestruje subskrybenta.
pub fn init_logging(log_dir: &Path, log_file: &str) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;
    fs::write(log_dir.join(log_file), "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init: w testach subskrybent może już istnieć
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
