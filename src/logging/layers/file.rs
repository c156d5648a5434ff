use crate::logging::config::{LoggingConfig, STATE_DIR};
use crate::Result;
use anyhow::{anyhow, Context};
use std::fs::{create_dir_all, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::{self as tracing_fmt, format, writer::BoxMakeWriter};
use tracing_subscriber::registry::LookupSpan;

const LOG_FILE_NAME: &str = "sfn-offline.log";

/// Layer type produced by the file sink builder.
pub type FileFmtLayer<S> =
    tracing_fmt::Layer<S, format::DefaultFields, format::Format<format::Full>, BoxMakeWriter>;

/// Layer stack that already wraps the provided subscriber.
pub type FileLayerStack<S> = tracing_subscriber::layer::Layered<FileFmtLayer<S>, S>;

/// Resolve `<log_dir>/sfn-offline.log`, defaulting to `<project>/.sfn-offline/logs`.
pub fn log_file_path(config: &LoggingConfig, project_root: Option<&Path>) -> Result<PathBuf> {
    let directory = match (&config.log_dir, project_root) {
        (Some(custom), _) if custom.is_absolute() => custom.clone(),
        (Some(custom), Some(project)) => project.join(custom),
        (None, Some(project)) => project.join(STATE_DIR).join("logs"),
        (_, None) => {
            return Err(anyhow!(
                "cannot place the log file without a project directory"
            ))
        }
    };
    Ok(directory.join(LOG_FILE_NAME))
}

/// Build a tracing layer writing to `log_file` via a non-blocking writer, or a sink when `None`.
pub fn file_layer<S>(log_file: Option<&Path>) -> Result<(FileFmtLayer<S>, Option<WorkerGuard>)>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let Some(log_file) = log_file else {
        return Ok((make_layer(BoxMakeWriter::new(io::sink)), None));
    };

    ensure_log_dir(log_file)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let writer = BoxMakeWriter::new(move || non_blocking.clone());
    Ok((make_layer(writer), Some(guard)))
}

fn make_layer<S>(writer: BoxMakeWriter) -> FileFmtLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
}

fn ensure_log_dir(log_file: &Path) -> Result<()> {
    let directory = log_file.parent().ok_or_else(|| {
        anyhow!(
            "log file path {} has no parent directory",
            log_file.display()
        )
    })?;
    create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;
    Ok(())
}
