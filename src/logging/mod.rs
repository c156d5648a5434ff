pub mod config;
pub mod context;
pub mod layers;

pub use context::{detect_context, ExecutionContext};
pub use layers::console::ConsoleOutput;

use crate::cli::Command;
use crate::logging::config::LoggingConfig;
use crate::logging::layers::{console, file};
use crate::Result;
use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Guards that keep logging sinks active for the duration of the command.
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    console_output: ConsoleOutput,
    log_file_path: Option<PathBuf>,
}

impl LoggingGuard {
    /// Returns the console output configuration used during initialization.
    pub fn console_output(&self) -> ConsoleOutput {
        self.console_output
    }

    /// Returns the log file path when the file sink is enabled.
    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file_path.as_deref()
    }
}

/// Initialize the logging framework for the provided CLI command.
///
/// The project directory is the parent of the command's service file; logging settings are
/// read from `<project>/.sfn-offline/logging.toml`. Errors when invoked more than once per
/// process unless tests explicitly reset the guard.
pub fn init(command: &Command) -> Result<LoggingGuard> {
    if LOGGER_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(anyhow!("logging already initialized"));
    }

    let execution = detect_context();
    let project_root = project_root(command.service_path());
    let config = LoggingConfig::load(project_root.as_deref())?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_level))
        .context("failed to configure tracing level")?;

    type BaseRegistry = Registry;
    type FileSubscriber = file::FileLayerStack<BaseRegistry>;

    let enable_file = context::file_sink_enabled(execution, config.enable_file);
    let log_file_path = if enable_file {
        Some(file::log_file_path(&config, project_root.as_deref())?)
    } else {
        None
    };
    let (file_layer, file_guard) = file::file_layer::<BaseRegistry>(log_file_path.as_deref())?;

    let console_output = console::select_console_output(config.console_output);
    let console_layer = console::console_layer::<FileSubscriber>(console_output);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(env_filter)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
        console_output,
        log_file_path,
    })
}

fn project_root(service_path: &Path) -> Option<PathBuf> {
    match service_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Some(parent.to_path_buf()),
        _ => std::env::current_dir().ok(),
    }
}

#[cfg(test)]
/// Reset the initialization guard so tests can reconfigure logging multiple times.
pub fn reset_for_tests() {
    LOGGER_INITIALIZED.store(false, Ordering::SeqCst);
}
