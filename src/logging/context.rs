use std::env;

/// Execution contexts that influence how logging is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionContext {
    /// A developer running the CLI next to a local engine.
    LocalDev,
    /// Continuous integration, where log files are not kept.
    Ci,
}

/// Derive the active execution context from the environment.
pub fn detect_context() -> ExecutionContext {
    if ci_enabled() {
        ExecutionContext::Ci
    } else {
        ExecutionContext::LocalDev
    }
}

/// An explicit `enable_file` wins; otherwise CI runs skip the file sink.
pub fn file_sink_enabled(context: ExecutionContext, configured: Option<bool>) -> bool {
    configured.unwrap_or(context == ExecutionContext::LocalDev)
}

fn ci_enabled() -> bool {
    env::var("CI")
        .map(|value| matches!(value.trim().to_lowercase().as_str(), "1" | "true"))
        .unwrap_or(false)
}
