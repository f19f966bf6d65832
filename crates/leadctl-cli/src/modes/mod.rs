//! Runtime execution modes.
//!
//! - subcommands: one-shot, print to stdout
//! - `console`: full-screen interactive terminal UI (optional feature)

#[cfg(feature = "tui")]
pub use leadctl_tui::run_console;

#[cfg(not(feature = "tui"))]
pub async fn run_console(
    _client: std::sync::Arc<leadctl_core::api::ApiClient>,
    _session_path: std::path::PathBuf,
) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
