//! Full-screen TUI for the lead console.

pub mod effects;
pub mod events;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod text;
pub mod update;

use std::io::{IsTerminal, Write, stderr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use leadctl_core::api::ApiClient;
pub use runtime::TuiRuntime;

/// Runs the interactive lead console.
pub async fn run_console(client: Arc<ApiClient>, session_path: PathBuf) -> Result<()> {
    // The console requires a terminal to render the TUI
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The console requires a terminal.\n\
             Use `leadctl leads list` for non-interactive output."
        );
    }

    // Print pre-TUI info to stderr (will be replaced by alternate screen)
    let mut err = stderr();
    writeln!(err, "Lead Console")?;
    writeln!(err, "Backend: {}", client.base_url())?;
    err.flush()?;

    let mut runtime = TuiRuntime::new(client, session_path)?;
    runtime.run()?;

    // Print goodbye after TUI exits (terminal restored)
    writeln!(stderr(), "Goodbye!")?;

    Ok(())
}
