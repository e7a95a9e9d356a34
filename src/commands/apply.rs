//! Apply command - evaluate and apply Night Light state once.
//!
//! Runs the same tick the daemon uses, through the scheduler's one-shot
//! trigger path, and exits. A pending override is consumed exactly like it
//! would be on a timer tick.

use anyhow::Result;

use crate::Duskr;

/// Handle the apply command.
pub fn handle_apply_command(debug_enabled: bool) -> Result<()> {
    log_version!();
    let result = Duskr::new(debug_enabled).apply_once()?;
    if !result.applied {
        anyhow::bail!("Actuator reported failure: {}", result.message);
    }
    Ok(())
}
