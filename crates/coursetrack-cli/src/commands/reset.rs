//! The `coursetrack reset` command.

use std::path::PathBuf;

use anyhow::Result;

use super::open_session;

pub fn execute(config_path: Option<PathBuf>, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("reset clears all lesson, quiz and certificate progress; re-run with --yes");
    }

    let mut session = open_session(config_path)?;
    session.reset();
    println!("Progress cleared.");
    Ok(())
}
