//! `cts init` — create the project skeleton.

use crate::project::CTS_DIR;
use anyhow::{Context as _, Result};
use clap::Args;
use cts_core::{Engine, default_roster};
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.cts/` already exists.
    #[arg(long)]
    pub force: bool,
}

const GITIGNORE: &str = "user.json\nstate.json.tmp\n";

/// Execute `cts init`. Creates the project skeleton:
///
/// ```text
/// .cts/
///   state.json    (empty engine snapshot)
///   staff.yaml    (default staff roster, editable)
///   .gitignore    (user.json, temp files)
/// ```
///
/// # Errors
///
/// Returns an error if `.cts/` already exists and `--force` is not set,
/// or if any filesystem operation fails.
pub fn run_init(args: &InitArgs, project_root: &Path) -> Result<()> {
    let cts_dir = project_root.join(CTS_DIR);

    if cts_dir.exists() && !args.force {
        anyhow::bail!(".cts/ already exists. Use `cts init --force` to reinitialize.");
    }

    std::fs::create_dir_all(&cts_dir)
        .with_context(|| format!("failed to create {}", cts_dir.display()))?;

    let roster = default_roster();
    let staff_path = cts_dir.join("staff.yaml");
    let staff_raw = serde_yaml::to_string(&roster).context("failed to serialize roster")?;
    std::fs::write(&staff_path, staff_raw)
        .with_context(|| format!("failed to write roster: {}", staff_path.display()))?;

    let state_path = cts_dir.join("state.json");
    let state_raw = serde_json::to_string_pretty(&Engine::new(roster).snapshot())
        .context("failed to serialize state")?;
    std::fs::write(&state_path, state_raw)
        .with_context(|| format!("failed to write state: {}", state_path.display()))?;

    let gitignore_path = cts_dir.join(".gitignore");
    std::fs::write(&gitignore_path, GITIGNORE)
        .with_context(|| format!("failed to write .gitignore: {}", gitignore_path.display()))?;

    println!("✓ Initialized .cts/ project structure.");
    println!();
    println!("  State:  .cts/state.json");
    println!("  Roster: .cts/staff.yaml (edit to match your teams)");
    println!();
    println!("Next steps:");
    println!("  Log in as a client and file the first ticket:");
    println!("    cts login --id c1 --name \"Ada\" --email ada@example.com --phone 5550123456");
    println!("    cts create --title \"Broken campaign\" --description \"...\"");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{InitArgs, run_init};
    use tempfile::TempDir;

    #[test]
    fn fresh_init_creates_structure() {
        let tmp = TempDir::new().unwrap();
        run_init(&InitArgs { force: false }, tmp.path()).expect("init should succeed");

        assert!(tmp.path().join(".cts").is_dir());
        assert!(tmp.path().join(".cts/state.json").is_file());
        assert!(tmp.path().join(".cts/staff.yaml").is_file());
        assert!(tmp.path().join(".cts/.gitignore").is_file());
    }

    #[test]
    fn reinit_without_force_fails() {
        let tmp = TempDir::new().unwrap();
        run_init(&InitArgs { force: false }, tmp.path()).expect("first init should succeed");
        assert!(run_init(&InitArgs { force: false }, tmp.path()).is_err());
        run_init(&InitArgs { force: true }, tmp.path()).expect("reinit --force should succeed");
    }

    #[test]
    fn roster_contains_default_staff() {
        let tmp = TempDir::new().unwrap();
        run_init(&InitArgs { force: false }, tmp.path()).expect("init should succeed");
        let raw = std::fs::read_to_string(tmp.path().join(".cts/staff.yaml")).unwrap();
        assert!(raw.contains("compliance_manager"));
        assert!(raw.contains("team_lead"));
    }
}
