//! `cts staff` — browse the roster.

use crate::cmd::parse_flag;
use crate::output::{OutputMode, render};
use crate::project::Project;
use clap::Args;
use cts_core::{Department, Role, User};
use std::path::Path;

#[derive(Args, Debug)]
pub struct StaffArgs {
    /// Filter by department.
    #[arg(short, long)]
    pub department: Option<String>,

    /// Show only team leads (useful when picking a lead for `cts lead`).
    #[arg(long)]
    pub leads: bool,
}

pub fn run_staff(args: &StaffArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let department: Option<Department> = match &args.department {
        Some(raw) => Some(parse_flag(raw, output)?),
        None => None,
    };

    let members: Vec<&User> = project
        .roster()
        .members()
        .iter()
        .filter(|u| department.is_none() || u.department == department)
        .filter(|u| !args.leads || u.role == Role::TeamLead)
        .collect();

    render(output, &members, |members, w| {
        for user in &*members {
            let node = user.department.map_or_else(
                || "-".to_string(),
                |d| {
                    user.branch
                        .map_or_else(|| d.to_string(), |b| format!("{d}/{b}"))
                },
            );
            writeln!(w, "{}  {:<20} {:<19} {node}", user.id, user.name, user.role.to_string())?;
        }
        Ok(())
    })
}
