//! `cts show` — full detail for one ticket.

use crate::output::{CliError, OutputMode, render, render_error, ticket_detail};
use crate::project::Project;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Ticket id.
    pub ticket: String,
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let engine = project.load_engine()?;
    match engine.get_ticket(&args.ticket) {
        Ok(ticket) => render(output, &ticket, |t, w| ticket_detail(w, t)),
        Err(e) => {
            render_error(output, &CliError::from(&e))?;
            anyhow::bail!("{e}")
        }
    }
}
