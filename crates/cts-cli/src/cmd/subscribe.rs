//! `cts subscribe` — toggle the actor's update subscription.

use crate::cmd::resolve_actor;
use crate::output::{OutputMode, engine_fail, render_success};
use crate::project::Project;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct SubscribeArgs {
    /// Ticket id.
    pub ticket: String,
}

pub fn run_subscribe(
    args: &SubscribeArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let actor = resolve_actor(&project, actor_flag, output)?;

    let engine = project.load_engine()?;
    let ticket = engine
        .toggle_subscription(&actor, &args.ticket)
        .map_err(|e| engine_fail(output, e))?;
    project.save_engine(&engine)?;

    let message = if ticket.is_subscribed(&actor.id) {
        format!("Subscribed to {}", ticket.id)
    } else {
        format!("Unsubscribed from {}", ticket.id)
    };
    render_success(output, &message)
}
