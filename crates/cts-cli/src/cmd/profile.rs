//! `cts profile` — update the logged-in identity's own contact details.
//!
//! Only email and phone are editable after creation. This touches the
//! cached session identity, not any ticket's contact snapshot (see
//! `cts contact` for that).

use crate::output::{CliError, OutputMode, render_error, render_success};
use crate::project::Project;
use clap::Args;
use cts_core::contact::normalize_phone;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// New email address.
    #[arg(long)]
    pub email: Option<String>,

    /// New phone number.
    #[arg(long)]
    pub phone: Option<String>,
}

pub fn run_profile(
    args: &ProfileArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    if args.email.is_none() && args.phone.is_none() {
        anyhow::bail!("nothing to update: pass --email and/or --phone");
    }

    let project = Project::discover(project_root)?;
    let Some(mut user) = project.session()? else {
        anyhow::bail!("not logged in. Run `cts login`.");
    };

    if let Some(email) = &args.email {
        user.email.clone_from(email);
    }
    if let Some(phone) = &args.phone {
        match normalize_phone(phone) {
            Ok(normalized) => user.phone = normalized,
            Err(e) => {
                render_error(output, &CliError::new(e.to_string()))?;
                anyhow::bail!("{e}")
            }
        }
    }
    project.save_session(&user)?;

    tracing::info!(user = %user.id, "profile updated");
    render_success(output, &format!("Updated profile for {}", user.name))
}
