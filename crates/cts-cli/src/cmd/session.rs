//! `cts login` / `cts logout` / `cts whoami` — session management.
//!
//! Staff log in by roster id; clients are not roster members, so a
//! client login synthesizes an identity from the provided details. The
//! session is cached in `.cts/user.json` until logout.

use crate::output::{OutputMode, render, render_success};
use crate::project::{Project, client_user};
use clap::Args;
use cts_core::User;
use std::path::Path;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Log in as a roster staff member by id (e.g. s1).
    #[arg(long, conflicts_with_all = ["name", "email", "phone"])]
    pub staff: Option<String>,

    /// Client id (any stable identifier).
    #[arg(long, required_unless_present = "staff")]
    pub id: Option<String>,

    /// Client display name.
    #[arg(long, required_unless_present = "staff")]
    pub name: Option<String>,

    /// Client email.
    #[arg(long, required_unless_present = "staff")]
    pub email: Option<String>,

    /// Client phone.
    #[arg(long, required_unless_present = "staff")]
    pub phone: Option<String>,
}

pub fn run_login(args: &LoginArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;

    let user = if let Some(staff_id) = &args.staff {
        project
            .roster()
            .find(staff_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown staff id {staff_id}. See `cts staff`."))?
    } else {
        // clap guarantees these are present when --staff is absent.
        let (Some(id), Some(name), Some(email), Some(phone)) =
            (&args.id, &args.name, &args.email, &args.phone)
        else {
            anyhow::bail!("client login requires --id, --name, --email, and --phone");
        };
        client_user(id, name, email, phone)
    };

    project.save_session(&user)?;
    tracing::info!(user = %user.id, role = %user.role, "logged in");
    render_success(output, &format!("Logged in as {} ({})", user.name, user.role))
}

pub fn run_logout(output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    project.clear_session()?;
    render_success(output, "Logged out")
}

pub fn run_whoami(output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let project = Project::discover(project_root)?;
    let Some(user) = project.session()? else {
        anyhow::bail!("not logged in. Run `cts login`.");
    };
    render(output, &user, |u: &User, w| {
        writeln!(w, "{}  {} ({})", u.id, u.name, u.role)?;
        if let Some(dept) = u.department {
            let node = u
                .branch
                .map_or_else(|| dept.to_string(), |b| format!("{dept}/{b}"));
            writeln!(w, "  department: {node}")?;
        }
        writeln!(w, "  email: {}", u.email)
    })
}

#[cfg(test)]
mod tests {
    use super::LoginArgs;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: LoginArgs,
    }

    #[test]
    fn staff_login_parses_alone() {
        let w = Wrapper::parse_from(["test", "--staff", "s1"]);
        assert_eq!(w.args.staff.as_deref(), Some("s1"));
    }

    #[test]
    fn client_login_requires_details() {
        assert!(Wrapper::try_parse_from(["test", "--id", "c1"]).is_err());
        let w = Wrapper::parse_from([
            "test", "--id", "c1", "--name", "Ada", "--email", "a@b.c", "--phone", "5550123456",
        ]);
        assert_eq!(w.args.id.as_deref(), Some("c1"));
    }

    #[test]
    fn staff_conflicts_with_client_details() {
        assert!(Wrapper::try_parse_from(["test", "--staff", "s1", "--name", "Ada"]).is_err());
    }
}
