//! One module per subcommand; each exposes clap `Args` and a `run_*`
//! entry point taking the parsed args, the actor override, the output
//! mode, and the project root.

pub mod contact;
pub mod create;
pub mod init;
pub mod lead;
pub mod list;
pub mod log;
pub mod priority;
pub mod profile;
pub mod progress;
pub mod reopen;
pub mod route;
pub mod session;
pub mod show;
pub mod staff;
pub mod status;
pub mod subscribe;

use crate::output::{CliError, OutputMode, render_error};
use crate::project::Project;
use cts_core::User;

/// Resolve the acting user, rendering a login hint on failure.
pub(crate) fn resolve_actor(
    project: &Project,
    flag: Option<&str>,
    output: OutputMode,
) -> anyhow::Result<User> {
    match project.resolve_actor(flag) {
        Ok(user) => Ok(user),
        Err(e) => {
            render_error(
                output,
                &CliError::with_suggestion(e.to_string(), "Run `cts login` or pass --as <staff-id>"),
            )?;
            anyhow::bail!("{e}")
        }
    }
}

/// Parse a string flag into an engine enum, rendering a validation-style
/// error on failure.
pub(crate) fn parse_flag<T>(raw: &str, output: OutputMode) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.parse() {
        Ok(value) => Ok(value),
        Err(e) => {
            render_error(output, &CliError::new(e.to_string()))?;
            anyhow::bail!("{e}")
        }
    }
}
