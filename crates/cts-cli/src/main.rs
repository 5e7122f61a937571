#![forbid(unsafe_code)]

mod cmd;
mod output;
mod project;

use clap::{Parser, Subcommand};
use output::OutputMode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cts: ticket lifecycle and department routing",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Act as a roster staff member for this command (overrides login).
    #[arg(long = "as", global = true, value_name = "STAFF_ID")]
    act_as: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }

    /// Get the actor override as an `Option<&str>` for resolution.
    fn actor_flag(&self) -> Option<&str> {
        self.act_as.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Initialize a cts project",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    cts init"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "Log in as a client or staff member",
        after_help = "EXAMPLES:\n    # Staff login by roster id\n    cts login --staff s1\n\n    # Client login\n    cts login --id c1 --name \"Ada\" --email ada@example.com --phone 5550123456"
    )]
    Login(cmd::session::LoginArgs),

    #[command(about = "Drop the cached session")]
    Logout,

    #[command(about = "Show the logged-in identity")]
    Whoami,

    #[command(about = "Update your own email or phone")]
    Profile(cmd::profile::ProfileArgs),

    #[command(
        about = "File a new ticket",
        after_help = "EXAMPLES:\n    # File a ticket as the logged-in client\n    cts create --title \"Broken campaign\" --description \"Ads stopped\" --priority high"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        about = "Route a department onto a ticket",
        after_help = "EXAMPLES:\n    # Pull in Technical\n    cts route TKT-1000 -d technical -r \"Infra issue\" --as s1\n\n    # Marketing needs a branch\n    cts route TKT-1000 -d marketing -b AHM -r \"Campaign work\" --as s1"
    )]
    Route(cmd::route::RouteArgs),

    #[command(about = "Hand an assignment to a team lead")]
    Lead(cmd::lead::LeadArgs),

    #[command(about = "Move an assignment through its workflow")]
    Progress(cmd::progress::ProgressArgs),

    #[command(about = "Change a ticket's priority")]
    Priority(cmd::priority::PriorityArgs),

    #[command(about = "Move a ticket through its lifecycle")]
    Status(cmd::status::StatusArgs),

    #[command(about = "Close a ticket (requires every assignment resolved)")]
    Close(cmd::status::CloseArgs),

    #[command(about = "Update a ticket's contact snapshot")]
    Contact(cmd::contact::ContactArgs),

    #[command(about = "Toggle your update subscription on a ticket")]
    Subscribe(cmd::subscribe::SubscribeArgs),

    #[command(about = "Reopen a closed ticket into a new linked ticket")]
    Reopen(cmd::reopen::ReopenArgs),

    #[command(about = "Show one ticket in full")]
    Show(cmd::show::ShowArgs),

    #[command(about = "List the tickets you are entitled to see")]
    List(cmd::list::ListArgs),

    #[command(about = "List tickets awaiting compliance routing")]
    Queue(cmd::list::QueueArgs),

    #[command(about = "Show a ticket's audit trail")]
    Log(cmd::log::LogArgs),

    #[command(about = "Browse the staff roster")]
    Staff(cmd::staff::StaffArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();
    let actor = cli.actor_flag();

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, &project_root),
        Commands::Login(ref args) => cmd::session::run_login(args, output, &project_root),
        Commands::Logout => cmd::session::run_logout(output, &project_root),
        Commands::Whoami => cmd::session::run_whoami(output, &project_root),
        Commands::Profile(ref args) => cmd::profile::run_profile(args, output, &project_root),
        Commands::Create(ref args) => cmd::create::run_create(args, actor, output, &project_root),
        Commands::Route(ref args) => cmd::route::run_route(args, actor, output, &project_root),
        Commands::Lead(ref args) => cmd::lead::run_lead(args, actor, output, &project_root),
        Commands::Progress(ref args) => {
            cmd::progress::run_progress(args, actor, output, &project_root)
        }
        Commands::Priority(ref args) => {
            cmd::priority::run_priority(args, actor, output, &project_root)
        }
        Commands::Status(ref args) => cmd::status::run_status(args, actor, output, &project_root),
        Commands::Close(ref args) => cmd::status::run_close(args, actor, output, &project_root),
        Commands::Contact(ref args) => {
            cmd::contact::run_contact(args, actor, output, &project_root)
        }
        Commands::Subscribe(ref args) => {
            cmd::subscribe::run_subscribe(args, actor, output, &project_root)
        }
        Commands::Reopen(ref args) => cmd::reopen::run_reopen(args, actor, output, &project_root),
        Commands::Show(ref args) => cmd::show::run_show(args, output, &project_root),
        Commands::List(ref args) => cmd::list::run_list(args, actor, output, &project_root),
        Commands::Queue(ref args) => cmd::list::run_queue(args, output, &project_root),
        Commands::Log(ref args) => cmd::log::run_log(args, output, &project_root),
        Commands::Staff(ref args) => cmd::staff::run_staff(args, output, &project_root),
    }
}
