use crate::report::{run_grant_report, GrantReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use grant_disbursement::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Government Grant Disbursement",
    about = "Serve the grant disbursement API or evaluate grants from CSV exports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate one grant scheme against household and occupant CSV exports
    Grant(GrantReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Grant(args) => run_grant_report(args),
    }
}
