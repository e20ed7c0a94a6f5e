use crate::demo::{run_demo, run_determine, DemoArgs, DetermineArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use clearfile::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "clearfile",
    about = "Real-estate transaction reporting service and workflow tools",
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
    /// Evaluate a determination questionnaire from the command line
    Determine(DetermineArgs),
    /// Run an end-to-end CLI demo covering the full report lifecycle
    Demo(DemoArgs),
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
        Command::Determine(args) => run_determine(args),
        Command::Demo(args) => run_demo(args),
    }
}
