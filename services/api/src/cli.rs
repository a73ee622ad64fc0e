use crate::demo::{run_demo, run_evaluate, run_settings_show, DemoArgs, EvaluateArgs, SettingsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use reply_triage::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Reply Triage",
    about = "Classify inbound recruiter messages and propose canned replies",
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
    /// Classify a single message and print the proposed reply
    Evaluate(EvaluateArgs),
    /// Inspect triage settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Run the documented sample messages through the rule engine
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Print the resolved settings as JSON
    Show(SettingsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON settings document layered over the defaults
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Settings {
            command: SettingsCommand::Show(args),
        } => run_settings_show(args),
        Command::Demo(args) => run_demo(args),
    }
}
