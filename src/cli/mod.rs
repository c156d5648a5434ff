pub mod args;
pub mod commands;

pub use args::{DeployArgs, TransformArgs};
use clap::{Parser, Subcommand};
use std::path::Path;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "sfn-offline")]
#[command(version = crate::VERSION)]
#[command(about = "Prepare and register Step Functions state machines against a local engine")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: start Step Functions Local, run `sfn-offline deploy serverless.yml --format exports`, then eval the output."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "Transform and register every state machine",
        long_about = "Deploy maps task resources, flattens distributed Maps, substitutes unsupported integrations, then creates (or updates) each state machine on the local endpoint and prints OFFLINE_STEP_FUNCTIONS_ARN_* variables.",
        after_help = "Example:\n    sfn-offline deploy serverless.yml --mapping mapping.json --env-file .env.offline"
    )]
    Deploy(DeployArgs),
    #[command(
        about = "Print transformed definitions without registering",
        long_about = "Transform runs the same rewrite passes as deploy and prints the resulting definitions as JSON keyed by state machine.",
        after_help = "Example:\n    sfn-offline transform serverless.yml --machine Orders"
    )]
    Transform(TransformArgs),
}

impl Command {
    /// Service file the command operates on.
    pub fn service_path(&self) -> &Path {
        match self {
            Command::Deploy(args) => &args.service,
            Command::Transform(args) => &args.service,
        }
    }
}

pub async fn run(args: Args) -> crate::Result<()> {
    match args.command {
        Command::Deploy(deploy_args) => commands::deploy(deploy_args).await,
        Command::Transform(transform_args) => commands::transform(transform_args).await,
    }
}
