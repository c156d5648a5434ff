use clap::Parser;
use sfn_offline::{cli, logging, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let _logging = logging::init(&args.command)?;
    cli::run(args).await
}
