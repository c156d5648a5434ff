use crate::core::publish::EnvFormat;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct DeployArgs {
    /// Service file declaring custom.step-functions-offline and stepFunctions.stateMachines
    #[arg(value_name = "SERVICE_FILE")]
    pub service: PathBuf,

    /// Flat JSON object of state key to resource ARN, merged over TaskResourceMapping
    #[arg(long, value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// Local Step Functions endpoint (default: http://localhost:8083)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Write OFFLINE_STEP_FUNCTIONS_ARN_* variables here instead of stdout
    #[arg(long, value_name = "FILE", help_heading = "Output Options")]
    pub env_file: Option<PathBuf>,

    /// Output format of the published variables
    #[arg(
        long,
        value_enum,
        default_value_t = EnvFormat::Dotenv,
        help_heading = "Output Options"
    )]
    pub format: EnvFormat,
}

#[derive(Args)]
pub struct TransformArgs {
    /// Service file declaring custom.step-functions-offline and stepFunctions.stateMachines
    #[arg(value_name = "SERVICE_FILE")]
    pub service: PathBuf,

    /// Flat JSON object of state key to resource ARN, merged over TaskResourceMapping
    #[arg(long, value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// Only print this state machine
    #[arg(long, value_name = "NAME")]
    pub machine: Option<String>,
}
