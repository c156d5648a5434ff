use crate::{
    cli::args::{DeployArgs, TransformArgs},
    core::{
        orchestrator::{transform_all, DeploymentOrchestrator},
        publish, ConfigLoader, LoadOverrides, StepFunctionsClient,
    },
    Result,
};
use anyhow::{anyhow, Context};
use serde_json::{Map, Value};
use std::fs;

pub async fn deploy(args: DeployArgs) -> Result<()> {
    let overrides = LoadOverrides {
        mapping_file: args.mapping.clone(),
        endpoint: args.endpoint.clone(),
    };
    let service = ConfigLoader::load_service(&args.service, &overrides)?;
    tracing::info!(
        service = %args.service.display(),
        state_machines = service.state_machines.len(),
        endpoint = service.config.step_functions_endpoint.as_str(),
        "deploying state machines"
    );

    let client = StepFunctionsClient::new(&service.config.step_functions_endpoint)?;
    let orchestrator = DeploymentOrchestrator::new(client, service.config.clone());
    let report = orchestrator.deploy(&service).await?;

    let vars = publish::publication_vars(&report)?;
    let rendered = publish::render(&vars, args.format);
    match args.env_file {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), count = vars.len(), "wrote ARN variables");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

pub async fn transform(args: TransformArgs) -> Result<()> {
    let overrides = LoadOverrides {
        mapping_file: args.mapping.clone(),
        endpoint: None,
    };
    let service = ConfigLoader::load_service(&args.service, &overrides)?;
    let transformed = transform_all(&service)?;

    let mut output = Map::new();
    for (key, definition) in transformed {
        if args.machine.as_deref().is_some_and(|wanted| wanted != key) {
            continue;
        }
        output.insert(key, definition.to_value()?);
    }
    if let Some(wanted) = &args.machine {
        if output.is_empty() {
            return Err(anyhow!("state machine '{}' is not declared", wanted));
        }
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(output))?);
    Ok(())
}
