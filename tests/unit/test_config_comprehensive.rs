use serial_test::serial;
use sfn_offline::core::config::{ConfigLoader, LoadOverrides, OfflineConfig, ServiceFormat};
use sfn_offline::core::types::ErrorCategory;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const OVERRIDE_VARS: [&str; 4] = [
    "SFN_OFFLINE_ACCOUNT_ID",
    "SFN_OFFLINE_REGION",
    "SFN_OFFLINE_ENDPOINT",
    "SFN_OFFLINE_DISTRIBUTED_MAP_MOCK",
];

/// Clears the override variables on creation and restores them on drop.
struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn clean() -> Self {
        let saved = OVERRIDE_VARS
            .iter()
            .map(|name| (*name, env::var(name).ok()))
            .collect();
        for name in OVERRIDE_VARS {
            env::remove_var(name);
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
    }
}

const SERVICE_YAML: &str = r#"
service: orders
custom:
  step-functions-offline:
    accountId: "123456789012"
    region: us-east-1
    distributedMapMockResource: arn:aws:lambda:us-east-1:123456789012:function:prepare
    TaskResourceMapping:
      Fetch: arn:aws:lambda:us-east-1:123456789012:function:fetch-local
stepFunctions:
  stateMachines:
    Orders:
      name: orders-machine
      definition:
        StartAt: Fetch
        States:
          Fetch:
            Type: Task
            Resource: arn:aws:lambda:us-east-1:123456789012:function:fetch
            End: true
"#;

fn write_service(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_load_service_applies_resource_mapping() {
    let _env = EnvGuard::clean();
    let dir = TempDir::new().unwrap();
    let path = write_service(&dir, "serverless.yml", SERVICE_YAML);

    let service = ConfigLoader::load_service(&path, &LoadOverrides::default()).unwrap();

    assert_eq!(service.config.account_id, "123456789012");
    assert_eq!(service.config.region, "us-east-1");
    assert_eq!(service.config.step_functions_endpoint, "http://localhost:8083");
    let orders = &service.state_machines["Orders"];
    assert_eq!(orders.registered_name("Orders"), "orders-machine");
    assert_eq!(
        orders.definition["States"]["Fetch"]["Resource"],
        "arn:aws:lambda:us-east-1:123456789012:function:fetch-local"
    );
}

#[test]
#[serial]
fn test_load_json_service() {
    let _env = EnvGuard::clean();
    let dir = TempDir::new().unwrap();
    let json = r#"{
        "custom": {"step-functions-offline": {"accountId": 123456789012, "region": "eu-west-1"}},
        "stepFunctions": {"stateMachines": {"Flow": {"definition": {"StartAt": "Done", "States": {"Done": {"Type": "Succeed"}}}}}}
    }"#;
    let path = write_service(&dir, "service.json", json);

    let service = ConfigLoader::load_service(&path, &LoadOverrides::default()).unwrap();

    assert_eq!(service.config.account_id, "123456789012");
    assert_eq!(service.state_machines.len(), 1);
}

#[test]
#[serial]
fn test_env_overrides_take_precedence() {
    let _env = EnvGuard::clean();
    env::set_var("SFN_OFFLINE_REGION", "ap-southeast-2");
    env::set_var("SFN_OFFLINE_ENDPOINT", "http://127.0.0.1:9999");
    env::set_var("SFN_OFFLINE_DISTRIBUTED_MAP_MOCK", "arn:mock:env");
    let dir = TempDir::new().unwrap();
    let path = write_service(&dir, "serverless.yml", SERVICE_YAML);

    let service = ConfigLoader::load_service(&path, &LoadOverrides::default()).unwrap();

    assert_eq!(service.config.region, "ap-southeast-2");
    assert_eq!(service.config.step_functions_endpoint, "http://127.0.0.1:9999");
    assert_eq!(
        service.config.distributed_map_mock_resource.as_deref(),
        Some("arn:mock:env")
    );
}

#[test]
#[serial]
fn test_endpoint_flag_beats_env() {
    let _env = EnvGuard::clean();
    env::set_var("SFN_OFFLINE_ENDPOINT", "http://127.0.0.1:9999");
    let dir = TempDir::new().unwrap();
    let path = write_service(&dir, "serverless.yml", SERVICE_YAML);
    let overrides = LoadOverrides {
        mapping_file: None,
        endpoint: Some("http://localhost:4584".to_string()),
    };

    let service = ConfigLoader::load_service(&path, &overrides).unwrap();

    assert_eq!(service.config.step_functions_endpoint, "http://localhost:4584");
}

#[test]
#[serial]
fn test_mapping_file_merges_over_service_mapping() {
    let _env = EnvGuard::clean();
    let dir = TempDir::new().unwrap();
    let path = write_service(&dir, "serverless.yml", SERVICE_YAML);
    let mapping = write_service(
        &dir,
        "mapping.json",
        r#"{"Fetch": "arn:aws:lambda:us-east-1:123456789012:function:from-file"}"#,
    );
    let overrides = LoadOverrides {
        mapping_file: Some(mapping),
        endpoint: None,
    };

    let service = ConfigLoader::load_service(&path, &overrides).unwrap();

    assert_eq!(
        service.state_machines["Orders"].definition["States"]["Fetch"]["Resource"],
        "arn:aws:lambda:us-east-1:123456789012:function:from-file"
    );
}

#[test]
#[serial]
fn test_missing_account_id_is_config_error() {
    let _env = EnvGuard::clean();
    let dir = TempDir::new().unwrap();
    let yaml = SERVICE_YAML.replace("    accountId: \"123456789012\"\n", "");
    let path = write_service(&dir, "serverless.yml", &yaml);

    let err = ConfigLoader::load_service(&path, &LoadOverrides::default()).unwrap_err();

    assert_eq!(err.category, ErrorCategory::ConfigError);
    assert_eq!(err.code, "SFO-CONFIG-001");
    assert!(err.message.contains("accountId"));
}

#[test]
#[serial]
fn test_missing_region_is_config_error() {
    let _env = EnvGuard::clean();
    let dir = TempDir::new().unwrap();
    let yaml = SERVICE_YAML.replace("    region: us-east-1\n", "");
    let path = write_service(&dir, "serverless.yml", &yaml);

    let err = ConfigLoader::load_service(&path, &LoadOverrides::default()).unwrap_err();

    assert_eq!(err.code, "SFO-CONFIG-002");
}

#[test]
#[serial]
fn test_missing_service_file() {
    let _env = EnvGuard::clean();
    let dir = TempDir::new().unwrap();

    let err = ConfigLoader::load_service(
        &dir.path().join("absent.yml"),
        &LoadOverrides::default(),
    )
    .unwrap_err();

    assert_eq!(err.code, "SFO-CONFIG-005");
}

#[test]
#[serial]
fn test_mapping_file_must_be_flat_strings() {
    let _env = EnvGuard::clean();
    let dir = TempDir::new().unwrap();
    let path = write_service(&dir, "serverless.yml", SERVICE_YAML);
    let mapping = write_service(&dir, "mapping.json", r#"{"Fetch": {"nested": true}}"#);
    let overrides = LoadOverrides {
        mapping_file: Some(mapping),
        endpoint: None,
    };

    let err = ConfigLoader::load_service(&path, &overrides).unwrap_err();

    assert_eq!(err.code, "SFO-CONFIG-006");
}

#[test]
fn test_bad_endpoint_scheme_is_rejected() {
    let config = OfflineConfig {
        account_id: "1".to_string(),
        region: "us-east-1".to_string(),
        step_functions_endpoint: "ftp://localhost:8083".to_string(),
        ..Default::default()
    };

    let err = sfn_offline::core::ConfigValidator::validate(&config).unwrap_err();

    assert_eq!(err.code, "SFO-CONFIG-007");
}

#[test]
fn test_parse_service_without_state_machines() {
    let yaml = "custom:\n  step-functions-offline:\n    accountId: '1'\n    region: us-east-1\n";

    let service = ConfigLoader::parse_service(yaml, ServiceFormat::Yaml).unwrap();

    assert!(service.state_machines.is_empty());
}

#[test]
fn test_env_var_documentation_lists_overrides() {
    let docs = ConfigLoader::env_var_documentation();

    for name in OVERRIDE_VARS {
        assert!(docs.iter().any(|line| line.starts_with(name)), "{}", name);
    }
}
