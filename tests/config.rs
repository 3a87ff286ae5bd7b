use std::fs;
use std::time::Duration;

use assert_matches::assert_matches;

use molprop_extractor::config::{Config, ConfigLoader};
use molprop_extractor::error::MolpropError;
use molprop_extractor::pubchem::DEFAULT_BASE_URL;

#[test]
fn parse_mixed_property_list() {
    let config: Config = serde_json::from_str(
        r#"{
            "schema_version": 1,
            "output": "reports/run.txt",
            "properties": [24, "XLogP", 18, 24],
            "color": false,
            "pubchem": { "timeout_secs": 5 }
        }"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve_config(config).unwrap();
    assert_eq!(resolved.output.as_str(), "reports/run.txt");
    assert!(!resolved.color);
    assert_eq!(
        resolved.selection.unwrap().names(),
        vec!["molecular_formula", "xlogp", "inchikey"]
    );
    assert_eq!(resolved.pubchem.timeout, Duration::from_secs(5));
    assert_eq!(resolved.pubchem.base_url, DEFAULT_BASE_URL);
}

#[test]
fn parse_config_shorthand() {
    let config: Config = serde_json::from_str(r#"{ "properties": "all" }"#).unwrap();
    let resolved = ConfigLoader::resolve_config(config).unwrap();
    assert_eq!(resolved.selection.unwrap().len(), 36);
}

#[test]
fn invalid_property_in_config_is_rejected() {
    let config: Config = serde_json::from_str(r#"{ "properties": [0, 5] }"#).unwrap();
    let err = ConfigLoader::resolve_config(config).unwrap_err();
    assert_matches!(err, MolpropError::InvalidPropertySelection(_));
}

#[test]
fn loads_explicit_config_path() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("molprop.json");
    fs::write(
        &path,
        r#"{ "properties": "7,18", "pubchem": { "base_url": "http://localhost:9/rest/pug", "max_retries": 0 } }"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve(path.to_str()).unwrap();
    assert_eq!(
        resolved.selection.unwrap().names(),
        vec!["conformer_rmsd_3d", "inchikey"]
    );
    assert_eq!(resolved.pubchem.base_url, "http://localhost:9/rest/pug");
    assert_eq!(resolved.pubchem.max_retries, 0);
}

#[test]
fn missing_or_broken_config_fails() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("absent.json");
    let err = ConfigLoader::resolve(missing.to_str()).unwrap_err();
    assert_matches!(err, MolpropError::ConfigRead(_));

    let broken = temp.path().join("broken.json");
    fs::write(&broken, "{ properties: ").unwrap();
    let err = ConfigLoader::resolve(broken.to_str()).unwrap_err();
    assert_matches!(err, MolpropError::ConfigParse(_));
}

#[test]
fn unsupported_schema_version_is_rejected() {
    let config: Config = serde_json::from_str(r#"{ "schema_version": 2 }"#).unwrap();
    let err = ConfigLoader::resolve_config(config).unwrap_err();
    assert_matches!(err, MolpropError::ConfigParse(message) if message.contains("schema_version 2"));
}
