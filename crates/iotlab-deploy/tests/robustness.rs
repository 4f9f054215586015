// crates/iotlab-deploy/tests/robustness.rs

//! Integration tests focused on error handling and malformed input.
//!
//! These tests ensure that broken exports and configs are reported as
//! `DeployError`s instead of producing partial output or panicking.

use iotlab_deploy::{DeployError, Testbed, TestbedConfig, load_records_from_str};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A single valid Grenoble record used as a base for corrupted test cases.
const MINIMAL_VALID_JSON: &str = r#"[
  {"uid":"9378","archi":"m3:at86rf231","site":"grenoble","state":"Alive",
   "network_address":"m3-358.grenoble.iot-lab.info"}
]"#;

fn build(json: &str) -> Result<Testbed, DeployError> {
    let records = load_records_from_str(json)?;
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    Testbed::new(vec![358], "grenoble", "m3:at86rf231", records, false, &mut rng)
}

#[test]
fn test_minimal_valid_json() {
    let testbed = build(MINIMAL_VALID_JSON).expect("minimal export should build");
    assert_eq!(testbed.nodes().len(), 1);
}

/// Verifies that truncated JSON is rejected.
#[test]
fn test_malformed_json_syntax() {
    let result = build(r#"[{"uid":"9378","archi":"#);
    assert!(
        matches!(result, Err(DeployError::Json(_))),
        "Expected Json error, got {:?}",
        result
    );
}

/// Verifies that a record lacking `network_address` fails at load time.
#[test]
fn test_missing_network_address() {
    let json = MINIMAL_VALID_JSON.replace(
        r#""network_address":"m3-358.grenoble.iot-lab.info""#,
        r#""hostname":"m3-358.grenoble.iot-lab.info""#,
    );
    let result = build(&json);
    assert!(matches!(result, Err(DeployError::Json(_))), "got {:?}", result);
}

/// Verifies that a non-string field is reported rather than coerced.
#[test]
fn test_wrong_field_type() {
    let json = MINIMAL_VALID_JSON.replace(r#""uid":"9378""#, r#""uid":9378"#);
    let result = build(&json);
    assert!(matches!(result, Err(DeployError::Json(_))), "got {:?}", result);
}

/// The export must be an array, not a single object.
#[test]
fn test_top_level_object_rejected() {
    let json = r#"{"uid":"9378","archi":"m3:at86rf231","site":"grenoble",
                   "network_address":"m3-358.grenoble.iot-lab.info"}"#;
    let result = build(json);
    assert!(matches!(result, Err(DeployError::Json(_))), "got {:?}", result);
}

/// A short uid is reported with the node it belongs to.
#[test]
fn test_short_uid() {
    let json = MINIMAL_VALID_JSON.replace(r#""uid":"9378""#, r#""uid":"93""#);
    match build(&json) {
        Err(DeployError::InvalidUid { node_id, uid }) => {
            assert_eq!(node_id, 358);
            assert_eq!(uid, "93");
        }
        other => panic!("Expected InvalidUid error, got {:?}", other),
    }
}

/// Non-hex uid characters are rejected as well.
#[test]
fn test_non_hex_uid() {
    let json = MINIMAL_VALID_JSON.replace(r#""uid":"9378""#, r#""uid":"93g8""#);
    let result = build(&json);
    assert!(matches!(result, Err(DeployError::InvalidUid { .. })), "got {:?}", result);
}

/// A malformed uid on a record that is never requested is harmless.
#[test]
fn test_invalid_uid_on_unused_record() {
    let json = r#"[
      {"uid":"9378","archi":"m3:at86rf231","site":"grenoble",
       "network_address":"m3-358.grenoble.iot-lab.info"},
      {"uid":"x","archi":"m3:at86rf231","site":"grenoble",
       "network_address":"m3-359.grenoble.iot-lab.info"}
    ]"#;
    let testbed = build(json).unwrap();
    assert_eq!(testbed.nodes().len(), 1);
}

#[test]
fn test_missing_export_file() {
    let config = TestbedConfig {
        nodes_json: "/nonexistent/iotlab-nodes.json".into(),
        ..TestbedConfig::default()
    };
    let result = Testbed::from_config(&config);
    assert!(matches!(result, Err(DeployError::Io(_))), "got {:?}", result);
}

/// Nothing requested resolves: the run still succeeds with an empty table.
#[test]
fn test_no_node_resolves() {
    let records = load_records_from_str(MINIMAL_VALID_JSON).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let testbed =
        Testbed::new(vec![1, 2], "grenoble", "m3:at86rf231", records, true, &mut rng).unwrap();
    assert!(testbed.nodes().is_empty());
    assert_eq!(testbed.unresolved(), &[1, 2]);
    assert_eq!(
        testbed.deployment_struct_string().unwrap(),
        "const struct id_mac deployment_fit[] = {\n  { 0,    {{0}}}\n};"
    );
    assert_eq!(testbed.argument_string(), "1+2");
}
