//! Tests for configuration parsing, JSON export and revival

use mt_prng_core_rs::handle::{revive, PrngConfig, JSON_TYPE, MT19937_NAME};
use mt_prng_core_rs::rng::{Seed, SeedError, StateError};
use mt_prng_core_rs::{GeneratorHandle, Mt19937, Prng, PrngError, PrngJson, PrngOptions};
use rand::rngs::mock::StepRng;

#[test]
fn test_export_revive_continues_sequence() {
    let mut rng = Mt19937::with_seed(Seed::from_words(&[3, 1, 4, 1, 5]).unwrap());
    for _ in 0..700 {
        rng.draw();
    }
    let text = rng.to_json().to_json_string().unwrap();

    let mut revived = revive(&text).unwrap();
    assert_eq!(revived.seed(), rng.seed());
    for _ in 0..1000 {
        assert_eq!(revived.draw(), rng.draw());
    }
}

#[test]
fn test_exported_json_shape() {
    let rng = Mt19937::with_seed(Seed::from_scalar(1234).unwrap());
    let value: serde_json::Value =
        serde_json::from_str(&rng.to_json().to_json_string().unwrap()).unwrap();

    assert_eq!(value["type"], JSON_TYPE);
    assert_eq!(value["name"], MT19937_NAME);
    assert_eq!(value["state"].as_array().unwrap().len(), 631);
    assert_eq!(value["params"], serde_json::json!([]));
}

#[test]
fn test_revived_handle_is_independent() {
    let mut rng = Mt19937::with_seed(Seed::from_scalar(8).unwrap());
    let mut revived = GeneratorHandle::from_json(&rng.to_json()).unwrap();
    revived.draw();
    revived.draw();
    let expected = rng.draw();
    assert_ne!(revived.state(), Some(rng.state()));
    assert_eq!(expected, Mt19937::with_seed(Seed::from_scalar(8).unwrap()).draw());
}

#[test]
fn test_revive_rejects_garbage() {
    assert!(matches!(
        revive("not json"),
        Err(PrngError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        revive(r#"{"type":"PRNG","name":"mt19937","state":[1,3]}"#),
        Err(PrngError::MalformedState(StateError::TooShort { .. }))
    ));
}

#[test]
fn test_config_from_json_string() {
    let mut handle = GeneratorHandle::from_config_str(r#"{"seed": 5489}"#).unwrap();
    assert_eq!(handle.draw(), 3_499_211_612);

    let mut handle = GeneratorHandle::from_config_str(r#"{"seed": [1234, 5678]}"#).unwrap();
    assert_eq!(handle.seed_length(), Some(2));
    assert_eq!(handle.draw(), 1_880_837_566);
}

#[test]
fn test_config_accepts_whole_float_seed() {
    let mut handle = GeneratorHandle::from_config_str(r#"{"seed": 1234.0}"#).unwrap();
    assert_eq!(handle.seed().unwrap().words(), &[1234]);
    assert_eq!(handle.draw(), 822_569_775);
}

#[test]
fn test_config_with_state_resumes() {
    let mut source = Mt19937::with_seed(Seed::from_scalar(42).unwrap());
    source.draw();
    let config = serde_json::json!({ "state": source.state() }).to_string();

    let mut handle = GeneratorHandle::from_config_str(&config).unwrap();
    assert_eq!(handle.draw(), 3_421_126_067);
    assert_eq!(handle.draw(), 4_083_286_876);
}

#[test]
fn test_empty_config_uses_entropy() {
    let handle = GeneratorHandle::from_config_str("{}").unwrap();
    assert_eq!(handle.seed_length(), Some(1));
    assert!(handle.state_ref().is_none(), "copy defaults to true");
}

#[test]
fn test_config_rejects_bad_seeds() {
    let cases = [
        (r#"{"seed": 0}"#, SeedError::NotPositive(0)),
        (r#"{"seed": -3}"#, SeedError::NotPositive(-3)),
        (r#"{"seed": []}"#, SeedError::Empty),
        (
            r#"{"seed": 4294967296}"#,
            SeedError::OutOfRange {
                value: 4_294_967_296,
                max: u32::MAX as u64,
            },
        ),
    ];
    for (json, expected) in cases {
        let err = GeneratorHandle::from_config_str(json).unwrap_err();
        assert_eq!(err, PrngError::InvalidSeed(expected), "config {}", json);
    }

    let err = GeneratorHandle::from_config_str(r#"{"seed": 1.5}"#).unwrap_err();
    assert!(matches!(err, PrngError::InvalidSeed(SeedError::NonInteger(_))));

    let err = GeneratorHandle::from_config_str(r#"{"seed": "12"}"#).unwrap_err();
    assert!(matches!(err, PrngError::InvalidSeed(SeedError::NonInteger(_))));
}

#[test]
fn test_config_rejects_unknown_and_conflicting_fields() {
    assert!(matches!(
        PrngConfig::from_json_str(r#"{"sede": 1}"#),
        Err(PrngError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        GeneratorHandle::from_config_str(r#"{"seed": 1, "state": [1]}"#),
        Err(PrngError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        PrngConfig::from_json_str(r#"{"copy": "yes"}"#),
        Err(PrngError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_external_source_surface() {
    let mut handle = GeneratorHandle::new(PrngOptions::external(StepRng::new(10, 5))).unwrap();
    assert_eq!(handle.draw(), 10);
    assert_eq!(handle.draw(), 15);

    let mut view = handle.normalized();
    let v = view.draw();
    assert!((0.0..1.0).contains(&v));
    assert!(view.seed().is_none());
    assert!(view.state().is_none());
    assert!(view.to_json().is_none());
    assert_eq!(Prng::to_json(&handle), None);
}

#[test]
fn test_json_struct_round_trips_through_serde() {
    let rng = Mt19937::with_seed(Seed::from_scalar(17).unwrap());
    let json = PrngJson::new(MT19937_NAME, rng.state(), vec![]);
    let text = json.to_json_string().unwrap();
    assert_eq!(PrngJson::from_json_str(&text).unwrap(), json);
}
