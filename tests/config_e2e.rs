use std::fs;

use conference_standings::{
    CascadeRegistry, ConfigurationError, Conference, RegistryConfig, Resolver, Rule, Step,
    TieGroup, TiebreakError,
};
use tempfile::TempDir;

const REGISTRY: &str = r#"{
    "conferences": [
        {
            "code": "MWC",
            "name": "Mountain West Conference",
            "restart_on_reduction": true,
            "sos_precision": 4,
            "steps": [
                { "two_team": "head_to_head_two", "multi_team": "head_to_head_multi" },
                { "two_team": "common_opponents", "multi_team": "common_opponents" },
                { "two_team": "total_wins", "multi_team": "total_wins_multi" },
                { "two_team": { "unimplemented": "coin toss" }, "multi_team": { "unimplemented": "coin toss" } }
            ]
        },
        {
            "code": "sbc",
            "steps": [
                { "two_team": "HeadToHeadTwo", "multi_team": "HeadToHeadMulti" }
            ]
        }
    ]
}"#;

fn write_registry(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("registry.json");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn registry_loads_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_registry(&dir, REGISTRY);

    let registry = CascadeRegistry::from_path(&path).unwrap();
    assert_eq!(registry.codes().collect::<Vec<_>>(), vec!["MWC", "SBC"]);

    let mwc = registry.get("mwc").unwrap();
    assert_eq!(mwc.name(), "Mountain West Conference");
    assert_eq!(mwc.sos_precision(), 4);
    assert!(mwc.restart_on_reduction());
    assert_eq!(mwc.step_for(2, 2), Some(&Step::Apply(Rule::TotalWins)));
    assert!(!registry.get("SBC").unwrap().restart_on_reduction());
}

#[test]
fn loaded_registry_drives_resolution() {
    let dir = TempDir::new().unwrap();
    let registry = CascadeRegistry::from_path(write_registry(&dir, REGISTRY)).unwrap();

    let mut conf = Conference::new("Mountain West Conference", "MWC");
    let boise = conf.add_team("Boise State").unwrap();
    let unlv = conf.add_team("UNLV").unwrap();
    conf.record_non_conference_result(unlv, true).unwrap();

    let resolution = Resolver::new(&registry)
        .resolve(&conf, &TieGroup::new(vec![boise, unlv]).unwrap())
        .unwrap();
    assert_eq!(resolution.teams(), vec![unlv, boise]);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = RegistryConfig::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, TiebreakError::Io { .. }));
    assert!(err.is_configuration());
}

#[test]
fn two_team_rule_in_multi_team_slot_is_rejected() {
    let json = r#"{"conferences": [{"code": "BAD", "steps": [
        { "two_team": "head_to_head_two", "multi_team": "head_to_head_two" }
    ]}]}"#;
    let err = CascadeRegistry::from_json_str(json).unwrap_err();
    assert!(matches!(
        err,
        TiebreakError::Configuration(ConfigurationError::ArityMismatch {
            step: 0,
            rule: Rule::HeadToHeadTwo,
            ..
        })
    ));
}

#[test]
fn duplicate_codes_are_rejected() {
    let json = r#"{"conferences": [
        {"code": "DUP", "steps": [{"multi_team": "common_opponents"}]},
        {"code": "dup", "steps": [{"multi_team": "total_wins_multi"}]}
    ]}"#;
    let err = CascadeRegistry::from_json_str(json).unwrap_err();
    assert!(matches!(
        err,
        TiebreakError::Configuration(ConfigurationError::DuplicateCascade { .. })
    ));
}

#[test]
fn empty_steps_are_rejected() {
    let err = CascadeRegistry::from_json_str(r#"{"conferences": [{"code": "NIL", "steps": []}]}"#)
        .unwrap_err();
    assert!(matches!(
        err,
        TiebreakError::Configuration(ConfigurationError::EmptyCascade { .. })
    ));
}
