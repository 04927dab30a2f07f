use super::*;

use std::collections::HashMap;

#[test]
fn missing_file_yields_defaults() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("survey.toml");

    let settings = load_settings_from(&path).expect("settings");
    assert_eq!(settings.bind_addr, "127.0.0.1:8080");
    assert_eq!(settings.osc_bind, "127.0.0.1:8338");
    assert_eq!(settings.plan, SurveyPlan::default());
    assert_eq!(settings.settings_path, path);
}

#[test]
fn file_values_and_plan_override_defaults() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("survey.toml");
    fs::write(
        &path,
        r#"
bind_addr = "0.0.0.0:9000"
results_dir = "/tmp/likert"

[[slides]]
kind = "front_matter"

[[slides]]
kind = "slider"
material = 2
duration_secs = 15
"#,
    )
    .expect("write");

    let settings = load_settings_from(&path).expect("settings");
    assert_eq!(settings.bind_addr, "0.0.0.0:9000");
    assert_eq!(settings.osc_bind, "127.0.0.1:8338");
    assert_eq!(settings.results_dir, PathBuf::from("/tmp/likert"));
    assert_eq!(settings.plan.slides.len(), 2);
    assert_eq!(settings.plan.slides[0], SlideSpec::FrontMatter);
}

#[test]
fn malformed_file_is_an_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("survey.toml");
    fs::write(&path, "bind_addr = [").expect("write");

    let err = load_settings_from(&path).expect_err("invalid");
    assert!(err.to_string().contains("invalid settings file"));
}

#[test]
fn env_overrides_take_precedence() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("SURVEY__BIND_ADDR", "127.0.0.1:7000"),
        ("SURVEY__RESULTS_DIR", "./elsewhere"),
    ]);
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.bind_addr, "127.0.0.1:7000");
    assert_eq!(settings.results_dir, PathBuf::from("./elsewhere"));
    assert_eq!(settings.osc_bind, "127.0.0.1:8338");
}

#[test]
fn participant_counter_lives_in_results_dir() {
    let settings = Settings {
        results_dir: PathBuf::from("/data/survey"),
        ..Settings::default()
    };
    assert_eq!(
        settings.participant_path(),
        PathBuf::from("/data/survey/participant.toml")
    );
}

#[test]
fn advancing_participant_leaves_settings_file_untouched() {
    let temp = tempfile::tempdir().expect("tempdir");
    let settings_path = temp.path().join("survey.toml");
    let raw = r#"# lab machine 2
results_dir = "out"

[[slides]]
kind = "slider"
material = 3
duration_secs = 10
pad = { left = 10.0, top = 20.0, width = 40.0, height = 40.0 }
"#;
    fs::write(&settings_path, raw).expect("write");
    let participants = temp.path().join("out").join(PARTICIPANT_FILE);

    assert_eq!(peek_participant(&participants).expect("peek"), 0);
    assert_eq!(advance_participant(&participants).expect("advance"), 0);
    assert_eq!(advance_participant(&participants).expect("advance"), 1);
    assert_eq!(peek_participant(&participants).expect("peek"), 2);

    assert_eq!(fs::read_to_string(&settings_path).expect("read"), raw);
    let settings = load_settings_from(&settings_path).expect("settings");
    assert_eq!(settings.plan.slides.len(), 1);
}

#[test]
fn advancing_participant_resumes_from_stored_counter() {
    let temp = tempfile::tempdir().expect("tempdir");
    let participants = temp.path().join(PARTICIPANT_FILE);
    fs::write(&participants, "next_participant = 12\n").expect("write");

    assert_eq!(advance_participant(&participants).expect("advance"), 12);
    assert_eq!(peek_participant(&participants).expect("peek"), 13);
}

#[test]
fn malformed_participant_file_is_an_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let participants = temp.path().join(PARTICIPANT_FILE);
    fs::write(&participants, "next_participant = \"many\"").expect("write");

    assert!(advance_participant(&participants).is_err());
    assert_eq!(
        fs::read_to_string(&participants).expect("read"),
        "next_participant = \"many\""
    );
}
