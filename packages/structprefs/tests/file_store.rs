use std::collections::BTreeMap;
use std::fs;

use serde::{Deserialize, Serialize};
use structprefs::{
    impl_structured_preference, key_group, open, Bytes, Defaults, Error, LLError,
    PreferencesConfig, TypedDefaults, TypedPreferences,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Window {
    width: u32,
    height: u32,
    maximized: bool,
}

impl_structured_preference!(Window);

key_group! {
    struct Settings {
        theme: String,
        volume: i64,
        ratio: f64,
        window: Window,
        recent: Vec<String>,
        counts: BTreeMap<String, u32>,
        thumbnail: Bytes,
    }
}

key_group! {
    struct Suite(store = "group.acme") {
        theme: String,
    }
}

fn config(dir: &tempfile::TempDir) -> PreferencesConfig {
    PreferencesConfig::default()
        .with_host_namespace("com.acme.app")
        .with_directory(dir.path())
}

#[test]
fn values_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let window = Window {
        width: 800,
        height: 600,
        maximized: false,
    };
    let mut counts = BTreeMap::new();
    counts.insert("opened".to_string(), 3);

    {
        let prefs = open(&config(&dir)).unwrap();
        let settings = prefs.group::<Settings>().unwrap();
        settings.set(Settings::theme(), "dark".to_string()).unwrap();
        settings.set(Settings::volume(), 7).unwrap();
        settings.set(Settings::ratio(), 1.25).unwrap();
        settings.set(Settings::window(), window.clone()).unwrap();
        settings
            .set(Settings::recent(), vec!["a.txt".to_string()])
            .unwrap();
        settings.set(Settings::counts(), counts.clone()).unwrap();
        settings
            .set(Settings::thumbnail(), Bytes::from_static(b"\x89PNG"))
            .unwrap();
    }

    let prefs = open(&config(&dir)).unwrap();
    let settings = prefs.group::<Settings>().unwrap();
    assert_eq!(settings.get(Settings::theme()), "dark");
    assert_eq!(settings.get(Settings::volume()), 7);
    assert_eq!(settings.get(Settings::ratio()), 1.25);
    assert_eq!(settings.get(Settings::window()), window);
    assert_eq!(settings.get(Settings::recent()), vec!["a.txt".to_string()]);
    assert_eq!(settings.get(Settings::counts()), counts);
    assert_eq!(
        settings.get(Settings::thumbnail()),
        Bytes::from_static(b"\x89PNG")
    );

    assert!(dir.path().join("defaults.json").exists());
}

#[test]
fn named_store_gets_its_own_file() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = open(&config(&dir)).unwrap();

    prefs
        .group::<Suite>()
        .unwrap()
        .set(Suite::theme(), "light".to_string())
        .unwrap();

    assert!(dir.path().join("group.acme.json").exists());
    assert!(!dir.path().join("defaults.json").exists());
    assert_eq!(
        prefs.registry().opened_names().unwrap(),
        vec!["group.acme".to_string()]
    );
}

#[test]
fn defaults_are_registered_per_launch() {
    let dir = tempfile::tempdir().unwrap();

    {
        let prefs = open(&config(&dir)).unwrap();
        let settings = prefs.group::<Settings>().unwrap();
        settings
            .register_defaults(
                Defaults::<Settings>::new()
                    .with(Settings::volume(), 5)
                    .unwrap(),
                false,
            )
            .unwrap();
        assert_eq!(settings.get(Settings::volume()), 5);
    }

    let prefs = open(&config(&dir)).unwrap();
    let settings = prefs.group::<Settings>().unwrap();
    assert_eq!(settings.get(Settings::volume()), 0);
}

#[test]
fn corrupt_default_store_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("defaults.json"), b"not json").unwrap();

    assert!(matches!(
        open(&config(&dir)),
        Err(Error::Ll(LLError::Corrupt { .. }))
    ));
}

#[test]
fn corrupt_named_store_fails_group_acquisition() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("group.acme.json"), b"{\"x\": 1}").unwrap();

    let prefs = open(&config(&dir)).unwrap();
    assert!(prefs.group::<Settings>().is_ok());
    assert!(matches!(
        prefs.group::<Suite>(),
        Err(Error::Configuration { .. })
    ));
}
