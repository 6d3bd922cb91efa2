use proctor_core::{
    DetectionManager, DetectionSnapshot, EventRecorder, ManagerConfig, ManagerEvent,
    ViolationKind,
};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Scenario {
    name: String,
    #[allow(dead_code)]
    description: String,
    #[serde(default)]
    config: ManagerConfig,
    steps: Vec<Step>,
    expected: Vec<ExpectedEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Step {
    Snapshot(DetectionSnapshot),
    Tick { now: u64 },
    Reset,
}

/// Expected event without the rendered message text.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ExpectedEvent {
    Warning { kind: ViolationKind, count: u32 },
    Resume,
    Terminate { kind: ViolationKind, count: u32 },
}

impl From<&ManagerEvent> for ExpectedEvent {
    fn from(event: &ManagerEvent) -> Self {
        match event {
            ManagerEvent::Warning { kind, count, .. } => Self::Warning {
                kind: *kind,
                count: *count,
            },
            ManagerEvent::Resume { .. } => Self::Resume,
            ManagerEvent::Terminate { kind, count, .. } => Self::Terminate {
                kind: *kind,
                count: *count,
            },
        }
    }
}

fn scenarios_dir() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest.join("../../fixtures/scenarios")
}

fn load_scenarios() -> Vec<Scenario> {
    let dir = scenarios_dir();
    let mut scenarios = Vec::new();
    if !dir.exists() {
        return scenarios;
    }
    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();
    for path in paths {
        let content = fs::read_to_string(&path).unwrap_or_else(|e| {
            panic!("failed to read scenario {:?}: {}", path, e);
        });
        let scenario: Scenario = serde_json::from_str(&content).unwrap_or_else(|e| {
            panic!("failed to parse scenario {:?}: {}", path, e);
        });
        scenarios.push(scenario);
    }
    scenarios
}

#[test]
fn test_all_scenarios() {
    let scenarios = load_scenarios();
    assert!(
        !scenarios.is_empty(),
        "no scenarios found in {:?}",
        scenarios_dir()
    );

    for scenario in &scenarios {
        let mut manager = DetectionManager::new(EventRecorder::new(), scenario.config);
        for step in &scenario.steps {
            match step {
                Step::Snapshot(snapshot) => manager.process(snapshot),
                Step::Tick { now } => manager.tick(*now),
                Step::Reset => manager.reset(),
            }
        }

        let actual: Vec<ExpectedEvent> = manager.sink().events.iter().map(Into::into).collect();
        assert_eq!(
            actual, scenario.expected,
            "scenario '{}' produced unexpected events",
            scenario.name
        );
    }
}

#[test]
fn replay_is_deterministic() {
    for scenario in load_scenarios() {
        let run = || {
            let mut manager = DetectionManager::new(EventRecorder::new(), scenario.config);
            for step in &scenario.steps {
                match step {
                    Step::Snapshot(snapshot) => manager.process(snapshot),
                    Step::Tick { now } => manager.tick(*now),
                    Step::Reset => manager.reset(),
                }
            }
            (manager.get_counts(), manager.into_sink().events)
        };
        assert_eq!(run(), run(), "scenario '{}' is not deterministic", scenario.name);
    }
}
