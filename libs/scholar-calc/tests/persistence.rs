//! Snapshot export, restore and resume through the persistence port

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use scholar_calc::{
    Calculator, CalcError, EngineSnapshot, ErrorKind, HistoryEntry, InputEvent,
    MemoryPersistence, NullPersistence, PersistencePort, Result, Session, Settings,
    HISTORY_CAPACITY, MEMORY_LOG_CAPACITY,
};

fn press(calc: &mut Calculator, keys: &str) {
    let events: Vec<InputEvent> = keys
        .split_whitespace()
        .map(|k| k.parse().unwrap())
        .collect();
    calc.handle_all(events, &Settings::default());
}

/// Port whose backend is always unavailable
struct BrokenStore;

impl PersistencePort for BrokenStore {
    fn save(&self, _snapshot: &EngineSnapshot) -> Result<()> {
        Err(CalcError::persistence("disk full"))
    }

    fn load(&self) -> Result<Option<EngineSnapshot>> {
        Err(CalcError::persistence("disk unavailable"))
    }
}

#[test]
fn resume_continues_where_export_left_off() {
    let store = MemoryPersistence::new();

    let mut calc = Calculator::new();
    press(&mut calc, "2 + 2 = MS 3 ×");
    store.save(&calc.export()).unwrap();

    let mut resumed = Calculator::resume(&store);
    assert_eq!(resumed.session(), calc.session());
    assert_eq!(resumed.history(), calc.history());
    assert_eq!(resumed.memory().value(), 4.0);

    press(&mut resumed, "5 =");
    let view = resumed.snapshot(&Settings::default());
    assert_eq!(view.display_text, "15");
    assert_eq!(view.history.len(), 2);
}

#[test]
fn resume_never_depends_on_persistence() {
    let calc = Calculator::resume(&BrokenStore);
    assert_eq!(calc.session(), &Session::default());
    assert!(BrokenStore.save(&calc.export()).is_err());

    let calc = Calculator::resume(&NullPersistence);
    assert!(calc.history().is_empty());
}

#[test]
fn restore_repairs_inconsistent_snapshots() {
    let entries: Vec<HistoryEntry> = (0..HISTORY_CAPACITY + 3)
        .map(|i| HistoryEntry::new(format!("{} + 1", i), (i + 1).to_string()))
        .collect();
    let json = serde_json::json!({
        "session": { "display_value": "not a number" },
        "history": entries,
    });
    let snapshot = EngineSnapshot::from_json(json.to_string().as_bytes()).unwrap();
    assert_eq!(snapshot.history.len(), HISTORY_CAPACITY + 3);

    let calc = Calculator::restore(snapshot);
    assert_eq!(calc.session().display_value, "0");
    assert_eq!(calc.history().len(), HISTORY_CAPACITY);
}

#[test]
fn restore_rerenders_error_state() {
    let json = br#"{
        "version": 1,
        "session": {
            "display_value": "stale text",
            "pending": null,
            "awaiting_new_operand": false,
            "error": "division_by_zero"
        }
    }"#;
    let store = MemoryPersistence::new();
    store.put_raw(&json[..]);

    let mut calc = Calculator::resume(&store);
    let view = calc.snapshot(&Settings::default());
    assert_eq!(view.error_kind, Some(ErrorKind::DivisionByZero));
    assert_eq!(view.display_text, "Division by zero");
    assert_eq!(calc.session().display_value, "Division by zero");

    calc.handle("8".parse().unwrap(), &Settings::default());
    assert_eq!(calc.session().display_value, "8");
}

#[test]
fn restore_treats_untagged_error_text_as_that_error() {
    let snapshot =
        EngineSnapshot::from_json(br#"{"session": {"display_value": "Math Error"}}"#).unwrap();

    let calc = Calculator::restore(snapshot);
    let view = calc.snapshot(&Settings::default());
    assert_eq!(view.error_kind, Some(ErrorKind::MathDomainError));
    assert_eq!(view.display_text, "Math Error");
}

#[test]
fn restore_trims_oversized_memory_log() {
    let operations: Vec<String> = (0..MEMORY_LOG_CAPACITY + 10)
        .map(|i| format!("M+: {}", i))
        .collect();
    let json = serde_json::json!({
        "memory": { "register": 7.0, "operations": operations },
    });

    let calc = Calculator::restore(EngineSnapshot::from_json(json.to_string().as_bytes()).unwrap());
    assert_eq!(calc.memory().value(), 7.0);
    assert_eq!(calc.memory().operations().len(), MEMORY_LOG_CAPACITY);
    assert_eq!(calc.memory().operations()[0], "M+: 10");
}
