use eazicalc::storage::{HISTORY_KEY, LAST_RESULT_KEY};
use eazicalc::{HistoryStore, Session};
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn session_round_trips_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path());

    let mut session = Session::new();
    session.submit("2+3");
    session.submit("3/0");
    session.submit("x*2");
    store.sync(&session);

    let restored = Session::restore(store.load_history(), store.load_last_result());
    assert_eq!(restored.last_result(), Some(10.0));
    assert_eq!(restored.history().len(), 3);
    assert_eq!(restored.history()[2].display_line(), "5 * 2 = 10");
    assert!(restored.history()[1].result.is_err());
}

#[test]
fn missing_files_mean_fresh_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path().join("not-created-yet"));
    assert!(store.load_history().is_empty());
    assert_eq!(store.load_last_result(), None);
}

#[test]
fn corrupt_data_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(format!("{HISTORY_KEY}.json")), "{not json").unwrap();
    fs::write(dir.path().join(LAST_RESULT_KEY), "twelve").unwrap();

    let store = HistoryStore::new(dir.path());
    assert!(store.load_history().is_empty());
    assert_eq!(store.load_last_result(), None);
}

#[test]
fn clearing_session_removes_saved_copy() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path());

    let mut session = Session::new();
    session.submit("1+1");
    store.sync(&session);
    assert!(dir.path().join(LAST_RESULT_KEY).exists());

    session.submit("clear");
    store.sync(&session);
    assert!(!dir.path().join(LAST_RESULT_KEY).exists());
    assert!(!dir.path().join(format!("{HISTORY_KEY}.json")).exists());
    assert_eq!(store.load_last_result(), None);
}
