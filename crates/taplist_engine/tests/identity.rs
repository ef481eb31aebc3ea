use std::fs;

use taplist_engine::{ActorIdentity, ACTOR_FILE_NAME};
use tempfile::TempDir;

#[test]
fn identity_is_created_once_and_reused() {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");

    let first = ActorIdentity::load_or_create(&data_dir).unwrap();
    assert!(first.as_str().starts_with("user_"));
    assert!(data_dir.join(ACTOR_FILE_NAME).is_file());

    let second = ActorIdentity::load_or_create(&data_dir).unwrap();
    assert_eq!(first, second);
}

#[test]
fn malformed_identity_file_is_replaced() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(ACTOR_FILE_NAME), "not an id").unwrap();

    let id = ActorIdentity::load_or_create(temp.path()).unwrap();
    let saved = fs::read_to_string(temp.path().join(ACTOR_FILE_NAME)).unwrap();
    assert_eq!(saved.trim(), id.as_str());
}

#[test]
fn data_dir_that_is_a_file_fails() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();

    assert!(ActorIdentity::load_or_create(&blocker).is_err());
}
