//! Path containment specs: nothing reads or writes outside the data root

use cg_core::ProjectId;
use cg_storage::{DocStore, StorageError};

#[test]
fn traversal_paths_are_rejected_for_reads_and_writes() {
    let store = DocStore::open_temp().unwrap();

    for path in [
        "../../etc/passwd",
        "../outside.json",
        "projects/../../x.json",
        "/etc/passwd",
    ] {
        assert!(
            matches!(
                store.read::<String>(path),
                Err(StorageError::PathViolation { .. })
            ),
            "read accepted: {}",
            path
        );
        assert!(
            matches!(
                store.write(path, &"doc"),
                Err(StorageError::PathViolation { .. })
            ),
            "write accepted: {}",
            path
        );
    }
}

#[test]
fn traversal_project_ids_never_construct() {
    for raw in ["", "..", "../", "a/b", "a\\b", "../../etc/passwd"] {
        assert!(ProjectId::new(raw).is_err(), "accepted: {:?}", raw);
    }
}

#[test]
fn absent_documents_read_as_none() {
    let store = DocStore::open_temp().unwrap();
    let missing: Option<serde_json::Value> =
        store.read("projects/nobody/state.json").unwrap();
    assert!(missing.is_none());
}
