use nodetree_core::db::migrations::latest_version;
use nodetree_core::db::{open_db, open_db_in_memory, DbError};
use nodetree_core::{
    load_nodes, save_nodes, KeyValueStore, MemoryStore, Node, PersistError, SqliteStore,
    TreeService,
};
use rusqlite::Connection;

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn sample() -> Vec<Node> {
    let mut hidden_root = Node::new("note").with_field("title", "gone");
    hidden_root.soft_delete();
    let mut hidden_child = Node::new("note").with_field("title", "kept nested");
    hidden_child.soft_delete();

    vec![
        Node::new("note").with_field("title", "first"),
        hidden_root,
        Node::folder()
            .with_field("title", "folder")
            .with_child(hidden_child),
    ]
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodetree.db");

    let conn = open_db(&path).unwrap();
    SqliteStore::try_new(&conn).unwrap().set("tree", "[]").unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let store = SqliteStore::try_new(&conn).unwrap();
    assert_eq!(store.get("tree").unwrap().as_deref(), Some("[]"));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path) {
        Err(DbError::SchemaTooNew { found, supported }) => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema must be rejected"),
    }
}

#[test]
fn save_then_load_roundtrips_visible_roots_in_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodetree.db");
    let nodes = sample();

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        save_nodes(&store, &nodes, "tree").unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let loaded = load_nodes(&store, "tree").unwrap().unwrap();
    assert_eq!(loaded, vec![nodes[0].clone(), nodes[2].clone()]);
    // Nested invisible nodes survive a save.
    let nested = loaded[1].children.as_deref().unwrap();
    assert_eq!(nested.len(), 1);
    assert!(!nested[0].is_visible());
}

#[test]
fn keys_are_independent() {
    let store = MemoryStore::new();
    save_nodes(&store, &[Node::new("a")], "left").unwrap();
    save_nodes(&store, &[Node::new("b"), Node::new("c")], "right").unwrap();

    assert_eq!(load_nodes(&store, "left").unwrap().unwrap().len(), 1);
    assert_eq!(load_nodes(&store, "right").unwrap().unwrap().len(), 2);
    assert!(load_nodes(&store, "other").unwrap().is_none());
}

#[test]
fn corrupt_stored_content_propagates() {
    let store = MemoryStore::new();
    store.set("tree", r#"[{"type": 5}]"#).unwrap();

    let err = load_nodes(&store, "tree").unwrap_err();
    assert!(matches!(err, PersistError::Corrupt { .. }));
    assert!(TreeService::open(&store, "tree").is_err());
}

#[test]
fn service_save_drops_invisible_roots_on_reload() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let mut service = TreeService::new(&store, "tree");
    *service.nodes_mut() = sample();
    service.save().unwrap();

    service.reload().unwrap();
    assert_eq!(service.nodes().len(), 2);
    assert!(service.nodes().iter().all(Node::is_visible));
}
