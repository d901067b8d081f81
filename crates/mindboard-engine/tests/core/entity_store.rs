use mindboard_engine::board::Board;
use mindboard_engine::entity_store::EntityStore;
use mindboard_engine::model::{
    ArrowStyle, Connection, EntityData, EntityId, EntitySet, Entry, EntityKind, Mark, Point,
};

fn entry(id: u64, parent: u64, x: f64) -> Entry {
    Entry::new(
        EntityId(id),
        EntityId(parent),
        Point::new(x, 0.0),
        format!("entry {id}"),
    )
}

#[test]
fn test_insert_and_lookup() {
    let mut store: EntityStore<Entry> = EntityStore::new();
    store.insert(entry(1, 0, 0.0));

    assert_eq!(store.len(), 1);
    assert!(store.contains(EntityId(1)));
    assert!(store.is_live(EntityId(1)));
    assert_eq!(store.data(EntityId(1)).unwrap().text, "entry 1");
    assert!(store.mirror(EntityId(1)).is_none());
}

#[test]
fn test_tombstone_toggling() {
    let mut store: EntityStore<Entry> = EntityStore::new();
    store.insert(entry(1, 0, 0.0));

    assert!(store.mark_deleted(EntityId(1)).is_none()); // no mirror to take
    assert!(!store.is_live(EntityId(1)));
    assert!(store.contains(EntityId(1)));

    // Double-delete is a no-op.
    assert!(store.mark_deleted(EntityId(1)).is_none());
    assert!(!store.is_live(EntityId(1)));

    assert!(store.unmark_deleted(EntityId(1)));
    assert!(store.is_live(EntityId(1)));
    assert!(!store.unmark_deleted(EntityId(1)));
}

#[test]
fn test_purge_removes_canonical_entry() {
    let mut store: EntityStore<Entry> = EntityStore::new();
    store.insert(entry(1, 0, 0.0));

    let purged = store.purge(EntityId(1));
    assert!(purged.is_some());
    assert!(!store.contains(EntityId(1)));
    assert!(store.purge(EntityId(1)).is_none());
}

#[test]
fn test_iter_layer_filters_parent_and_tombstones() {
    let mut store: EntityStore<Entry> = EntityStore::new();
    store.insert(entry(1, 0, 0.0));
    store.insert(entry(2, 0, 100.0));
    store.insert(entry(3, 7, 200.0));
    store.mark_deleted(EntityId(2));

    let on_root: Vec<EntityId> = store
        .iter_layer(EntityId::ROOT)
        .map(|e| e.data.id)
        .collect();
    assert_eq!(on_root, vec![EntityId(1)]);

    let on_seven: Vec<EntityId> = store.iter_layer(EntityId(7)).map(|e| e.data.id).collect();
    assert_eq!(on_seven, vec![EntityId(3)]);
}

#[test]
fn test_board_spawns_mirror_only_on_active_layer() {
    let mut board = Board::new();

    let on_root = board.generate_id();
    board.insert_entry(Entry::new(
        on_root,
        EntityId::ROOT,
        Point::new(0.0, 0.0),
        "root".to_string(),
    ));

    let elsewhere = board.generate_id();
    board.insert_entry(Entry::new(
        elsewhere,
        on_root,
        Point::new(0.0, 0.0),
        "nested".to_string(),
    ));

    assert!(board.entries.mirror(on_root).is_some());
    assert!(board.spatial().contains(on_root));
    assert!(board.entries.mirror(elsewhere).is_none());
    assert!(!board.spatial().contains(elsewhere));
}

#[test]
fn test_mark_deleted_batch_hides_mirror_and_clears_selection() {
    let mut board = Board::new();
    let id = board.generate_id();
    board.insert_entry(Entry::new(
        id,
        EntityId::ROOT,
        Point::new(0.0, 0.0),
        "victim".to_string(),
    ));
    board
        .selection
        .select(id, mindboard_engine::SelectMode::Replace);

    let mut set = EntitySet::default();
    set.push(EntityKind::Entry, id);
    assert_eq!(board.mark_deleted(&set), 1);

    assert!(!board.entries.is_live(id));
    assert!(board.entries.mirror(id).is_none());
    assert!(!board.spatial().contains(id));
    assert!(board.selection.is_empty());

    // And back.
    assert_eq!(board.unmark_deleted(&set), 1);
    assert!(board.entries.is_live(id));
    assert!(board.entries.mirror(id).is_some());
    assert!(board.spatial().contains(id));
}

#[test]
fn test_connection_mirror_requires_live_endpoints() {
    let mut board = Board::new();
    let a = board.generate_id();
    board.insert_entry(Entry::new(
        a,
        EntityId::ROOT,
        Point::new(0.0, 0.0),
        "a".to_string(),
    ));
    let b = board.generate_id();
    board.insert_entry(Entry::new(
        b,
        EntityId::ROOT,
        Point::new(200.0, 0.0),
        "b".to_string(),
    ));

    // Tombstone one endpoint, then insert a connection: the canonical
    // record lands but no mirror spawns.
    let mut set = EntitySet::default();
    set.push(EntityKind::Entry, a);
    board.mark_deleted(&set);

    let conn = board.generate_id();
    board.insert_connection(Connection::new(
        conn,
        EntityId::ROOT,
        a,
        b,
        ArrowStyle::Forward,
        Point::new(0.0, 0.0),
        Point::new(0.0, 0.0),
    ));
    assert!(board.connections.contains(conn));
    assert!(board.connections.mirror(conn).is_none());
    assert!(!board.spatial().contains(conn));
}

#[test]
fn test_entry_size_tracks_text() {
    let mut short = entry(1, 0, 0.0);
    short.text = "hi".to_string();
    let (w1, h1) = short.size();

    let mut long = entry(2, 0, 0.0);
    long.text = "a considerably longer line of text\nand a second line".to_string();
    let (w2, h2) = long.size();

    assert!(w2 > w1);
    assert!(h2 > h1);
    assert_eq!(short.bounds().width(), w1);
}

#[test]
fn test_mark_cycles() {
    assert_eq!(Mark::None.next(), Mark::Priority);
    assert_eq!(Mark::Priority.next(), Mark::Done);
    assert_eq!(Mark::Done.next(), Mark::Dropped);
    assert_eq!(Mark::Dropped.next(), Mark::None);
}

#[test]
fn test_connection_rejects_nothing_at_store_level() {
    // Self-connection rejection lives at the document boundary; the
    // plain data type stays dumb.
    let conn = Connection::new(
        EntityId(9),
        EntityId::ROOT,
        EntityId(1),
        EntityId(2),
        ArrowStyle::Both,
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
    );
    assert!(conn.touches(EntityId(1)));
    assert!(conn.touches(EntityId(2)));
    assert!(!conn.touches(EntityId(3)));
    assert_eq!(conn.distance_to_point(&Point::new(50.0, 10.0)), 10.0);
    assert!(!conn.is_deleted());
}
