use mindboard_engine::board::Board;
use mindboard_engine::commands::{Command, CreateEntities, DeleteEntities, MoveEntities};
use mindboard_engine::history::CommandHistory;
use mindboard_engine::model::{EntityId, EntityKind, EntitySet, Entry, Point};
use mindboard_engine::selection_manager::DragTarget;
use mindboard_engine::MirrorKind;

fn add_entry(board: &mut Board, x: f64) -> EntityId {
    let id = board.generate_id();
    board.insert_entry(Entry::new(id, EntityId::ROOT, Point::new(x, 0.0), "e".to_string()));
    id
}

fn set_of(id: EntityId) -> EntitySet {
    let mut set = EntitySet::default();
    set.push(EntityKind::Entry, id);
    set
}

fn create_cmd(id: EntityId) -> Command {
    Command::Create(CreateEntities {
        set: set_of(id),
        name: "Create Entry".to_string(),
    })
}

fn delete_cmd(id: EntityId) -> Command {
    Command::Delete(DeleteEntities {
        set: set_of(id),
        name: "Delete".to_string(),
    })
}

#[test]
fn test_new_history_is_empty() {
    let history = CommandHistory::new(50);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.undo_depth(), 0);
    assert_eq!(history.redo_depth(), 0);
}

#[test]
fn test_record_single_action() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(50);
    let id = add_entry(&mut board, 0.0);

    history.record(create_cmd(id), &mut board);
    assert!(history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.undo_depth(), 1);
}

#[test]
fn test_undo_redo_roundtrip() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(50);
    let id = add_entry(&mut board, 0.0);
    history.record(create_cmd(id), &mut board);

    assert_eq!(history.undo(&mut board), Some("Create Entry".to_string()));
    assert!(board.entries.data(id).unwrap().deleted);
    assert!(!history.can_undo());
    assert!(history.can_redo());

    assert_eq!(history.redo(&mut board), Some("Create Entry".to_string()));
    assert!(!board.entries.data(id).unwrap().deleted);
    assert!(history.can_undo());
    assert!(!history.can_redo());
}

#[test]
fn test_multiple_undo_redo() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(50);

    for i in 0..5 {
        let id = add_entry(&mut board, (i as f64) * 100.0);
        history.record(create_cmd(id), &mut board);
    }

    assert_eq!(history.undo_depth(), 5);
    for _ in 0..5 {
        assert!(history.undo(&mut board).is_some());
    }
    assert_eq!(history.undo_depth(), 0);
    assert_eq!(history.redo_depth(), 5);

    for _ in 0..5 {
        assert!(history.redo(&mut board).is_some());
    }
    assert_eq!(history.undo_depth(), 5);
    assert_eq!(history.redo_depth(), 0);
}

#[test]
fn test_redo_branch_discarded_on_record() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(50);

    let a = add_entry(&mut board, 0.0);
    history.record(create_cmd(a), &mut board);
    let b = add_entry(&mut board, 100.0);
    history.record(create_cmd(b), &mut board);

    history.undo(&mut board);
    assert_eq!(history.redo_depth(), 1);

    let c = add_entry(&mut board, 200.0);
    history.record(create_cmd(c), &mut board);
    assert_eq!(history.redo_depth(), 0);
}

#[test]
fn test_truncated_undone_create_purges_its_entity() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(50);

    let a = add_entry(&mut board, 0.0);
    history.record(create_cmd(a), &mut board);
    history.undo(&mut board);
    assert!(board.entries.data(a).unwrap().deleted);

    // Recording now discards the undone create; its tombstoned entity
    // must not leak in the canonical map.
    let b = add_entry(&mut board, 100.0);
    history.record(create_cmd(b), &mut board);
    assert!(!board.entries.contains(a));
    assert!(board.entries.contains(b));
}

#[test]
fn test_capacity_eviction_keeps_created_entities() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(2);

    let a = add_entry(&mut board, 0.0);
    history.record(create_cmd(a), &mut board);
    let b = add_entry(&mut board, 100.0);
    history.record(create_cmd(b), &mut board);
    let c = add_entry(&mut board, 200.0);
    history.record(create_cmd(c), &mut board);

    // The oldest create was evicted in applied state: its entity stays.
    assert_eq!(history.undo_depth(), 2);
    assert!(board.entries.contains(a));
    assert!(!board.entries.data(a).unwrap().deleted);
}

#[test]
fn test_evicted_delete_purges_exactly_its_victims() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(2);

    let a = add_entry(&mut board, 0.0);
    history.record(create_cmd(a), &mut board);
    let b = add_entry(&mut board, 100.0);
    history.record(create_cmd(b), &mut board);

    let mut del = delete_cmd(a);
    del.apply(&mut board).unwrap();
    history.record(del, &mut board);
    // Eviction dropped "create a" in applied state; a is tombstoned by
    // the delete but still canonical.
    assert!(board.entries.contains(a));
    assert!(board.entries.data(a).unwrap().deleted);

    // Push the delete off the end of the stack: now the tombstone is
    // orphaned and must be hard-purged, exactly once.
    let c = add_entry(&mut board, 200.0);
    history.record(create_cmd(c), &mut board);
    let d = add_entry(&mut board, 300.0);
    history.record(create_cmd(d), &mut board);

    assert!(!board.entries.contains(a));
    assert!(board.entries.contains(b));
    // The evicted delete is unreachable by undo.
    assert_eq!(history.undo_depth(), 2);
}

#[test]
fn test_clear_without_cleanup_keeps_tombstones() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(50);

    let a = add_entry(&mut board, 0.0);
    history.record(create_cmd(a), &mut board);
    let mut del = delete_cmd(a);
    del.apply(&mut board).unwrap();
    history.record(del, &mut board);

    history.clear(false, &mut board);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    // No cleanup ran: the tombstoned entity is still canonical.
    assert!(board.entries.contains(a));
}

#[test]
fn test_clear_with_cleanup_purges_owned_tombstones() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(50);

    let a = add_entry(&mut board, 0.0);
    history.record(create_cmd(a), &mut board);
    let mut del = delete_cmd(a);
    del.apply(&mut board).unwrap();
    history.record(del, &mut board);

    history.clear(true, &mut board);
    assert!(!board.entries.contains(a));
}

#[test]
fn test_disabled_history_records_nothing() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(50);
    assert!(history.is_enabled());

    let a = add_entry(&mut board, 0.0);
    history.record(create_cmd(a), &mut board);
    assert_eq!(history.undo_depth(), 1);

    history.disable();
    let b = add_entry(&mut board, 100.0);
    history.record(create_cmd(b), &mut board);
    assert_eq!(history.undo_depth(), 1);

    history.enable();
    let c = add_entry(&mut board, 200.0);
    history.record(create_cmd(c), &mut board);
    assert_eq!(history.undo_depth(), 2);
}

#[test]
fn test_descriptions() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(50);

    let a = add_entry(&mut board, 0.0);
    history.record(create_cmd(a), &mut board);

    assert_eq!(history.undo_description(), Some("Create Entry".to_string()));
    assert_eq!(history.redo_description(), None);

    history.undo(&mut board);
    assert_eq!(history.undo_description(), None);
    assert_eq!(history.redo_description(), Some("Create Entry".to_string()));
}

#[test]
fn test_trim_to_depth() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(100);

    for i in 0..10 {
        let id = add_entry(&mut board, (i as f64) * 50.0);
        history.record(create_cmd(id), &mut board);
    }
    assert_eq!(history.undo_depth(), 10);

    history.trim_to_depth(5, &mut board);
    assert_eq!(history.undo_depth(), 5);
}

#[test]
fn test_faulting_undo_clears_the_whole_stack() {
    let mut board = Board::new();
    let mut history = CommandHistory::new(50);

    let a = add_entry(&mut board, 0.0);
    history.record(create_cmd(a), &mut board);

    let target = DragTarget {
        id: a,
        kind: MirrorKind::Entry,
        old_key: 0,
        new_key: 0,
    };
    let mut mv = Command::Move(MoveEntities {
        targets: vec![target],
        dx: 10.0,
        dy: 0.0,
    });
    mv.apply(&mut board).unwrap();
    history.record(mv, &mut board);
    assert_eq!(history.undo_depth(), 2);

    // Pull the entity out from under the recorded move.
    board.entries.purge(a);

    assert_eq!(history.undo(&mut board), None);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}
