use mindboard_engine::board::Board;
use mindboard_engine::model::{EntityId, EntityKind, Entry, Mirror, Point};
use mindboard_engine::selection_manager::{SelectMode, SelectionManager};
use mindboard_engine::spatial_index::Bounds;

fn add_entry(board: &mut Board, x: f64, y: f64) -> EntityId {
    let id = board.generate_id();
    let mut entry = Entry::new(id, EntityId::ROOT, Point::new(x, y), "e".to_string());
    entry.render_key = board.selection.next_order();
    board.insert_entry(entry);
    id
}

#[test]
fn test_select_modes() {
    let mut selection = SelectionManager::new();
    let (a, b) = (EntityId(1), EntityId(2));

    selection.select(a, SelectMode::Replace);
    assert_eq!(selection.selected(), &[a]);

    selection.select(b, SelectMode::Add);
    assert_eq!(selection.selected(), &[a, b]);
    assert_eq!(selection.primary(), Some(b));

    selection.select(b, SelectMode::Replace);
    assert_eq!(selection.selected(), &[b]);

    selection.select(b, SelectMode::Remove);
    assert!(selection.is_empty());
}

#[test]
fn test_add_moves_to_end_without_duplicating() {
    let mut selection = SelectionManager::new();
    let (a, b) = (EntityId(1), EntityId(2));

    selection.select(a, SelectMode::Add);
    selection.select(b, SelectMode::Add);
    selection.select(a, SelectMode::Add);

    assert_eq!(selection.selected(), &[b, a]);
    assert_eq!(selection.primary(), Some(a));
}

#[test]
fn test_batch_select_skips_handles_from_pointer() {
    let mut selection = SelectionManager::new();
    let entry = Mirror::new(
        EntityId(1),
        EntityKind::Entry,
        Bounds::new(0.0, 0.0, 10.0, 10.0),
        1,
        1,
    );
    let handle = Mirror::handle(EntityId(2), Bounds::new(0.0, 0.0, 4.0, 4.0), 2);
    let mut unselectable = Mirror::new(
        EntityId(3),
        EntityKind::Image,
        Bounds::new(0.0, 0.0, 10.0, 10.0),
        2,
        3,
    );
    unselectable.selectable = false;

    selection.select_batch([&entry, &handle, &unselectable], SelectMode::Replace, true);
    assert_eq!(selection.selected(), &[EntityId(1)]);

    // Non-pointer batches take everything selectable or not filtered.
    selection.select_batch([&entry, &handle], SelectMode::Replace, false);
    assert_eq!(selection.selected_count(), 2);
}

#[test]
fn test_order_counter_is_monotonic() {
    let mut selection = SelectionManager::new();
    assert_eq!(selection.current_order(), 0);
    assert_eq!(selection.next_order(), 1);
    assert_eq!(selection.next_order(), 2);

    selection.reset_order_floor(41);
    assert_eq!(selection.next_order(), 42);
}

#[test]
fn test_purge_handles() {
    let mut selection = SelectionManager::new();
    selection.select(EntityId(1), SelectMode::Add);
    selection.select(EntityId(2), SelectMode::Add);

    selection.purge_handles(|id| id == EntityId(2));
    assert_eq!(selection.selected(), &[EntityId(1)]);
}

#[test]
fn test_board_select_at_point() {
    let mut board = Board::new();
    let a = add_entry(&mut board, 0.0, 0.0);
    let _b = add_entry(&mut board, 200.0, 0.0);

    // Default viewport has zoom 1 and no pan: screen == world.
    let hit = board.select_at(10.0, 10.0, SelectMode::Replace);
    assert_eq!(hit, Some(a));
    assert_eq!(board.selection.selected(), &[a]);

    // Clicking empty space with Replace clears.
    let miss = board.select_at(500.0, 500.0, SelectMode::Replace);
    assert_eq!(miss, None);
    assert!(board.selection.is_empty());
}

#[test]
fn test_board_select_at_prefers_topmost() {
    let mut board = Board::new();
    let _bottom = add_entry(&mut board, 0.0, 0.0);
    let top = add_entry(&mut board, 5.0, 5.0);

    let hit = board.select_at(8.0, 8.0, SelectMode::Replace);
    assert_eq!(hit, Some(top));
}

#[test]
fn test_board_marquee_selection() {
    let mut board = Board::new();
    let a = add_entry(&mut board, 0.0, 0.0);
    let b = add_entry(&mut board, 60.0, 0.0);
    let _far = add_entry(&mut board, 2000.0, 0.0);

    board.select_in_rect(&Bounds::new(-10.0, -10.0, 120.0, 40.0), SelectMode::Replace);
    assert_eq!(board.selection.selected_count(), 2);
    assert!(board.selection.is_selected(a));
    assert!(board.selection.is_selected(b));

    board.select_in_rect(&Bounds::new(1990.0, -10.0, 2100.0, 40.0), SelectMode::Add);
    assert_eq!(board.selection.selected_count(), 3);
}

#[test]
fn test_drag_promotes_and_removes_from_index() {
    let mut board = Board::new();
    let a = add_entry(&mut board, 0.0, 0.0);
    let b = add_entry(&mut board, 100.0, 0.0);
    let bystander = add_entry(&mut board, 300.0, 0.0);

    board.selection.select(a, SelectMode::Replace);
    board.selection.select(b, SelectMode::Add);
    board.drag_start();

    let key_a = board.render_key_of(a, EntityKind::Entry).unwrap();
    let key_b = board.render_key_of(b, EntityKind::Entry).unwrap();
    let key_bystander = board.render_key_of(bystander, EntityKind::Entry).unwrap();
    assert_eq!(key_a, key_b);
    assert!(key_a > key_bystander);

    // Dragged objects are out of the index, the bystander stays.
    assert!(!board.spatial().contains(a));
    assert!(!board.spatial().contains(b));
    assert!(board.spatial().contains(bystander));

    board.drag_update(50.0, 25.0);
    let commit = board.drag_end().expect("drag was in flight");
    assert_eq!(commit.targets.len(), 2);
    assert_eq!(commit.dx, 50.0);
    assert_eq!(commit.dy, 25.0);

    // Back in the index at the moved position.
    assert!(board.spatial().contains(a));
    let pos = board.entries.data(a).unwrap().position;
    assert_eq!((pos.x, pos.y), (50.0, 25.0));
}

#[test]
fn test_drag_abort_restores_everything() {
    let mut board = Board::new();
    let a = add_entry(&mut board, 0.0, 0.0);
    let old_key = board.render_key_of(a, EntityKind::Entry).unwrap();

    board.selection.select(a, SelectMode::Replace);
    board.drag_start();
    board.drag_update(80.0, 80.0);
    board.drag_abort();

    let data = board.entries.data(a).unwrap();
    assert_eq!((data.position.x, data.position.y), (0.0, 0.0));
    assert_eq!(data.render_key, old_key);
    assert!(board.spatial().contains(a));
    assert!(!board.selection.is_dragging());
}
