use std::collections::HashSet;

use proptest::prelude::*;

use mindboard_engine::model::EntityId;
use mindboard_engine::spatial_index::{Bounds, SpatialIndex};

#[test]
fn test_bounds_creation() {
    let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(bounds.min_x, 0.0);
    assert_eq!(bounds.max_x, 10.0);
    assert_eq!(bounds.width(), 10.0);
    assert_eq!(bounds.height(), 10.0);
}

#[test]
fn test_bounds_center() {
    let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let (cx, cy) = bounds.center();
    assert_eq!(cx, 5.0);
    assert_eq!(cy, 5.0);
}

#[test]
fn test_bounds_contains_point() {
    let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(bounds.contains_point(5.0, 5.0));
    assert!(bounds.contains_point(0.0, 0.0));
    assert!(bounds.contains_point(10.0, 10.0));
    assert!(!bounds.contains_point(11.0, 5.0));
    assert!(!bounds.contains_point(5.0, -1.0));
}

#[test]
fn test_bounds_intersection() {
    let b1 = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let b2 = Bounds::new(5.0, 5.0, 15.0, 15.0);
    let b3 = Bounds::new(20.0, 20.0, 30.0, 30.0);

    assert!(b1.intersects(&b2));
    assert!(b2.intersects(&b1));
    assert!(!b1.intersects(&b3));
}

#[test]
fn test_bounds_from_corners_normalizes() {
    let b = Bounds::from_corners(10.0, 20.0, -5.0, 3.0);
    assert_eq!(b.min_x, -5.0);
    assert_eq!(b.min_y, 3.0);
    assert_eq!(b.max_x, 10.0);
    assert_eq!(b.max_y, 20.0);
}

#[test]
fn test_insert_and_query() {
    let mut index = SpatialIndex::new();

    index.insert(EntityId(1), &Bounds::new(0.0, 0.0, 10.0, 10.0));
    index.insert(EntityId(2), &Bounds::new(5.0, 5.0, 15.0, 15.0));

    let results = index.query(&Bounds::new(7.0, 7.0, 12.0, 12.0));
    assert_eq!(results.len(), 2);
    assert_eq!(index.len(), 2);
}

#[test]
fn test_query_misses_disjoint_objects() {
    let mut index = SpatialIndex::new();
    index.insert(EntityId(1), &Bounds::new(0.0, 0.0, 10.0, 10.0));

    let results = index.query(&Bounds::new(50.0, 50.0, 60.0, 60.0));
    assert!(results.is_empty());
}

#[test]
fn test_query_point() {
    let mut index = SpatialIndex::new();
    index.insert(EntityId(7), &Bounds::new(0.0, 0.0, 10.0, 10.0));

    assert!(index.query_point(5.0, 5.0).contains(&EntityId(7)));
    assert!(!index.query_point(150.0, 150.0).contains(&EntityId(7)));
}

#[test]
fn test_multi_cell_object_deduplicated() {
    // Small cells force the object across many buckets.
    let mut index = SpatialIndex::with_cell_size(16.0);
    index.insert(EntityId(1), &Bounds::new(0.0, 0.0, 100.0, 100.0));

    let results = index.query(&Bounds::new(-10.0, -10.0, 110.0, 110.0));
    assert_eq!(results, vec![EntityId(1)]);
}

#[test]
fn test_remove_prunes_buckets() {
    let mut index = SpatialIndex::with_cell_size(16.0);
    let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0);
    index.insert(EntityId(1), &bounds);
    assert!(index.stats().occupied_cells > 1);

    assert!(index.remove(EntityId(1), &bounds));
    assert_eq!(index.stats().occupied_cells, 0);
    assert_eq!(index.len(), 0);
    assert!(!index.remove(EntityId(1), &bounds));
}

#[test]
fn test_reindex_on_move() {
    let mut index = SpatialIndex::new();
    let old = Bounds::new(0.0, 0.0, 10.0, 10.0);
    index.insert(EntityId(1), &old);

    let new = Bounds::new(500.0, 500.0, 510.0, 510.0);
    index.remove(EntityId(1), &old);
    index.insert(EntityId(1), &new);

    assert!(index.query(&old).is_empty());
    assert_eq!(index.query(&new), vec![EntityId(1)]);
}

#[test]
fn test_clear() {
    let mut index = SpatialIndex::new();
    index.insert(EntityId(1), &Bounds::new(0.0, 0.0, 10.0, 10.0));
    assert!(!index.query_point(5.0, 5.0).is_empty());

    index.clear();
    assert!(index.query_point(5.0, 5.0).is_empty());
    assert!(index.is_empty());
}

#[test]
fn test_stats() {
    let mut index = SpatialIndex::with_cell_size(64.0);
    for i in 0..20 {
        let x = (i as f64) * 50.0;
        index.insert(EntityId(i), &Bounds::new(x, 0.0, x + 10.0, 10.0));
    }

    let stats = index.stats();
    assert_eq!(stats.total_items, 20);
    assert!(stats.occupied_cells > 1);
    assert!(stats.max_bucket >= 1);
}

#[test]
fn test_large_coordinates() {
    let mut index = SpatialIndex::new();

    index.insert(EntityId(1), &Bounds::new(1000.0, 1000.0, 1010.0, 1010.0));
    assert!(index.query_point(1005.0, 1005.0).contains(&EntityId(1)));

    index.insert(
        EntityId(2),
        &Bounds::new(50000.0, -50000.0, 50010.0, -49990.0),
    );
    assert!(index.query_point(50005.0, -49995.0).contains(&EntityId(2)));
}

#[test]
fn test_query_iter_is_lazy_and_finite() {
    let mut index = SpatialIndex::new();
    for i in 0..100 {
        let x = (i as f64) * 20.0;
        index.insert(EntityId(i), &Bounds::new(x, 0.0, x + 10.0, 10.0));
    }

    let mut iter = index.query_iter(&Bounds::new(0.0, 0.0, 2000.0, 10.0));
    assert!(iter.next().is_some());
    assert_eq!(iter.count() + 1, 100);
}

#[test]
fn test_stress_insert_query() {
    let mut index = SpatialIndex::new();
    for i in 0..1000 {
        let x = ((i % 50) as f64) * 10.0;
        let y = ((i / 50) as f64) * 10.0;
        index.insert(EntityId(i), &Bounds::new(x, y, x + 5.0, y + 5.0));
    }

    assert_eq!(index.stats().total_items, 1000);
    assert!(!index.query(&Bounds::new(0.0, 0.0, 100.0, 100.0)).is_empty());
}

proptest! {
    /// Completeness oracle: an object is in the query result iff its
    /// bounds intersect the query rectangle, and never more than once.
    #[test]
    fn prop_query_matches_brute_force(
        objects in prop::collection::vec(
            (-500.0f64..500.0, -500.0f64..500.0, 0.1f64..150.0, 0.1f64..150.0),
            1..60,
        ),
        query in (-600.0f64..600.0, -600.0f64..600.0, 0.1f64..400.0, 0.1f64..400.0),
    ) {
        let mut index = SpatialIndex::with_cell_size(48.0);
        let mut all = Vec::new();
        for (i, (x, y, w, h)) in objects.iter().enumerate() {
            let bounds = Bounds::new(*x, *y, x + w, y + h);
            index.insert(EntityId(i as u64), &bounds);
            all.push((EntityId(i as u64), bounds));
        }

        let rect = Bounds::new(query.0, query.1, query.0 + query.2, query.1 + query.3);
        let results = index.query(&rect);

        // No duplicates even when objects span several cells.
        let unique: HashSet<EntityId> = results.iter().copied().collect();
        prop_assert_eq!(unique.len(), results.len());

        let expected: HashSet<EntityId> = all
            .iter()
            .filter(|(_, b)| b.intersects(&rect))
            .map(|(id, _)| *id)
            .collect();
        prop_assert_eq!(unique, expected);
    }
}
