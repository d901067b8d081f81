use mindboard_engine::model::Point;
use mindboard_engine::spatial_index::Bounds;
use mindboard_engine::viewport::Viewport;

#[test]
fn test_identity_transform() {
    let viewport = Viewport::new(800.0, 600.0);
    let world = viewport.pixel_to_world(100.0, 50.0);
    assert_eq!((world.x, world.y), (100.0, 50.0));
    assert_eq!(viewport.world_to_pixel(100.0, 50.0), (100.0, 50.0));
}

#[test]
fn test_roundtrip_with_zoom_and_pan() {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.set_zoom(2.5);
    viewport.set_pan(120.0, -40.0);

    let world = viewport.pixel_to_world(300.0, 200.0);
    let (px, py) = viewport.world_to_pixel(world.x, world.y);
    assert!((px - 300.0).abs() < 1e-9);
    assert!((py - 200.0).abs() < 1e-9);
}

#[test]
fn test_zoom_clamping() {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.set_zoom(1000.0);
    assert_eq!(viewport.zoom(), 50.0);
    viewport.set_zoom(0.0001);
    assert_eq!(viewport.zoom(), 0.1);
    viewport.set_zoom(f64::NAN);
    assert_eq!(viewport.zoom(), 0.1);
}

#[test]
fn test_zoom_steps() {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.zoom_in();
    assert!((viewport.zoom() - 1.2).abs() < 1e-9);
    viewport.zoom_out();
    assert!((viewport.zoom() - 1.0).abs() < 1e-9);
}

#[test]
fn test_visible_world_bounds_follows_camera() {
    let mut viewport = Viewport::new(800.0, 600.0);
    let full = viewport.visible_world_bounds();
    assert_eq!(full.min_x, 0.0);
    assert_eq!(full.max_x, 800.0);

    viewport.set_zoom(2.0);
    let zoomed = viewport.visible_world_bounds();
    assert_eq!(zoomed.width(), 400.0);
    assert_eq!(zoomed.height(), 300.0);

    viewport.set_pan(-100.0, 0.0);
    let panned = viewport.visible_world_bounds();
    assert_eq!(panned.min_x, 50.0);
}

#[test]
fn test_fit_to_bounds_centers_content() {
    let mut viewport = Viewport::new(800.0, 600.0);
    let content = Bounds::new(0.0, 0.0, 400.0, 300.0);
    viewport.fit_to_bounds(&content, 0.0);

    assert!((viewport.zoom() - 2.0).abs() < 1e-9);
    let visible = viewport.visible_world_bounds();
    let (cx, cy) = visible.center();
    assert!((cx - 200.0).abs() < 1e-9);
    assert!((cy - 150.0).abs() < 1e-9);
}

#[test]
fn test_center_on_point() {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.center_on_point(&Point::new(1000.0, 1000.0));

    let visible = viewport.visible_world_bounds();
    let (cx, cy) = visible.center();
    assert!((cx - 1000.0).abs() < 1e-9);
    assert!((cy - 1000.0).abs() < 1e-9);
}

#[test]
fn test_pan_by_accumulates() {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.pan_by(10.0, 20.0);
    viewport.pan_by(-4.0, 6.0);
    assert_eq!(viewport.pan_x(), 6.0);
    assert_eq!(viewport.pan_y(), 26.0);

    viewport.reset();
    assert_eq!(viewport.pan_x(), 0.0);
    assert_eq!(viewport.zoom(), 1.0);
}
