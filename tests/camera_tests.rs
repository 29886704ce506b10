use waids_wyverns::camera::{MapView, MAX_ZOOM, MIN_ZOOM};
use waids_wyverns::utils::{Position, Size};

fn close(a: Position, b: Position) -> bool {
    (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
}

#[test]
fn zoom_stays_within_bounds() {
    let mut view = MapView::new(Size::new(640.0, 480.0));
    view.zoom_out();
    assert_eq!(view.zoom(), MIN_ZOOM);
    for _ in 0..50 {
        view.zoom_in();
    }
    assert_eq!(view.zoom(), MAX_ZOOM);
}

#[test]
fn zoom_keeps_centre_fixed() {
    let mut view = MapView::new(Size::new(640.0, 480.0));
    view.zoom_in();
    let centre = Position::new(320.0, 240.0);
    assert!(close(view.to_screen(centre), centre));
    assert!(close(view.to_screen(Position::new(0.0, 0.0)), view.offset()));
}

#[test]
fn screen_and_map_round_trip() {
    let mut view = MapView::new(Size::new(640.0, 480.0));
    view.set_zoom(2.5);
    let p = Position::new(17.0, 301.0);
    assert!(close(view.to_map(view.to_screen(p)), p));
    let rect = view.map_rect();
    assert!((rect.width - 1600.0).abs() < 1e-3);
}
