//! Drives the full gallery through a recording backend.

use std::path::PathBuf;

use chrono::NaiveDate;
use spark_gallery::controls::ControlEvent;
use spark_gallery::renderer::Canvas;
use spark_gallery::state::focus;
use spark_gallery::{
    Control, Flow, Gallery, GalleryConfig, GalleryError, KeyboardEvent, Modifiers, Point,
    RecordingBackend, Size, Surface, SurfaceEvent,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
}

fn mounted() -> (Surface<RecordingBackend>, Gallery) {
    let mut surface = Surface::new(GalleryConfig::default(), RecordingBackend::new()).unwrap();
    let mut gallery = Gallery::new(today());
    gallery.install(&mut surface);
    surface.mount().unwrap();
    (surface, gallery)
}

#[test]
fn mount_shows_every_group() {
    let (surface, _gallery) = mounted();
    let text = surface.backend().text();
    for expected in [
        "Spark Gallery",
        "Buttons",
        "[ ] Two-state Checkbox",
        "Radio Buttons",
        "Basic String Header",
        "Calendar View",
        "Option 1",
        "Kendall Collins",
        "Progress Ring",
    ] {
        assert!(text.contains(expected), "missing {expected:?}");
    }
    assert_eq!(surface.groups().len(), 4);
}

#[test]
fn second_surface_rejected() {
    let (_surface, _gallery) = mounted();
    let err = Surface::new(GalleryConfig::default(), RecordingBackend::new()).err();
    assert!(matches!(err, Some(GalleryError::SurfaceExists)));
}

#[test]
fn tab_skips_disabled_controls() {
    let (mut surface, gallery) = mounted();
    let buttons = gallery.groups()[0].items()[0].controls();

    surface.dispatch(SurfaceEvent::Key(KeyboardEvent::new("Tab"))).unwrap();
    assert_eq!(focus::focused(), Some(buttons[0].id()));

    // Five enabled buttons, then the first checkbox; the disabled row is skipped
    for _ in 0..5 {
        surface.dispatch(SurfaceEvent::Key(KeyboardEvent::new("Tab"))).unwrap();
    }
    let checkboxes = gallery.groups()[0].items()[1].controls();
    assert_eq!(focus::focused(), Some(checkboxes[0].id()));

    surface.dispatch(SurfaceEvent::Key(KeyboardEvent::new(" "))).unwrap();
    assert!(surface.backend().text().contains("[x] Two-state Checkbox"));
}

#[test]
fn linked_pair_updates_display() {
    let (mut surface, gallery) = mounted();
    gallery
        .progress_edit()
        .handle_input(&ControlEvent::Input("0.7".into()));
    assert!(surface.flush().unwrap() > 0);

    assert_eq!(gallery.progress().get(), 0.7);
    assert!(surface.backend().text().contains(" 70%"));

    gallery.progress_edit().handle_input(&ControlEvent::ActivateTrailing);
    surface.flush().unwrap();
    assert!(surface.backend().text().contains(" 80%"));
    assert_eq!(gallery.progress_edit().text(), "0.8");
}

#[test]
fn pasted_number_edits_focused_field() {
    let (mut surface, gallery) = mounted();
    focus::focus(gallery.progress_edit().id());
    surface.dispatch(SurfaceEvent::Paste("0.7".into())).unwrap();

    assert!(!surface.is_dragging());
    assert_eq!(gallery.progress_edit().text(), "0.7");
    assert_eq!(gallery.progress().get(), 0.7);
    assert!(surface.backend().text().contains(" 70%"));
}

#[test]
fn malformed_edit_keeps_display() {
    let (mut surface, gallery) = mounted();
    gallery
        .progress_edit()
        .handle_input(&ControlEvent::Input("1.2.3".into()));
    surface.flush().unwrap();
    assert_eq!(gallery.progress().get(), 0.3);
    assert!(surface.backend().text().contains(" 30%"));
}

#[test]
fn removing_progress_item_releases_binding() {
    let (mut surface, gallery) = mounted();
    let group = gallery.groups()[3].clone();
    let item = group.items()[1].clone();
    assert_eq!(gallery.progress().subscriber_count(), 2);

    assert!(group.remove(&item));
    surface.flush().unwrap();
    assert!(!surface.backend().text().contains("Progress Ring"));

    assert!(!group.remove(&item));

    drop(item);
    assert_eq!(gallery.progress().subscriber_count(), 0);
}

#[test]
fn resize_reaches_background() {
    let (mut surface, _gallery) = mounted();
    surface.dispatch(SurfaceEvent::Resize(Size::new(100, 30))).unwrap();
    assert_eq!(surface.size(), Size::new(100, 30));
    assert_eq!(surface.background().unwrap().size(), Size::new(100, 30));
}

#[test]
fn drop_gesture_through_dispatch() {
    let (mut surface, _gallery) = mounted();
    surface.dispatch(SurfaceEvent::DragEnter(Point::new(2, 2))).unwrap();
    assert!(surface.is_dragging());
    surface.dispatch(SurfaceEvent::DragOver(Point::new(3, 2))).unwrap();
    surface
        .dispatch(SurfaceEvent::FilesDropped(vec![PathBuf::from("/tmp/a.txt")]))
        .unwrap();
    assert!(!surface.is_dragging());

    // Leave without a gesture is ignored
    surface.dispatch(SurfaceEvent::DragLeave).unwrap();
    assert!(!surface.is_dragging());
}

#[test]
fn quit_key_stops_loop() {
    let (mut surface, _gallery) = mounted();
    let quit = KeyboardEvent::with_modifiers("q", Modifiers::ctrl());
    assert_eq!(surface.dispatch(SurfaceEvent::Key(quit)).unwrap(), Flow::Quit);
}

#[test]
fn full_frame_paints_header() {
    let (surface, _gallery) = mounted();
    let canvas = Canvas::paint(&surface.render(), surface.size()).unwrap();
    let lines = canvas.lines();
    assert_eq!(lines.len(), 48);
    assert!(lines[1].contains("Spark Gallery"));
    assert!(lines.iter().any(|line| line.contains("Buttons")));
}
