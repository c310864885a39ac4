use super::*;
use crate::foundation::core::Point;

#[test]
fn json_round_trip_keeps_canvas() {
    let mut canvas = Canvas::with_theme_background("theme_A");
    canvas.add_element("bear_01", Point::new(100.0, 100.0)).unwrap();
    let doc = CanvasDocument::new(Size::new(300.0, 600.0), canvas);

    let text = doc.to_json_string().unwrap();
    let back = CanvasDocument::from_json_str(&text).unwrap();
    assert_eq!(back, doc);
    assert_eq!(
        back.output_pixels().unwrap(),
        PixelSize {
            width: 900,
            height: 1800
        }
    );
}

#[test]
fn supersample_defaults_when_missing() {
    let doc = CanvasDocument::from_json_str(
        r#"{"viewport":{"width":10.0,"height":20.0},"canvas":{}}"#,
    )
    .unwrap();
    assert_eq!(doc.supersample, DEFAULT_SUPERSAMPLE);
    doc.validate().unwrap();
}

#[test]
fn validate_rejects_zero_viewport() {
    let doc = CanvasDocument::new(Size::new(0.0, 0.0), Canvas::new());
    assert!(matches!(
        doc.validate().unwrap_err(),
        StickerError::InvalidDimensions(_)
    ));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        CanvasDocument::from_json_str("{").unwrap_err(),
        StickerError::Serde(_)
    ));
}

#[test]
fn read_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("canvas.json");
    let doc = CanvasDocument::new(Size::new(50.0, 50.0), Canvas::new());
    std::fs::write(&path, doc.to_json_string().unwrap()).unwrap();
    assert_eq!(CanvasDocument::read(&path).unwrap(), doc);
    assert!(CanvasDocument::read(&dir.path().join("missing.json")).is_err());
}
