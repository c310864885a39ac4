use super::*;

#[test]
fn to_pixels_rounds_to_nearest() {
    let px = Size::new(390.0, 844.0).to_pixels(3.0).unwrap();
    assert_eq!(px, PixelSize { width: 1170, height: 2532 });

    let px = Size::new(10.5, 3.3).to_pixels(1.0).unwrap();
    assert_eq!(px, PixelSize { width: 11, height: 3 });

    let px = Size::new(100.0, 50.0).to_pixels(0.333).unwrap();
    assert_eq!(px, PixelSize { width: 33, height: 17 });
}

#[test]
fn to_pixels_rejects_non_positive_inputs() {
    for (size, ss) in [
        (Size::new(0.0, 0.0), 1.0),
        (Size::new(-1.0, 10.0), 1.0),
        (Size::new(10.0, 10.0), 0.0),
        (Size::new(10.0, 10.0), -2.0),
        (Size::new(f64::NAN, 10.0), 1.0),
        (Size::new(10.0, 10.0), f64::INFINITY),
    ] {
        let err = size.to_pixels(ss).unwrap_err();
        assert!(matches!(err, StickerError::InvalidDimensions(_)), "{err}");
    }
}

#[test]
fn to_pixels_rejects_rasters_that_round_to_zero_or_overflow() {
    assert!(Size::new(0.2, 0.2).to_pixels(1.0).is_err());
    assert!(Size::new(30_000.0, 10.0).to_pixels(3.0).is_err());
}

#[test]
fn aspect_fill_covers_and_centers() {
    // 200x100 into 100x100: scale 1.0 on height, 50px cropped on each side.
    let a = aspect_fill(200.0, 100.0, 100.0, 100.0);
    let tl = a * Point::new(0.0, 0.0);
    let br = a * Point::new(200.0, 100.0);
    assert!((tl.x - -50.0).abs() < 1e-9 && tl.y.abs() < 1e-9);
    assert!((br.x - 150.0).abs() < 1e-9 && (br.y - 100.0).abs() < 1e-9);
}

#[test]
fn aspect_fit_contains_and_centers() {
    let a = aspect_fit(200.0, 100.0, 100.0, 100.0);
    let tl = a * Point::new(0.0, 0.0);
    let br = a * Point::new(200.0, 100.0);
    assert!(tl.x.abs() < 1e-9 && (tl.y - 25.0).abs() < 1e-9);
    assert!((br.x - 100.0).abs() < 1e-9 && (br.y - 75.0).abs() < 1e-9);
}

#[test]
fn premul_from_straight() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
}
