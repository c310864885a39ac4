use super::*;
use crate::assets::decode::PreparedImage;
use crate::assets::provider::MemoryAssetProvider;
use crate::foundation::core::Point;

fn provider() -> Arc<MemoryAssetProvider> {
    Arc::new(MemoryAssetProvider::new())
}

#[test]
fn element_transform_centers_square_image_on_position() {
    let el = PlacedElement::new("x", Point::new(100.0, 50.0)).unwrap();
    let t = element_transform(&el, 300, 300, 1.0);
    let top_left = t * Point::new(0.0, 0.0);
    let bottom_right = t * Point::new(300.0, 300.0);
    assert!((top_left.x - 25.0).abs() < 1e-9 && (top_left.y + 25.0).abs() < 1e-9);
    assert!((bottom_right.x - 175.0).abs() < 1e-9 && (bottom_right.y - 125.0).abs() < 1e-9);
}

#[test]
fn element_transform_fits_wide_image_inside_base_square() {
    let el = PlacedElement::new("x", Point::new(0.0, 0.0)).unwrap();
    let t = element_transform(&el, 300, 150, 2.0);
    let a = t * Point::new(0.0, 0.0);
    let b = t * Point::new(300.0, 150.0);
    // 150 wide, 75 tall in logical units, doubled by supersampling.
    assert!((b.x - a.x - 300.0).abs() < 1e-9);
    assert!((b.y - a.y - 150.0).abs() < 1e-9);
    assert!((a.x + b.x).abs() < 1e-9 && (a.y + b.y).abs() < 1e-9);
}

#[test]
fn opts_builders_clamp_quality() {
    let opts = CompositorOpts::default()
        .with_jpeg_quality(0)
        .with_format(OutputFormat::Png)
        .with_clear_rgba([1, 2, 3, 255]);
    assert_eq!(opts.jpeg_quality, 1);
    assert_eq!(opts.format, OutputFormat::Png);
    assert_eq!(opts.clear_rgba, [1, 2, 3, 255]);
    assert_eq!(CompositorOpts::default().with_jpeg_quality(200).jpeg_quality, 100);
    assert_eq!(CompositorOpts::default().jpeg_quality, 85);
}

#[test]
fn empty_canvas_is_clear_color() {
    let comp = Compositor::with_opts(
        provider(),
        CompositorOpts::default().with_clear_rgba([0, 0, 255, 255]),
    );
    let frame = comp
        .flatten(&Canvas::new(), Size::new(10.0, 5.0), 2.0)
        .unwrap();
    assert_eq!((frame.width, frame.height), (20, 10));
    assert!(
        frame
            .data
            .chunks_exact(4)
            .all(|px| px == [0u8, 0, 255, 255].as_slice())
    );
}

#[test]
fn theme_background_is_used_when_user_background_is_missing() {
    let assets = provider();
    assets.insert("theme", PreparedImage::solid(4, 4, [0, 255, 0, 255]).unwrap());
    let mut canvas = Canvas::with_theme_background("theme");
    canvas.set_background("gone");

    let frame = Compositor::new(assets)
        .flatten(&canvas, Size::new(16.0, 8.0), 1.0)
        .unwrap();
    let px = frame.pixel(8, 4).unwrap();
    assert!(px[1] > 250 && px[0] < 5 && px[2] < 5);
}

#[test]
fn invalid_elements_are_skipped() {
    let assets = provider();
    assets.insert("red", PreparedImage::solid(2, 2, [255, 0, 0, 255]).unwrap());
    let mut canvas = Canvas::new();
    canvas.add_element("red", Point::new(5.0, 5.0)).unwrap();
    canvas.elements[0].scale = -1.0;

    let frame = Compositor::new(assets)
        .flatten(&canvas, Size::new(10.0, 10.0), 1.0)
        .unwrap();
    assert_eq!(frame.pixel(5, 5), Some([0, 0, 0, 255]));
}

#[test]
fn render_reports_pixel_size_and_format() {
    let out = Compositor::new(provider())
        .render(&Canvas::new(), Size::new(33.3, 10.0), 3.0)
        .unwrap();
    assert_eq!((out.pixel_width, out.pixel_height), (100, 30));
    assert_eq!(out.format, OutputFormat::Jpeg);
    assert_eq!(&out.image_bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn oversized_element_is_skipped_not_fatal() {
    let assets = provider();
    assets.insert("huge", PreparedImage::solid(70_000, 1, [255, 0, 0, 255]).unwrap());
    assets.insert("blue", PreparedImage::solid(2, 2, [0, 0, 255, 255]).unwrap());
    let mut canvas = Canvas::new();
    canvas.add_element("huge", Point::new(50.0, 50.0)).unwrap();
    canvas.add_element("blue", Point::new(90.0, 90.0)).unwrap();

    let frame = Compositor::new(assets)
        .flatten(&canvas, Size::new(100.0, 100.0), 1.0)
        .unwrap();
    assert_eq!((frame.width, frame.height), (100, 100));
    assert_eq!(frame.pixel(10, 10), Some([0, 0, 0, 255]));
    let px = frame.pixel(90, 90).unwrap();
    assert!(px[2] > 250 && px[0] < 5);
}

#[test]
fn oversized_background_falls_back_to_theme() {
    let assets = provider();
    assets.insert("huge", PreparedImage::solid(70_000, 1, [255, 0, 0, 255]).unwrap());
    assets.insert("theme", PreparedImage::solid(4, 4, [0, 255, 0, 255]).unwrap());
    let mut canvas = Canvas::with_theme_background("theme");
    canvas.set_background("huge");

    let frame = Compositor::new(Arc::clone(&assets) as Arc<dyn AssetProvider>)
        .flatten(&canvas, Size::new(100.0, 100.0), 1.0)
        .unwrap();
    let px = frame.pixel(50, 50).unwrap();
    assert!(px[1] > 250 && px[0] < 5);

    canvas.theme_background = None;
    let frame = Compositor::new(assets)
        .flatten(&canvas, Size::new(100.0, 100.0), 1.0)
        .unwrap();
    assert_eq!(frame.pixel(50, 50), Some([0, 0, 0, 255]));
}
