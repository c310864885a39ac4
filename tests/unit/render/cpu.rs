use super::*;

fn size(width: u32, height: u32) -> PixelSize {
    PixelSize { width, height }
}

fn assert_px(frame: &FrameRGBA, x: u32, y: u32, want: [u8; 4]) {
    let got = frame.pixel(x, y).unwrap();
    assert!(
        got.iter().zip(want).all(|(g, w)| g.abs_diff(w) <= 2),
        "pixel ({x},{y}) = {got:?}, want {want:?}"
    );
}

#[test]
fn fill_solid_covers_every_pixel() {
    let mut r = CpuRasterizer::new(size(8, 4)).unwrap();
    r.fill_solid([10, 20, 30, 255]);
    let frame = r.finish();
    assert_eq!(frame.width, 8);
    assert_eq!(frame.height, 4);
    assert!(frame.premultiplied);
    assert!(frame.data.chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
}

#[test]
fn later_draws_land_on_top() {
    let red = PreparedImage::solid(4, 4, [255, 0, 0, 255]).unwrap();
    let blue = PreparedImage::solid(4, 4, [0, 0, 255, 255]).unwrap();

    let mut r = CpuRasterizer::new(size(16, 16)).unwrap();
    r.fill_solid([0, 0, 0, 255]);
    r.draw_image(&red, Affine::scale(4.0)).unwrap();
    r.draw_image(&blue, Affine::translate((8.0, 8.0)) * Affine::scale(2.0))
        .unwrap();
    let frame = r.finish();

    assert_px(&frame, 2, 2, [255, 0, 0, 255]);
    assert_px(&frame, 12, 12, [0, 0, 255, 255]);
    assert_px(&frame, 14, 2, [0, 0, 0, 255]);
}

#[test]
fn offscreen_images_are_clipped_not_errors() {
    let img = PreparedImage::solid(4, 4, [0, 255, 0, 255]).unwrap();
    let mut r = CpuRasterizer::new(size(8, 8)).unwrap();
    r.fill_solid([0, 0, 0, 255]);
    r.draw_image(&img, Affine::translate((-100.0, -100.0))).unwrap();
    r.draw_image(&img, Affine::translate((6.0, 6.0))).unwrap();
    let frame = r.finish();
    assert_px(&frame, 0, 0, [0, 0, 0, 255]);
    assert_px(&frame, 7, 7, [0, 255, 0, 255]);
}

#[test]
fn rejects_oversized_targets() {
    assert!(CpuRasterizer::new(size(70_000, 1)).is_err());
    assert!(CpuRasterizer::new(size(0, 1)).is_err());
}
