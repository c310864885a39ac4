use super::*;

fn frame(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.iter().copied().cycle().take((w * h * 4) as usize).collect(),
        premultiplied: true,
    }
}

#[test]
fn jpeg_has_soi_marker_and_decodes_to_same_size() {
    let bytes = encode_frame(&frame(32, 16, [200, 40, 40, 255]), OutputFormat::Jpeg, 85).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (32, 16));
    let px = decoded.get_pixel(16, 8).0;
    assert!(px[0].abs_diff(200) < 8 && px[1].abs_diff(40) < 8);
}

#[test]
fn png_keeps_alpha() {
    let bytes = encode_frame(&frame(4, 4, [0, 0, 0, 0]), OutputFormat::Png, 0).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 0]);
}

#[test]
fn higher_quality_is_not_smaller() {
    // Noise-like content so the quantizer matters.
    let mut f = frame(64, 64, [0, 0, 0, 255]);
    for (i, px) in f.data.chunks_exact_mut(4).enumerate() {
        px[0] = (i * 37 % 251) as u8;
        px[1] = (i * 91 % 241) as u8;
        px[2] = (i * 13 % 239) as u8;
    }
    let low = encode_frame(&f, OutputFormat::Jpeg, 10).unwrap();
    let high = encode_frame(&f, OutputFormat::Jpeg, 95).unwrap();
    assert!(high.len() > low.len());
}

#[test]
fn mismatched_buffers_fail_with_encoding_error() {
    let mut f = frame(4, 4, [1, 2, 3, 255]);
    f.data.truncate(10);
    assert!(matches!(
        encode_frame(&f, OutputFormat::Jpeg, 85).unwrap_err(),
        StickerError::EncodingFailed(_)
    ));
}

#[test]
fn extensions() {
    assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
    assert_eq!(OutputFormat::Png.extension(), "png");
    assert_eq!(OutputFormat::default(), OutputFormat::Jpeg);
}
