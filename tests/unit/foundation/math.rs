use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![200u8, 100, 50, 128, 10, 20, 30, 0, 1, 2, 3, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    assert_eq!(&px[8..12], &[1, 2, 3, 255]);

    unpremultiply_rgba8_in_place(&mut px);
    for (got, want) in px[..3].iter().zip([200u8, 100, 50]) {
        assert!(got.abs_diff(want) <= 2, "{got} vs {want}");
    }
}

#[test]
fn over_opaque_uses_background_for_transparent_pixels() {
    let src = [0u8, 0, 0, 0, 255, 0, 0, 255];
    let rgb = premul_over_opaque_rgb8(&src, [10, 20, 30]);
    assert_eq!(rgb, vec![10, 20, 30, 255, 0, 0]);
}
