use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StickerError::invalid_dimensions("x")
            .to_string()
            .contains("invalid dimensions:")
    );
    assert!(
        StickerError::asset_unresolved("x")
            .to_string()
            .contains("asset unresolved:")
    );
    assert!(
        StickerError::encoding("x")
            .to_string()
            .contains("encoding failed:")
    );
    assert!(
        StickerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        StickerError::permission_denied("x")
            .to_string()
            .contains("permission denied:")
    );
    assert!(
        StickerError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StickerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
