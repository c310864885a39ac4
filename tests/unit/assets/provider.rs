use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b").unwrap(), "a/b");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn memory_provider_resolves_registered_names_only() {
    let p = MemoryAssetProvider::new();
    assert!(p.is_empty());
    p.insert("bear_01", PreparedImage::solid(4, 4, [1, 2, 3, 255]).unwrap());
    p.insert_encoded("cat_01", &png_bytes(2, 3, [9, 9, 9, 255]))
        .unwrap();
    assert_eq!(p.len(), 2);

    assert_eq!(p.resolve("bear_01").unwrap().width, 4);
    assert_eq!(p.resolve("cat_01").unwrap().height, 3);
    let err = p.resolve("dog_01").unwrap_err();
    assert!(matches!(err, StickerError::AssetUnresolved(_)));

    assert!(p.remove("bear_01"));
    assert!(p.resolve("bear_01").is_err());
}

#[test]
fn dir_provider_searches_bundle_layout() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("pager")).unwrap();
    std::fs::create_dir_all(root.join("stick/cat/stickers")).unwrap();
    std::fs::create_dir_all(root.join("stick/bear")).unwrap();

    std::fs::write(root.join("pager/pager_01.png"), png_bytes(8, 16, [0, 0, 255, 255])).unwrap();
    std::fs::write(root.join("stick/bear/bear_main.png"), png_bytes(5, 5, [1, 1, 1, 255]))
        .unwrap();
    std::fs::write(
        root.join("stick/cat/stickers/cat_sticker_01.png"),
        png_bytes(3, 3, [2, 2, 2, 255]),
    )
    .unwrap();

    let p = DirAssetProvider::new(root);
    assert_eq!(p.themes(), &["bear".to_string(), "cat".to_string()]);

    assert_eq!(p.resolve("pager_01").unwrap().height, 16);
    assert_eq!(p.resolve("bear_main").unwrap().width, 5);
    assert_eq!(p.resolve("cat_sticker_01.png").unwrap().width, 3);
    assert!(matches!(
        p.resolve("missing").unwrap_err(),
        StickerError::AssetUnresolved(_)
    ));
    assert!(matches!(
        p.resolve("../escape").unwrap_err(),
        StickerError::AssetUnresolved(_)
    ));
}

#[test]
fn dir_provider_caches_decoded_images() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bg.png");
    std::fs::write(&path, png_bytes(2, 2, [5, 5, 5, 255])).unwrap();

    let p = DirAssetProvider::new(dir.path());
    let first = p.resolve("bg").unwrap();
    std::fs::remove_file(&path).unwrap();
    let second = p.resolve("bg").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn dir_provider_reports_undecodable_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"nope").unwrap();
    let p = DirAssetProvider::new(dir.path());
    assert!(matches!(
        p.resolve("broken").unwrap_err(),
        StickerError::AssetUnresolved(_)
    ));
}

#[test]
fn candidates_cover_extensions_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let p = DirAssetProvider::new(dir.path());
    let c = p.candidates("x");
    assert_eq!(
        c,
        vec!["x.png", "x.jpg", "x.jpeg", "pager/x.png", "pager/x.jpg", "pager/x.jpeg"]
    );
    assert_eq!(p.candidates("y.JPG"), vec!["y.JPG", "pager/y.JPG"]);
}
