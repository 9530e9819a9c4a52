use std::collections::HashMap;
use std::io::Cursor;

use super::*;

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

struct MapFetcher(HashMap<String, Vec<u8>>);

impl AssetFetcher for MapFetcher {
    fn fetch(&self, source: &str) -> TryOnResult<Vec<u8>> {
        self.0
            .get(source)
            .cloned()
            .ok_or_else(|| TryOnError::image_load(source, "not found"))
    }
}

fn slot(s: &str) -> OverlayId {
    OverlayId::from(s)
}

#[test]
fn normalize_rel_path_rejects_escapes() {
    assert_eq!(normalize_rel_path("a/./b\\c.png").unwrap(), "a/b/c.png");
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("../secret.png").is_err());
    assert!(normalize_rel_path("a/../../b.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn newer_request_makes_older_ticket_stale() {
    let mut l = ImageLoader::new();
    let old = l.request(&slot("a"), "one.png").unwrap();
    let new = l.request(&slot("a"), "two.png").unwrap();

    assert_eq!(l.complete(&old, Ok(png(2, 2, [255, 0, 0, 255]))), LoadOutcome::Stale);
    assert_eq!(l.status(&slot("a")), Some(LoadStatus::Pending));
    assert!(l.image_for(&slot("a")).is_none());

    assert_eq!(l.complete(&new, Ok(png(3, 1, [0, 0, 255, 255]))), LoadOutcome::Committed);
    let img = l.image_for(&slot("a")).unwrap();
    assert_eq!((img.width, img.height), (3, 1));
    assert_eq!(l.cached_images(), 1);
}

#[test]
fn decode_and_fetch_failures_mark_the_slot_failed() {
    let mut l = ImageLoader::new();
    let t = l.request(&slot("a"), "bad.png").unwrap();
    assert_eq!(l.complete(&t, Ok(b"nope".to_vec())), LoadOutcome::Failed);
    assert_eq!(l.status(&slot("a")), Some(LoadStatus::Failed));

    let fetcher = MapFetcher(HashMap::new());
    let t = l.request(&slot("b"), "missing.png").unwrap();
    assert_eq!(l.fulfill(&t, &fetcher), LoadOutcome::Failed);
    assert!(l.image_for(&slot("b")).is_none());
}

#[test]
fn cached_sources_are_shared_and_dropped_when_unreferenced() {
    let fetcher = MapFetcher(HashMap::from([("g.png".to_string(), png(1, 1, [1, 2, 3, 255]))]));
    let mut l = ImageLoader::new();
    let t = l.request(&slot("a"), "g.png").unwrap();
    assert_eq!(l.fulfill(&t, &fetcher), LoadOutcome::Committed);

    assert!(l.request(&slot("b"), "g.png").is_none());
    assert_eq!(l.status(&slot("b")), Some(LoadStatus::Ready));

    l.release(&slot("a"));
    assert_eq!(l.cached_images(), 1);
    l.release(&slot("b"));
    assert_eq!(l.cached_images(), 0);
}

#[test]
fn released_slot_tickets_are_stale_and_pending_lists_in_order() {
    let mut l = ImageLoader::new();
    let a = l.request(&slot("a"), "a.png").unwrap();
    let b = l.request(&slot("b"), "b.png").unwrap();
    assert_eq!(l.pending(), vec![a.clone(), b.clone()]);

    l.release(&slot("a"));
    assert_eq!(l.complete(&a, Ok(png(1, 1, [0, 0, 0, 255]))), LoadOutcome::Stale);
    assert_eq!(l.pending(), vec![b]);
}

#[test]
fn fs_fetcher_reads_relative_files_only() {
    let tmp = std::env::temp_dir().join(format!(
        "tryon_fs_fetcher_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(tmp.join("overlays")).unwrap();
    std::fs::write(tmp.join("overlays/x.png"), png(1, 1, [9, 9, 9, 255])).unwrap();

    let f = FsFetcher::new(&tmp);
    assert!(!f.fetch("overlays/x.png").unwrap().is_empty());
    assert!(matches!(f.fetch("overlays/none.png"), Err(TryOnError::ImageLoad { .. })));
    assert!(matches!(f.fetch("/overlays/x.png"), Err(TryOnError::Validation(_))));

    std::fs::remove_dir_all(&tmp).ok();
}
