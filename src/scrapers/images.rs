//! Resolves downloadable image URLs from the embedded page-state blob.
//!
//! Booli listing pages ship their data as a serialized object graph inside
//! a script tag. Each image appears as an `"Image:<id>"` cache entry whose
//! object carries the pixel dimensions; id, width and height are enough to
//! reconstruct the CDN cache URL.

use regex::Regex;
use std::sync::LazyLock;

const IMAGE_CDN: &str = "https://bcdn.se/images/cache";

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""Image:(\d+)":\{[^{}]*?"width":(\d+)[^{}]*?"height":(\d+)"#).unwrap()
});

/// Scans `blob` for image entries and returns their cache URLs in blob
/// order. Duplicates are kept; no matches yields an empty vector.
pub fn resolve_image_urls(blob: &str) -> Vec<String> {
    IMAGE_RE
        .captures_iter(blob)
        .map(|caps| format!("{IMAGE_CDN}/{}_{}x{}.jpg", &caps[1], &caps[2], &caps[3]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_entries_in_blob_order() {
        let blob = concat!(
            r#"{"Listing:1":{"address":"Götgatan 120"},"#,
            r#""Image:5077336":{"__typename":"Image","id":5077336,"width":1024,"height":768},"#,
            r#""Image:5077337":{"__typename":"Image","id":5077337,"width":800,"height":600}}"#,
        );
        assert_eq!(
            resolve_image_urls(blob),
            vec![
                "https://bcdn.se/images/cache/5077336_1024x768.jpg",
                "https://bcdn.se/images/cache/5077337_800x600.jpg",
            ]
        );
    }

    #[test]
    fn keeps_duplicates() {
        let entry = r#""Image:9":{"width":10,"height":20}"#;
        let blob = format!("{entry},{entry}");
        assert_eq!(resolve_image_urls(&blob).len(), 2);
    }

    #[test]
    fn no_entries_is_empty_not_an_error() {
        assert!(resolve_image_urls(r#"{"Listing:1":{}}"#).is_empty());
    }
}
