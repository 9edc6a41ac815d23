//! Booli listing-page wiring: which selectors feed which field parsers.
//!
//! The class names are the ones the site serves today; there is no
//! resilience to markup changes beyond these known fragments. A parser
//! failure on an optional field is logged and the field keeps its zero
//! default.

use crate::fetch::Fetcher;
use crate::models::Apartment;
use crate::parsers;
use crate::scrapers::collector::{Collector, SelectorError};
use crate::scrapers::images::resolve_image_urls;
use std::sync::Arc;
use tracing::{info, warn};

const SOFT_HYPHEN: char = '\u{00AD}';

/// Builds a collector that assembles one [`Apartment`] from a Booli
/// listing page.
pub fn listing_collector(
    fetcher: Arc<dyn Fetcher>,
) -> Result<Collector<Apartment>, SelectorError> {
    let mut c = Collector::new(fetcher);

    // Address.
    c.on_html("h1.lzFZY._10w08", |fragment, apt: &mut Apartment| {
        apt.address = fragment.text().replace(SOFT_HYPHEN, "");
    })?;

    // Price.
    c.on_html("h2.lzFZY._10w08", |fragment, apt| {
        match parsers::parse_price(&fragment.text()) {
            Ok(price) => apt.price = price,
            Err(e) => warn!("parse price: {e}"),
        }
    })?;

    // Area and rooms share one fragment.
    c.on_html(
        "div._2epd7._3XAuT._10w08 div._36W0F h4._1544W._10w08",
        |fragment, apt| {
            let text = fragment.text();
            match parsers::parse_area(&text) {
                Ok(area) => apt.area = area,
                Err(e) => warn!("parse area: {e}"),
            }
            match parsers::parse_rooms(&text) {
                Ok(rooms) => apt.rooms = rooms,
                Err(e) => warn!("parse rooms: {e}"),
            }
        },
    )?;

    // Booli's own valuation.
    c.on_html("h2._1g-8A", |fragment, apt| {
        match parsers::parse_price(&fragment.text()) {
            Ok(value) => apt.estimated_value = value,
            Err(e) => warn!("parse estimated value: {e}"),
        }
    })?;

    // Labelled detail rows: monthly fee and floor.
    c.on_html("div.DfWRI._1Pdm1._2zXIc.sVQc-", |fragment, apt| {
        let value = fragment.child_text("div._18w8g");
        match fragment.child_text("div._2soQI").as_str() {
            "Avgift" => match parsers::parse_price(&value) {
                Ok(fee) => apt.fee = fee,
                Err(e) => warn!("parse monthly fee: {e}"),
            },
            "Våning" => match parsers::parse_floor(&value) {
                Ok(floor) => apt.floor = floor,
                Err(e) => warn!("parse floor: {e}"),
            },
            _ => {}
        }
    })?;

    // Embedded page state carries the image entries.
    c.on_html("script#__NEXT_DATA__", |fragment, apt| {
        apt.image_urls = resolve_image_urls(&fragment.text());
    })?;

    c.on_request(|url| info!("Scraping {url}..."));
    c.on_scraped(|apt: &Apartment| info!("Done. {apt:?}"));
    c.on_error(|url, e| warn!("fetch {url}: {e}"));

    Ok(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use async_trait::async_trait;

    struct StubFetcher(String);

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn get_text(&self, _url: &str) -> Result<String, FetchError> {
            Ok(self.0.clone())
        }

        async fn get_bytes(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            Ok(self.0.clone().into_bytes())
        }
    }

    fn listing_page() -> String {
        concat!(
            r#"<html><body>"#,
            // Soft hyphen inside the address must be stripped.
            "<h1 class=\"lzFZY _10w08\">G\u{00AD}ötgatan 120</h1>",
            r#"<h2 class="lzFZY _10w08">4 000 000 kr</h2>"#,
            r#"<div class="_2epd7 _3XAuT _10w08"><div class="_36W0F">"#,
            "<h4 class=\"_1544W _10w08\">75 m² 3½ rum</h4>",
            r#"</div></div>"#,
            r#"<h2 class="_1g-8A">4 150 000 kr</h2>"#,
            r#"<div class="DfWRI _1Pdm1 _2zXIc sVQc-">"#,
            r#"<div class="_2soQI">Avgift</div><div class="_18w8g">3 449 kr/mån</div></div>"#,
            r#"<div class="DfWRI _1Pdm1 _2zXIc sVQc-">"#,
            "<div class=\"_2soQI\">Våning</div><div class=\"_18w8g\">2½ tr</div></div>",
            r#"<script id="__NEXT_DATA__" type="application/json">"#,
            r#"{"Image:11":{"width":1024,"height":768},"Image:12":{"width":800,"height":600}}"#,
            r#"</script>"#,
            r#"</body></html>"#,
        )
        .to_string()
    }

    #[tokio::test]
    async fn assembles_full_record_from_known_fragments() {
        let collector = listing_collector(Arc::new(StubFetcher(listing_page()))).unwrap();

        let mut apt = Apartment::new(5077336);
        collector
            .visit("https://www.booli.se/annons/5077336", &mut apt)
            .await
            .unwrap();

        assert_eq!(apt.address, "Götgatan 120");
        assert_eq!(apt.price, 4_000_000);
        assert_eq!(apt.area, 75);
        assert_eq!(apt.rooms, 3.5);
        assert_eq!(apt.estimated_value, 4_150_000);
        assert_eq!(apt.fee, 3449);
        assert_eq!(apt.floor, 2.5);
        assert_eq!(
            apt.image_urls,
            vec![
                "https://bcdn.se/images/cache/11_1024x768.jpg",
                "https://bcdn.se/images/cache/12_800x600.jpg",
            ]
        );
    }

    #[tokio::test]
    async fn missing_optional_fragments_keep_zero_defaults() {
        let page = r#"<html><body><h1 class="lzFZY _10w08">Ringvägen 11A</h1></body></html>"#;
        let collector = listing_collector(Arc::new(StubFetcher(page.to_string()))).unwrap();

        let mut apt = Apartment::new(1);
        collector.visit("a/b/1", &mut apt).await.unwrap();

        assert_eq!(apt.address, "Ringvägen 11A");
        assert_eq!(apt.price, 0);
        assert_eq!(apt.area, 0);
        assert_eq!(apt.rooms, 0.0);
        assert_eq!(apt.floor, 0.0);
        assert_eq!(apt.fee, 0);
        assert_eq!(apt.estimated_value, 0);
        assert!(apt.image_urls.is_empty());
    }
}
