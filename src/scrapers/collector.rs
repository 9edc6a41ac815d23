//! Generic "fetch a URL and dispatch matching fragments" mechanism.
//!
//! Handlers are registered per CSS selector and receive every matching
//! element in document order, together with the record being assembled.
//! The single network fetch happens up front; dispatch itself is pure, so
//! a test can drive handlers with a stub [`Fetcher`] and synthetic HTML.

use crate::fetch::{FetchError, Fetcher};
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid selector {selector:?}: {message}")]
pub struct SelectorError {
    selector: String,
    message: String,
}

/// A piece of page text matched by a registered selector.
pub struct PageFragment<'a> {
    element: ElementRef<'a>,
}

impl PageFragment<'_> {
    /// Concatenated text content of the matched element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Text content of the first child matching `selector`, or an empty
    /// string when nothing matches.
    pub fn child_text(&self, selector: &str) -> String {
        let Ok(sel) = Selector::parse(selector) else {
            return String::new();
        };
        self.element
            .select(&sel)
            .next()
            .map(|e| e.text().collect())
            .unwrap_or_default()
    }
}

type Handler<T> = Box<dyn Fn(&PageFragment<'_>, &mut T) + Send + Sync>;

/// Selector-dispatch collector, generic over the record being assembled.
pub struct Collector<T> {
    fetcher: Arc<dyn Fetcher>,
    handlers: Vec<(Selector, Handler<T>)>,
    on_request: Option<Box<dyn Fn(&str) + Send + Sync>>,
    on_scraped: Option<Box<dyn Fn(&T) + Send + Sync>>,
    on_error: Option<Box<dyn Fn(&str, &FetchError) + Send + Sync>>,
}

impl<T> Collector<T> {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            handlers: Vec::new(),
            on_request: None,
            on_scraped: None,
            on_error: None,
        }
    }

    /// Registers `handler` for every element matching `selector`.
    pub fn on_html(
        &mut self,
        selector: &str,
        handler: impl Fn(&PageFragment<'_>, &mut T) + Send + Sync + 'static,
    ) -> Result<(), SelectorError> {
        let sel = Selector::parse(selector).map_err(|e| SelectorError {
            selector: selector.to_string(),
            message: e.to_string(),
        })?;
        self.handlers.push((sel, Box::new(handler)));
        Ok(())
    }

    /// Hook invoked just before the page fetch.
    pub fn on_request(&mut self, hook: impl Fn(&str) + Send + Sync + 'static) {
        self.on_request = Some(Box::new(hook));
    }

    /// Hook invoked after all handlers have run for a page.
    pub fn on_scraped(&mut self, hook: impl Fn(&T) + Send + Sync + 'static) {
        self.on_scraped = Some(Box::new(hook));
    }

    /// Hook invoked when the page fetch itself fails.
    pub fn on_error(&mut self, hook: impl Fn(&str, &FetchError) + Send + Sync + 'static) {
        self.on_error = Some(Box::new(hook));
    }

    /// Fetches `url` and runs every registered handler against every
    /// matching element, mutating `record` in place.
    pub async fn visit(&self, url: &str, record: &mut T) -> Result<(), FetchError> {
        if let Some(hook) = &self.on_request {
            hook(url);
        }

        let body = match self.fetcher.get_text(url).await {
            Ok(body) => body,
            Err(e) => {
                if let Some(hook) = &self.on_error {
                    hook(url, &e);
                }
                return Err(e);
            }
        };

        let document = Html::parse_document(&body);
        for (selector, handler) in &self.handlers {
            for element in document.select(selector) {
                handler(&PageFragment { element }, record);
            }
        }

        if let Some(hook) = &self.on_scraped {
            hook(record);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[tokio::test]
    async fn dispatches_matches_in_document_order() {
        let html = r#"<ul><li>first</li><li>second</li></ul><p>ignored</p>"#;
        let fetcher = Arc::new(StubFetcher(html.to_string()));

        let mut collector: Collector<Vec<String>> = Collector::new(fetcher);
        collector
            .on_html("li", |fragment, seen| seen.push(fragment.text()))
            .unwrap();

        let mut seen = Vec::new();
        collector.visit("http://unused", &mut seen).await.unwrap();
        assert_eq!(seen, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn child_text_reads_nested_selector() {
        let html = r#"<div class="row"><span class="k">Avgift</span><span class="v">3 449 kr</span></div>"#;
        let fetcher = Arc::new(StubFetcher(html.to_string()));

        let mut collector: Collector<Vec<(String, String)>> = Collector::new(fetcher);
        collector
            .on_html("div.row", |fragment, rows| {
                rows.push((fragment.child_text("span.k"), fragment.child_text("span.v")));
            })
            .unwrap();

        let mut rows = Vec::new();
        collector.visit("http://unused", &mut rows).await.unwrap();
        assert_eq!(rows, vec![("Avgift".to_string(), "3 449 kr".to_string())]);
    }

    #[test]
    fn rejects_invalid_selector() {
        let fetcher = Arc::new(StubFetcher(String::new()));
        let mut collector: Collector<()> = Collector::new(fetcher);
        assert!(collector.on_html("li[", |_, _| {}).is_err());
    }
}
