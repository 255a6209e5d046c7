//! Shared test support: a canned-payload browser engine and payload
//! builders for both marketplaces.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::mpsc;

use crate::domain::error::{ScrapeError, ScrapeResult};
use crate::infrastructure::browser::{BrowserEngine, PageId, RequestObserver};

/// A [`BrowserEngine`] backed by canned payloads.
///
/// Pages open against a url-to-payload map; urls registered as unloadable
/// never reach load-complete (for timeout tests), and urls registered as
/// navigation failures refuse to open at all. Scripted request urls are
/// emitted to the active request observer whenever a page opens, mimicking
/// the client-side data fetches the resolver listens for.
#[derive(Default)]
pub struct StubBrowser {
    payloads: HashMap<String, String>,
    unloadable: HashSet<String>,
    navigation_failures: HashSet<String>,
    scripted_requests: Vec<String>,
    next_id: AtomicU64,
    open_urls: Mutex<HashMap<PageId, String>>,
    closed: Mutex<Vec<PageId>>,
    observer_tx: Mutex<Option<mpsc::UnboundedSender<String>>>,
}

impl StubBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, payload: &str) -> Self {
        self.payloads.insert(url.to_string(), payload.to_string());
        self
    }

    pub fn with_unloadable(mut self, url: &str) -> Self {
        self.unloadable.insert(url.to_string());
        self
    }

    pub fn with_navigation_failure(mut self, url: &str) -> Self {
        self.navigation_failures.insert(url.to_string());
        self
    }

    pub fn with_scripted_request(mut self, url: &str) -> Self {
        self.scripted_requests.push(url.to_string());
        self
    }

    pub fn closed_pages(&self) -> Vec<PageId> {
        self.closed.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserEngine for StubBrowser {
    async fn open_page(&self, url: &str) -> ScrapeResult<PageId> {
        if self.navigation_failures.contains(url) {
            return Err(ScrapeError::Navigation(format!("cannot open {url}")));
        }
        let page = PageId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.open_urls.lock().unwrap().insert(page, url.to_string());

        // Opening a page triggers its scripted client-side requests.
        if let Some(tx) = self.observer_tx.lock().unwrap().as_ref() {
            for request in &self.scripted_requests {
                let _ = tx.send(request.clone());
            }
        }
        Ok(page)
    }

    async fn wait_for_load(&self, page: PageId) -> ScrapeResult<()> {
        let url = self
            .open_urls
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .ok_or_else(|| ScrapeError::Browser(format!("unknown page {}", page.0)))?;
        if self.unloadable.contains(&url) {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn document_text(&self, page: PageId) -> ScrapeResult<String> {
        let url = self
            .open_urls
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .ok_or_else(|| ScrapeError::Browser(format!("unknown page {}", page.0)))?;
        self.payloads
            .get(&url)
            .cloned()
            .ok_or_else(|| ScrapeError::Browser(format!("no canned payload for {url}")))
    }

    async fn close_page(&self, page: PageId) -> ScrapeResult<()> {
        self.open_urls.lock().unwrap().remove(&page);
        self.closed.lock().unwrap().push(page);
        Ok(())
    }

    async fn observe_requests(&self, _patterns: &[&str]) -> ScrapeResult<RequestObserver> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.observer_tx.lock().unwrap() = Some(tx);
        Ok(RequestObserver::new(rx))
    }
}

/// Builds an Ozon API payload: one tile grid widget with the given
/// `(sku, name, price)` tiles and an optional paginator token.
pub fn ozon_page(tiles: &[(u64, &str, i64)], next_page: Option<&str>) -> String {
    let tile_values: Vec<Value> = tiles
        .iter()
        .map(|&(sku, name, price)| {
            json!({
                "sku": sku,
                "mainState": [
                    { "type": "priceV2", "priceV2": { "price": [ { "text": format!("{price} ₽") } ] } },
                    { "type": "textAtom", "id": "name", "textAtom": { "text": name } },
                ],
            })
        })
        .collect();

    let grid = serde_json::to_string(&json!({ "items": tile_values })).unwrap();
    let mut widget_states = json!({ "tileGridDesktop-1": grid });
    if let Some(token) = next_page {
        let paginator = serde_json::to_string(&json!({ "nextPage": token })).unwrap();
        widget_states["megaPaginator-1"] = Value::String(paginator);
    }

    serde_json::to_string(&json!({ "widgetStates": widget_states })).unwrap()
}

/// Builds a Wildberries data payload from `(id, name, minor-unit price)`
/// entries.
pub fn wb_page(products: &[(u64, &str, i64)]) -> String {
    let product_values: Vec<Value> = products
        .iter()
        .map(|&(id, name, price)| {
            json!({
                "id": id,
                "name": name,
                "sizes": [ { "price": { "product": price } } ],
                "reviewRating": 4.5,
                "feedbacks": 3,
            })
        })
        .collect();

    serde_json::to_string(&json!({ "products": product_values })).unwrap()
}
