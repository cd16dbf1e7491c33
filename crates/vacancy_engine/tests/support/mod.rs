#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use vacancy_engine::{
    CrawlEvent, FailureKind, FetchError, FetchedDocument, PageFetcher, ProgressSink,
};

/// Serves canned pages from memory and records every url it was asked for.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, Result<String, FailureKind>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(html.to_string()));
        self
    }

    pub fn failing(mut self, url: &str, kind: FailureKind) -> Self {
        self.pages.insert(url.to_string(), Err(kind));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|requested| requested.as_str() == url)
            .count()
    }
}

#[async_trait::async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(html)) => Ok(FetchedDocument::from_html(url, html.as_str())),
            Some(Err(kind)) => Err(FetchError::new(kind.clone(), "scripted failure")),
            None => Err(FetchError::new(FailureKind::HttpStatus(404), "not scripted")),
        }
    }
}

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<CrawlEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<CrawlEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: CrawlEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// A results page with one container per `(href, partner, title)`.
pub fn results_page(entries: &[(&str, &str, &str)]) -> String {
    let mut html = String::from("<html><body><div class=\"results\">");
    for (href, partner, title) in entries {
        html.push_str(&format!(
            "<div class=\"item number-{title}\">\
               <a href=\"{href}\" partner=\"{partner}\">{title}</a>\
               <span class=\"institution\">ООО Ромашка</span>\
               <span class=\"geo-location\">Новосибирск, Ленина 1</span>\
             </div>"
        ));
    }
    html.push_str("</div></body></html>");
    html
}
