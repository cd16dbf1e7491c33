use crawl_logging::{crawl_trace, crawl_warn};
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("no element matches `{selector}`")]
    NotFound { selector: String },
    #[error("invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

/// A parsed page that can be queried with CSS selectors.
pub struct RenderedPage {
    document: Html,
    url: String,
}

impl RenderedPage {
    pub fn parse(html: &str, url: impl Into<String>) -> Self {
        Self {
            document: Html::parse_document(html),
            url: url.into(),
        }
    }

    /// The url the page was served from, after redirects.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn find_one(&self, selector: &str) -> Result<Element<'_>, LookupError> {
        let sel = parse_selector(selector)?;
        let found = self.document.select(&sel).next().map(Element);
        if found.is_none() {
            crawl_trace!("`{}` not found on {}", selector, self.url);
        }
        found.ok_or_else(|| not_found(selector))
    }

    /// All matches in document order. An invalid selector matches nothing.
    pub fn find_all(&self, selector: &str) -> Vec<Element<'_>> {
        match parse_selector(selector) {
            Ok(sel) => self.document.select(&sel).map(Element).collect(),
            Err(err) => {
                crawl_warn!("{} on {}", err, self.url);
                Vec::new()
            }
        }
    }
}

/// A matched element borrowed from its page.
#[derive(Clone, Copy)]
pub struct Element<'a>(ElementRef<'a>);

impl<'a> Element<'a> {
    /// Visible text with runs of whitespace collapsed to single spaces.
    pub fn text(&self) -> String {
        let raw: String = self.0.text().collect();
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Text nodes as separate lines, for long multi-paragraph blocks.
    pub fn text_lines(&self) -> String {
        self.0
            .text()
            .map(|chunk| chunk.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    pub fn find_one(&self, selector: &str) -> Result<Element<'a>, LookupError> {
        let sel = parse_selector(selector)?;
        let found = self.0.select(&sel).next().map(Element);
        if found.is_none() {
            crawl_trace!("`{}` not found under <{}>", selector, self.0.value().name());
        }
        found.ok_or_else(|| not_found(selector))
    }

    pub fn find_all(&self, selector: &str) -> Vec<Element<'a>> {
        match parse_selector(selector) {
            Ok(sel) => self.0.select(&sel).map(Element).collect(),
            Err(err) => {
                crawl_warn!("{}", err);
                Vec::new()
            }
        }
    }
}

fn not_found(selector: &str) -> LookupError {
    LookupError::NotFound {
        selector: selector.to_string(),
    }
}

fn parse_selector(selector: &str) -> Result<Selector, LookupError> {
    Selector::parse(selector).map_err(|err| LookupError::InvalidSelector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::RenderedPage;

    const HTML: &str = r#"
        <html><body>
          <div class="card number-1"><a href="/v/1" partner="hh.ru">  Rust
             developer </a></div>
          <div class="card number-2"><a href="/v/2">Tester</a></div>
          <div class="desc"><p>First paragraph.</p><p>Second
             paragraph.</p></div>
        </body></html>
    "#;

    #[test]
    fn text_collapses_whitespace() {
        let page = RenderedPage::parse(HTML, "https://trud.com/search");
        let link = page.find_one("div.number-1 a").unwrap();
        assert_eq!(link.text(), "Rust developer");
        assert_eq!(link.attribute("partner"), Some("hh.ru"));
        assert_eq!(link.attribute("missing"), None);
    }

    #[test]
    fn text_lines_keeps_paragraphs_apart() {
        let page = RenderedPage::parse(HTML, "https://trud.com/search");
        let desc = page.find_one(".desc").unwrap();
        assert_eq!(desc.text_lines(), "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn missing_element_is_a_distinct_condition() {
        crawl_logging::initialize_for_tests();
        let page = RenderedPage::parse(HTML, "https://trud.com/search");
        let err = page.find_one(".vacancy-salary").err().unwrap();
        assert!(err.is_not_found());
        let card = page.find_one(".card").unwrap();
        assert!(card.find_one("span").err().unwrap().is_not_found());
    }

    #[test]
    fn invalid_selector_is_reported_not_panicked() {
        let page = RenderedPage::parse(HTML, "https://trud.com/search");
        let err = page.find_one("!!").err().unwrap();
        assert!(!err.is_not_found());
        assert!(page.find_all("!!").is_empty());
    }

    #[test]
    fn scoped_lookups_stay_inside_the_element() {
        let page = RenderedPage::parse(HTML, "https://trud.com/search");
        let cards = page.find_all("div[class*=number]");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].find_one("a").unwrap().text(), "Tester");
        assert!(cards[1].find_one(".desc").is_err());
    }
}
