use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid search base url {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("page numbers start at 1")]
    InvalidPage,
}

/// Search parameters for the aggregator's results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub base_url: String,
    pub company: String,
    pub show: String,
    pub query: String,
    pub city: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            base_url: "https://trud.com/search/search.html".to_string(),
            company: "0".to_string(),
            show: "jobs".to_string(),
            query: "Разработчик стажер".to_string(),
            city: "Новосибирск".to_string(),
        }
    }
}

impl SearchQuery {
    /// Builds the results-page url. Page 1 carries no `page` parameter.
    pub fn results_url(&self, page: u32) -> Result<Url, QueryError> {
        if page == 0 {
            return Err(QueryError::InvalidPage);
        }
        let mut url = Url::parse(self.base_url.trim()).map_err(|err| QueryError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: err.to_string(),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("company", &self.company)
                .append_pair("show", &self.show)
                .append_pair("query", self.query.trim())
                .append_pair("city", self.city.trim());
            if page > 1 {
                pairs.append_pair("page", &page.to_string());
            }
        }
        Ok(url)
    }
}
