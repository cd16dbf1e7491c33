//! Per-partner extraction strategies and the registry that routes to them.
//!
//! Partner identifiers come from an attribute on the aggregator's result
//! links and are free-form, so routing is an ordered fallback rather than a
//! closed match:
//!
//! 1. exact identifier,
//! 2. identifier prefix (partners that append a path or version),
//! 3. the generic partner-hosted layout, unless the partner is known to be
//!    unsupported,
//! 4. no extractor.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crawl_logging::crawl_debug;
use vacancy_core::{DispatchRoute, ExtractedFields};

use crate::page::{Element, LookupError, RenderedPage};

mod hh;
mod superjob;
mod trud;
mod yandex;

pub use hh::HeadHunterExtractor;
pub use superjob::SuperjobExtractor;
pub use trud::TrudPartnerExtractor;
pub use yandex::YandexTalentsExtractor;

pub(crate) const SALARY_NOT_SPECIFIED: &str = "з/п не указана";
pub(crate) const NOT_SPECIFIED: &str = "Не указано";

/// Reads one partner's fixed page layout. Never fails: a missing element
/// turns into that field's default.
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, page: &RenderedPage) -> ExtractedFields;
}

/// Outcome of routing a partner identifier.
#[derive(Clone, Copy)]
pub enum Dispatch<'a> {
    Specific(&'a dyn Extractor),
    Generic(&'a dyn Extractor),
    NoExtractor,
}

impl<'a> Dispatch<'a> {
    pub fn route(&self) -> DispatchRoute {
        match self {
            Dispatch::Specific(_) => DispatchRoute::Specific,
            Dispatch::Generic(_) => DispatchRoute::Generic,
            Dispatch::NoExtractor => DispatchRoute::NoExtractor,
        }
    }

    pub fn extractor_name(&self) -> Option<&'static str> {
        match self {
            Dispatch::Specific(e) | Dispatch::Generic(e) => Some(e.name()),
            Dispatch::NoExtractor => None,
        }
    }

    /// Runs the routed extractor; `NoExtractor` yields no fields.
    pub fn extract(&self, page: &RenderedPage) -> ExtractedFields {
        match self {
            Dispatch::Specific(e) | Dispatch::Generic(e) => e.extract(page),
            Dispatch::NoExtractor => ExtractedFields::default(),
        }
    }
}

pub struct ExtractionRegistry {
    exact: HashMap<String, Arc<dyn Extractor>>,
    prefixes: Vec<(String, Arc<dyn Extractor>)>,
    unsupported: HashSet<String>,
    fallback: Option<Arc<dyn Extractor>>,
}

impl ExtractionRegistry {
    /// A registry that routes everything to `NoExtractor`.
    pub fn empty() -> Self {
        Self {
            exact: HashMap::new(),
            prefixes: Vec::new(),
            unsupported: HashSet::new(),
            fallback: None,
        }
    }

    /// The partners trud.com links to today.
    pub fn with_known_partners() -> Self {
        let mut registry = Self::empty();
        registry
            .register_exact("hh.ru", Arc::new(HeadHunterExtractor))
            .register_exact("talents.yandex.ru", Arc::new(YandexTalentsExtractor))
            .register_prefix("superjob.ru", Arc::new(SuperjobExtractor))
            .mark_unsupported("employmentcenter.ru")
            .set_fallback(Arc::new(TrudPartnerExtractor));
        registry
    }

    pub fn register_exact(&mut self, partner: &str, extractor: Arc<dyn Extractor>) -> &mut Self {
        self.exact.insert(normalize_partner(partner), extractor);
        self
    }

    /// Prefixes are tried in registration order.
    pub fn register_prefix(&mut self, prefix: &str, extractor: Arc<dyn Extractor>) -> &mut Self {
        self.prefixes.push((normalize_partner(prefix), extractor));
        self
    }

    pub fn mark_unsupported(&mut self, partner: &str) -> &mut Self {
        self.unsupported.insert(normalize_partner(partner));
        self
    }

    pub fn set_fallback(&mut self, extractor: Arc<dyn Extractor>) -> &mut Self {
        self.fallback = Some(extractor);
        self
    }

    pub fn dispatch(&self, partner: &str) -> Dispatch<'_> {
        let key = normalize_partner(partner);
        if let Some(extractor) = self.exact.get(&key) {
            return Dispatch::Specific(extractor.as_ref());
        }
        if let Some((_, extractor)) = self
            .prefixes
            .iter()
            .find(|(prefix, _)| key.starts_with(prefix.as_str()))
        {
            return Dispatch::Specific(extractor.as_ref());
        }
        if self.unsupported.contains(&key) {
            return Dispatch::NoExtractor;
        }
        match &self.fallback {
            Some(extractor) => Dispatch::Generic(extractor.as_ref()),
            None => Dispatch::NoExtractor,
        }
    }
}

impl Default for ExtractionRegistry {
    fn default() -> Self {
        Self::with_known_partners()
    }
}

fn normalize_partner(partner: &str) -> String {
    partner.trim().to_ascii_lowercase()
}

/// Text of a looked-up element, or `default` when the lookup failed.
pub(crate) fn text_or(
    lookup: Result<Element<'_>, LookupError>,
    field: &str,
    default: &str,
) -> String {
    match lookup {
        Ok(element) => element.text(),
        Err(err) => {
            crawl_debug!("{}: {}; using {:?}", field, err, default);
            default.to_string()
        }
    }
}

/// Like [`text_or`] but keeps paragraph breaks.
pub(crate) fn lines_or(
    lookup: Result<Element<'_>, LookupError>,
    field: &str,
    default: &str,
) -> String {
    match lookup {
        Ok(element) => element.text_lines(),
        Err(err) => {
            crawl_debug!("{}: {}; using {:?}", field, err, default);
            default.to_string()
        }
    }
}
