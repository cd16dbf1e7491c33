use chrono::NaiveDate;

/// Minimal record captured from a search-results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingStub {
    pub url: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub partner: String,
}

/// A row that has not been visited yet, as handed out by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingListing {
    pub url: String,
    pub partner: String,
}

/// Detail fields read from a partner page. Every field is independently optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedFields {
    pub salary: Option<String>,
    pub experience_level: Option<String>,
    pub work_regime: Option<String>,
    pub description: Option<String>,
    pub key_skills: Option<String>,
    pub posting_date: Option<String>,
}

impl ExtractedFields {
    /// All fields present but empty: the page was read and held nothing usable.
    pub fn blank() -> Self {
        Self {
            salary: Some(String::new()),
            experience_level: Some(String::new()),
            work_regime: Some(String::new()),
            description: Some(String::new()),
            key_skills: Some(String::new()),
            posting_date: Some(String::new()),
        }
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        [
            &self.salary,
            &self.experience_level,
            &self.work_regime,
            &self.description,
            &self.key_skills,
            &self.posting_date,
        ]
        .iter()
        .all(|field| field.is_none())
    }
}

/// Joins skill tags in document order with `", "`.
pub fn join_skills<I, S>(skills: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    Pending,
    Processed,
}

impl From<bool> for VisitState {
    fn from(visited: bool) -> Self {
        if visited {
            VisitState::Processed
        } else {
            VisitState::Pending
        }
    }
}

/// How a partner identifier was routed to an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchRoute {
    Specific,
    Generic,
    NoExtractor,
}

/// The persisted listing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub url: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub partner: String,
    pub fields: ExtractedFields,
    pub last_updated: NaiveDate,
    pub visited: bool,
}

impl Listing {
    pub fn visit_state(&self) -> VisitState {
        VisitState::from(self.visited)
    }
}
