use vacancy_core::ExtractedFields;

use super::{lines_or, text_or, Extractor, NOT_SPECIFIED, SALARY_NOT_SPECIFIED};
use crate::page::RenderedPage;

const EXPERIENCE_PREFIX: &str = "Опыт работы";

/// superjob.ru pages. Partner ids of this family carry a trailing path.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuperjobExtractor;

impl Extractor for SuperjobExtractor {
    fn name(&self) -> &'static str {
        "superjob.ru"
    }

    fn extract(&self, page: &RenderedPage) -> ExtractedFields {
        // Experience and schedule share one line: "Опыт работы от 1 года, Полный рабочий день".
        let conditions = page
            .find_one("._3AQrx + div")
            .map(|el| el.text())
            .ok()
            .filter(|text| !text.is_empty());
        let (experience_level, work_regime) = match conditions {
            Some(text) => split_conditions(&text),
            None => (NOT_SPECIFIED.to_string(), NOT_SPECIFIED.to_string()),
        };

        ExtractedFields {
            salary: Some(text_or(page.find_one(".PlM3e"), "salary", SALARY_NOT_SPECIFIED)),
            experience_level: Some(experience_level),
            work_regime: Some(work_regime),
            description: Some(lines_or(page.find_one("._2LeqZ"), "description", "")),
            key_skills: Some(String::new()),
            posting_date: Some(text_or(
                page.find_one("div._2g1F- + div > span._9fXTd"),
                "posting date",
                "",
            )),
        }
    }
}

fn split_conditions(text: &str) -> (String, String) {
    match text.split_once(", ") {
        Some((head, rest)) if head.starts_with(EXPERIENCE_PREFIX) => {
            (head.to_string(), rest.to_string())
        }
        None if text.starts_with(EXPERIENCE_PREFIX) => {
            (text.to_string(), NOT_SPECIFIED.to_string())
        }
        _ => (NOT_SPECIFIED.to_string(), text.to_string()),
    }
}
