use vacancy_core::ExtractedFields;

use super::{lines_or, Extractor, NOT_SPECIFIED, SALARY_NOT_SPECIFIED};
use crate::page::RenderedPage;

/// talents.yandex.ru pages. They publish neither salary, experience nor a date.
#[derive(Debug, Default, Clone, Copy)]
pub struct YandexTalentsExtractor;

impl Extractor for YandexTalentsExtractor {
    fn name(&self) -> &'static str {
        "talents.yandex.ru"
    }

    fn extract(&self, page: &RenderedPage) -> ExtractedFields {
        let tag = |selector: &str| {
            page.find_one(selector)
                .map(|el| el.text())
                .ok()
                .filter(|text| !text.is_empty())
        };
        let work_regime = match (tag(".tag_icon_employment"), tag(".tag_icon_schedule")) {
            (Some(employment), Some(schedule)) => format!("{employment}, {schedule} график"),
            (Some(employment), None) => employment,
            (None, Some(schedule)) => format!("{schedule} график"),
            (None, None) => NOT_SPECIFIED.to_string(),
        };

        ExtractedFields {
            salary: Some(SALARY_NOT_SPECIFIED.to_string()),
            experience_level: Some(NOT_SPECIFIED.to_string()),
            work_regime: Some(work_regime),
            description: Some(lines_or(
                page.find_one(".vacancy-description"),
                "description",
                "",
            )),
            key_skills: Some(String::new()),
            posting_date: Some(String::new()),
        }
    }
}
