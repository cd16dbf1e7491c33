use vacancy_core::{join_skills, ExtractedFields};

use super::{lines_or, text_or, Extractor, NOT_SPECIFIED, SALARY_NOT_SPECIFIED};
use crate::page::RenderedPage;

/// hh.ru vacancy pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadHunterExtractor;

impl Extractor for HeadHunterExtractor {
    fn name(&self) -> &'static str {
        "hh.ru"
    }

    fn extract(&self, page: &RenderedPage) -> ExtractedFields {
        let skills = page
            .find_all("[data-qa=skills-element]")
            .iter()
            .map(|tag| tag.text())
            .collect::<Vec<_>>();

        ExtractedFields {
            salary: Some(text_or(
                page.find_one(".vacancy-salary"),
                "salary",
                SALARY_NOT_SPECIFIED,
            )),
            experience_level: Some(text_or(
                page.find_one("[data-qa=vacancy-experience]"),
                "experience",
                NOT_SPECIFIED,
            )),
            work_regime: Some(text_or(
                page.find_one("[data-qa=vacancy-view-employment-mode]"),
                "work regime",
                NOT_SPECIFIED,
            )),
            description: Some(lines_or(
                page.find_one("div[data-qa=vacancy-description]"),
                "description",
                "",
            )),
            key_skills: Some(join_skills(skills)),
            posting_date: Some(text_or(
                page.find_one(".vacancy-creation-time"),
                "posting date",
                "",
            )),
        }
    }
}
