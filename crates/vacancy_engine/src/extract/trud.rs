use vacancy_core::ExtractedFields;

use super::{lines_or, Extractor, SALARY_NOT_SPECIFIED};
use crate::page::{Element, RenderedPage};

const SALARY_ROW: usize = 4;
const SCHEDULE_ROW: usize = 5;
const DATE_ROW: usize = 1;

/// Listings hosted by trud.com itself on behalf of smaller partners: a
/// two-column key/value table plus a description block.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrudPartnerExtractor;

impl Extractor for TrudPartnerExtractor {
    fn name(&self) -> &'static str {
        "trud-partner"
    }

    fn extract(&self, page: &RenderedPage) -> ExtractedFields {
        let Ok(table) = page.find_one("tbody") else {
            return ExtractedFields::blank();
        };
        let rows = table.find_all("tr");

        ExtractedFields {
            salary: Some(
                value_cell(&rows, SALARY_ROW).unwrap_or_else(|| SALARY_NOT_SPECIFIED.to_string()),
            ),
            experience_level: Some("не требуется".to_string()),
            work_regime: Some(
                value_cell(&rows, SCHEDULE_ROW).unwrap_or_else(|| "не указано".to_string()),
            ),
            description: Some(lines_or(
                page.find_one(".desc-item__indent"),
                "description",
                "",
            )),
            key_skills: Some(String::new()),
            posting_date: Some(value_cell(&rows, DATE_ROW).unwrap_or_default()),
        }
    }
}

/// Second cell of the given row, if both exist.
fn value_cell(rows: &[Element<'_>], row: usize) -> Option<String> {
    rows.get(row)?.find_all("td").get(1).map(|cell| cell.text())
}
