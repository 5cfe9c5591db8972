//! FAQ table to JSON conversion for the site chatbot.
//!
//! Reads `Question`, `Keywords`, `Answer` and optional `Category` columns
//! (header case is ignored) and writes a list of [`FaqEntry`].

use std::path::Path;

use crate::emit::save_json_file;
use crate::logs::{log_info, log_success, log_warning};
use crate::models::FaqEntry;
use crate::parser::{parse_csv_file_auto, Row, Table};
use crate::validation::DocumentKind;

pub const DEFAULT_CATEGORY: &str = "General";

/// Convert a parsed FAQ table.
///
/// `id` is the 1-based row position; rows without a question are skipped
/// but keep their position.
pub fn convert_faq_table(table: &Table) -> Vec<FaqEntry> {
    let question_col = table.find_column("Question");
    let keywords_col = table.find_column("Keywords");
    let answer_col = table.find_column("Answer");
    let category_col = table.find_column("Category");

    table
        .rows()
        .enumerate()
        .filter_map(|(idx, row)| {
            let question = cell(&row, question_col);
            if question.is_empty() {
                return None;
            }

            let category = cell(&row, category_col);
            Some(FaqEntry {
                id: idx + 1,
                question,
                keywords: split_keywords(&cell(&row, keywords_col)),
                answer: cell(&row, answer_col),
                category: if category.is_empty() {
                    DEFAULT_CATEGORY.to_string()
                } else {
                    category
                },
            })
        })
        .collect()
}

fn cell(row: &Row<'_>, column: Option<&str>) -> String {
    column.map(|c| row.get(c)).unwrap_or("").to_string()
}

/// Comma separated keywords, trimmed, blanks dropped.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Convert `input` (CSV) into `output` (JSON).
///
/// Returns the number of entries written, or `None` when nothing was written.
pub fn convert_faq(input: &Path, output: &Path) -> Option<usize> {
    if !input.exists() {
        let xlsx = input.with_extension("xlsx");
        if xlsx.exists() {
            log_warning(format!(
                "Found {} but Excel input is not supported; export it as {}",
                xlsx.display(),
                input.display()
            ));
        } else {
            log_info(format!("No FAQ data file at {}, skipping", input.display()));
        }
        return None;
    }

    let table = match parse_csv_file_auto(input) {
        Ok(t) => t,
        Err(e) => {
            log_warning(format!("Error converting FAQ data: {}", e));
            return None;
        }
    };

    log_info(format!("Loaded FAQ data from {}", input.display()));
    let entries = convert_faq_table(&table);

    if save_json_file(output, DocumentKind::Faq, &entries) {
        log_success(format!("Converted {} FAQ entries to JSON", entries.len()));
        Some(entries.len())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn test_convert_rows() {
        let csv = "Question,Keywords,Answer,Category\n\
                   What is FAOSTAT?,\"fao, data, ,statistics\",A database.,Data\n\
                   Who are you?,about,An economist.,\n";
        let table = parse_str(csv, ',', "utf-8").unwrap();
        let entries = convert_faq_table(&table);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[0].keywords, vec!["fao", "data", "statistics"]);
        assert_eq!(entries[0].category, "Data");
        assert_eq!(entries[1].category, "General");
        assert_eq!(entries[1].answer, "An economist.");
    }

    #[test]
    fn test_lowercase_headers_and_missing_category_column() {
        let table = parse_str("question,keywords,answer\nHi?,greeting,Hello\n", ',', "utf-8").unwrap();
        let entries = convert_faq_table(&table);

        assert_eq!(entries[0].question, "Hi?");
        assert_eq!(entries[0].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_blank_question_skipped_but_ids_stable() {
        let table = parse_str("Question,Answer\n,orphan\nSecond?,yes\n", ',', "utf-8").unwrap();
        let entries = convert_faq_table(&table);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, 2);
    }

    #[test]
    fn test_quoted_text_kept_verbatim() {
        let csv = "Question,Keywords,Answer\n\"\"\"Hi\"\" or hello?\",greeting,\"Say \"\"hello\"\"\"\n";
        let table = parse_str(csv, ',', "utf-8").unwrap();
        let entries = convert_faq_table(&table);

        assert_eq!(entries[0].question, "\"Hi\" or hello?");
        assert_eq!(entries[0].answer, "Say \"hello\"");
    }

    #[test]
    fn test_split_keywords() {
        assert_eq!(split_keywords(""), Vec::<String>::new());
        assert_eq!(split_keywords(" a ,b,, c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_convert_faq_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("faq.csv");
        let output = dir.path().join("docs").join("data").join("faq.json");
        std::fs::write(&input, "Question,Keywords,Answer\nWhy?,why,Because.\n").unwrap();

        assert_eq!(convert_faq(&input, &output), Some(1));
        let written: Vec<FaqEntry> =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written[0].question, "Why?");
    }

    #[test]
    fn test_missing_input_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("faq.json");

        assert_eq!(convert_faq(&dir.path().join("faq.csv"), &output), None);
        assert!(!output.exists());
    }
}
