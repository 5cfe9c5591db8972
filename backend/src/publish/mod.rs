//! Copy hand-maintained JSON data files into the published docs tree.
//!
//! Each file is parsed and re-serialized so that what lands in `docs/data`
//! is always valid, pretty-printed JSON. Object keys keep their authored
//! order.

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::emit::write_json;
use crate::logs::{log_error, log_success, log_warning};

/// Files copied by default
pub const DEFAULT_DATA_FILES: [&str; 4] = [
    "about.json",
    "work_experience.json",
    "skills_expertise.json",
    "key_projects.json",
];

/// What happened to each file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub copied: Vec<String>,
    pub missing: Vec<String>,
    pub failed: Vec<String>,
}

/// Copy `files` from `source_dir` to `dest_dir`.
///
/// Missing or broken files are logged and listed in the report; the others
/// are still copied.
pub fn publish_data_files(source_dir: &Path, dest_dir: &Path, files: &[&str]) -> PublishReport {
    let mut report = PublishReport::default();

    for name in files {
        let source = source_dir.join(name);
        if !source.exists() {
            log_warning(format!("{} not found in {}", name, source_dir.display()));
            report.missing.push(name.to_string());
            continue;
        }

        let parsed = fs::read_to_string(&source)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str::<Value>(&content).map_err(|e| e.to_string()));

        let result = parsed.and_then(|data| write_json(&dest_dir.join(name), &data).map_err(|e| e.to_string()));

        match result {
            Ok(()) => {
                log_success(format!("Copied {} to {}", name, dest_dir.display()));
                report.copied.push(name.to_string());
            }
            Err(e) => {
                log_error(format!("Error copying {}: {}", name, e));
                report.failed.push(name.to_string());
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_publish_mixed_files() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("data");
        let dest = dir.path().join("docs").join("data");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("about.json"), r#"{"name":"Patrice","bio":"Économiste"}"#).unwrap();
        fs::write(src.join("key_projects.json"), "{ not json").unwrap();

        let report = publish_data_files(&src, &dest, &DEFAULT_DATA_FILES);

        assert_eq!(report.copied, vec!["about.json"]);
        assert_eq!(report.failed, vec!["key_projects.json"]);
        assert_eq!(report.missing, vec!["work_experience.json", "skills_expertise.json"]);

        let copied = fs::read_to_string(dest.join("about.json")).unwrap();
        assert!(copied.contains("\n  \"bio\": \"Économiste\""));
        assert!(!dest.join("key_projects.json").exists());
    }

    #[test]
    fn test_key_order_preserved() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("data");
        let dest = dir.path().join("docs");
        fs::create_dir_all(&src).unwrap();
        fs::write(
            src.join("about.json"),
            r#"{"name":"P","bio":"x","age":1,"links":{"z":1,"a":2}}"#,
        )
        .unwrap();

        let report = publish_data_files(&src, &dest, &["about.json"]);
        assert_eq!(report.copied, vec!["about.json"]);

        let copied = fs::read_to_string(dest.join("about.json")).unwrap();
        let keys: Vec<usize> = ["\"name\"", "\"bio\"", "\"age\"", "\"links\"", "\"z\"", "\"a\""]
            .iter()
            .map(|k| copied.find(k).unwrap())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "{}", copied);
    }
}
