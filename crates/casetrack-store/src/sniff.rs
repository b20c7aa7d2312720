//! Content-sniffing contract for import staging.
//!
//! The core never parses CSV/JSON/Markdown; the surrounding layer decodes
//! records itself. What it asks of the core is a cheap guess at the file's
//! format and the entity kind / dataset scope it resembles, so the import
//! dialog can preselect sensibly. Misses are harmless; the user confirms
//! before anything is written.

use casetrack_types::{DataScope, EntityKind};
use serde::{Deserialize, Serialize};

/// Recognized import formats. A closed set; anything else is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SniffFormat {
    Csv,
    Json,
    Markdown,
    Unknown,
}

/// What the sniffer inferred from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SniffReport {
    pub format: SniffFormat,
    /// Entity kind the content most resembles, if any.
    pub entity: Option<EntityKind>,
    /// Dataset scope hinted by the content, if any.
    pub scope: Option<DataScope>,
}

/// Format/entity/scope inference over already-decoded bytes.
pub trait ContentSniffer: Send + Sync {
    fn sniff(&self, file_name: &str, bytes: &[u8]) -> SniffReport;
}

/// Reference sniffer: extension first, then leading-byte shape, then a
/// keyword scan over the head of the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSniffer;

impl HeuristicSniffer {
    /// How much of the file the keyword scan looks at.
    const HEAD: usize = 512;

    fn format_of(file_name: &str, head: &str) -> SniffFormat {
        let ext = file_name
            .rsplit('.')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => return SniffFormat::Csv,
            "json" => return SniffFormat::Json,
            "md" | "markdown" => return SniffFormat::Markdown,
            _ => {}
        }
        let trimmed = head.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            SniffFormat::Json
        } else if trimmed.starts_with('#') || trimmed.starts_with('|') {
            SniffFormat::Markdown
        } else if head.lines().next().is_some_and(|line| line.contains(',')) {
            SniffFormat::Csv
        } else {
            SniffFormat::Unknown
        }
    }

    fn entity_of(head: &str) -> Option<EntityKind> {
        // Dataset markers first: dataset exports mention their scope value,
        // which would otherwise read as a scenario/run marker.
        if head.contains("scope") || (head.contains("label") && head.contains("value")) {
            Some(EntityKind::DataSet)
        } else if head.contains("scenario") {
            Some(EntityKind::Scenario)
        } else if head.contains("environment") || head.contains("build_version") {
            Some(EntityKind::Run)
        } else if head.contains("steps")
            || head.contains("preconditions")
            || head.contains("expected")
        {
            Some(EntityKind::Case)
        } else {
            None
        }
    }

    fn scope_of(head: &str) -> Option<DataScope> {
        // Only meaningful for dataset-shaped content.
        for scope in [
            DataScope::Common,
            DataScope::Case,
            DataScope::Scenario,
            DataScope::Run,
        ] {
            if head.contains(&format!("\"scope\": \"{}\"", scope.as_str()))
                || head.contains(&format!("scope,{}", scope.as_str()))
                || head.contains(&format!("scope: {}", scope.as_str()))
            {
                return Some(scope);
            }
        }
        None
    }
}

impl ContentSniffer for HeuristicSniffer {
    fn sniff(&self, file_name: &str, bytes: &[u8]) -> SniffReport {
        let head_bytes = &bytes[..bytes.len().min(Self::HEAD)];
        let head = String::from_utf8_lossy(head_bytes).to_ascii_lowercase();
        let format = Self::format_of(file_name, &head);
        let entity = Self::entity_of(&head);
        let scope = Self::scope_of(&head);
        SniffReport {
            format,
            entity,
            scope,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sniff(name: &str, content: &str) -> SniffReport {
        HeuristicSniffer.sniff(name, content.as_bytes())
    }

    #[test]
    fn test_extension_wins() {
        assert_eq!(sniff("cases.csv", "{\"not\": \"csv\"}").format, SniffFormat::Csv);
        assert_eq!(sniff("cases.json", "a,b,c").format, SniffFormat::Json);
        assert_eq!(sniff("notes.md", "plain").format, SniffFormat::Markdown);
    }

    #[test]
    fn test_shape_fallback() {
        assert_eq!(sniff("dump", "  {\"title\": 1}").format, SniffFormat::Json);
        assert_eq!(sniff("dump", "# Heading").format, SniffFormat::Markdown);
        assert_eq!(sniff("dump", "title,priority\nx,high").format, SniffFormat::Csv);
        assert_eq!(sniff("dump", "nothing here").format, SniffFormat::Unknown);
    }

    #[test]
    fn test_entity_inference() {
        let report = sniff("x.csv", "title,preconditions,steps\n");
        assert_eq!(report.entity, Some(EntityKind::Case));
        let report = sniff("x.json", "[{\"scenario\": \"smoke\"}]");
        assert_eq!(report.entity, Some(EntityKind::Scenario));
        let report = sniff("x.csv", "name,environment,build_version\n");
        assert_eq!(report.entity, Some(EntityKind::Run));
    }

    #[test]
    fn test_scope_inference() {
        let report = sniff("data.json", "{\"scope\": \"scenario\", \"label\": 1, \"value\": 2}");
        assert_eq!(report.entity, Some(EntityKind::DataSet));
        assert_eq!(report.scope, Some(DataScope::Scenario));
        assert_eq!(sniff("data.csv", "label,value\n").scope, None);
    }
}
