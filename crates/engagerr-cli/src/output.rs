//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use engagerr_domain::{
    relationship_type_label, ContentFamily, ContentRelationship, ContentSuggestion,
    GraphVisualizationData, Notification, NotificationLevel, RelationshipType,
};
use engagerr_sdk::RelationshipSnapshot;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
    Table,
};

/// Output formatter.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Whether color output is on.
    pub fn color_enabled(&self) -> bool {
        self.color_enabled
    }

    /// Format relationships output.
    pub fn format_relationships(&self, relationships: &[ContentRelationship]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(relationships)?),
            OutputFormat::Quiet => Ok(ids(relationships.iter().map(|r| r.id.as_str()))),
            OutputFormat::Table => {
                if relationships.is_empty() {
                    return Ok(self.colorize("No relationships found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Source", "Relationship", "Target", "Method", "Confidence"]);
                for r in relationships {
                    builder.push_record([
                        short_id(&r.id),
                        r.source_content_id.clone(),
                        r.relationship_type.label().to_string(),
                        r.target_content_id.clone(),
                        format!("{:?}", r.creation_method),
                        r.confidence
                            .map(|c| format!("{:.2}", c))
                            .unwrap_or_else(|| "-".to_string()),
                    ]);
                }
                Ok(styled(builder.build()))
            }
        }
    }

    /// Format a single relationship.
    pub fn format_relationship(&self, relationship: &ContentRelationship) -> Result<String> {
        self.format_relationships(std::slice::from_ref(relationship))
    }

    /// Format suggestions output.
    pub fn format_suggestions(&self, suggestions: &[ContentSuggestion]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(suggestions)?),
            OutputFormat::Quiet => Ok(ids(suggestions.iter().map(|s| s.id.as_str()))),
            OutputFormat::Table => {
                if suggestions.is_empty() {
                    return Ok(self.colorize("No pending suggestions.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Source", "Relationship", "Target", "Confidence", "Reason"]);
                for s in suggestions {
                    builder.push_record([
                        s.id.clone(),
                        s.source_content_id.clone(),
                        s.relationship_type.label().to_string(),
                        s.target_content_id.clone(),
                        format!("{:.2}", s.confidence),
                        s.reason.clone().unwrap_or_default(),
                    ]);
                }
                Ok(styled(builder.build()))
            }
        }
    }

    /// Format a content family with its metrics.
    pub fn format_family(&self, family: &ContentFamily) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(family)?),
            OutputFormat::Quiet => Ok(ids(family.nodes.iter().map(|c| c.id.as_str()))),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["", "ID", "Title", "Platform", "Type", "Views", "Engagements"]);
                for c in &family.nodes {
                    let marker = if c.id == family.root_content_id { "*" } else { "" };
                    builder.push_record([
                        marker.to_string(),
                        c.id.clone(),
                        c.title.clone(),
                        c.platform.to_string(),
                        c.content_type.to_string(),
                        c.views.to_string(),
                        c.engagements.to_string(),
                    ]);
                }

                let m = &family.metrics;
                let summary = format!(
                    "{} item(s) on {} platform(s), {} relationship(s) | views {} | engagements {} | value ${:.2}",
                    m.content_count,
                    m.platform_count,
                    family.edge_count(),
                    m.total_views,
                    m.total_engagements,
                    m.estimated_value
                );
                Ok(format!("{}\n{}", styled(builder.build()), self.colorize(&summary, "cyan")))
            }
        }
    }

    /// Format a visualization graph.
    pub fn format_graph(&self, graph: &GraphVisualizationData) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(graph)?),
            OutputFormat::Quiet => Ok(ids(graph.nodes.iter().map(|n| n.id.as_str()))),
            OutputFormat::Table => {
                let mut nodes = Builder::default();
                nodes.push_record(["Node", "Label", "Size"]);
                for n in &graph.nodes {
                    nodes.push_record([
                        n.id.clone(),
                        n.label.clone(),
                        n.size.map(|s| s.to_string()).unwrap_or_default(),
                    ]);
                }

                let mut edges = Builder::default();
                edges.push_record(["Source", "Relationship", "Target", "Weight"]);
                for e in &graph.edges {
                    edges.push_record([
                        e.source.clone(),
                        e.relationship_type
                            .map(|t| t.label().to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        e.target.clone(),
                        e.weight
                            .map(|w| format!("{:.2}", w))
                            .unwrap_or_else(|| "-".to_string()),
                    ]);
                }

                Ok(format!("{}\n{}", styled(nodes.build()), styled(edges.build())))
            }
        }
    }

    /// Format the list of relationship types.
    pub fn format_types(&self) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let types: Vec<serde_json::Value> = RelationshipType::ALL
                    .iter()
                    .map(|t| serde_json::json!({ "value": t.as_str(), "label": t.label() }))
                    .collect();
                Ok(serde_json::to_string_pretty(&types)?)
            }
            OutputFormat::Quiet => Ok(ids(RelationshipType::ALL.iter().map(|t| t.as_str()))),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Value", "Label"]);
                for t in RelationshipType::ALL {
                    builder.push_record([t.as_str(), t.label()]);
                }
                Ok(styled(builder.build()))
            }
        }
    }

    /// Format the result of a refresh.
    pub fn format_snapshot(&self, snapshot: &RelationshipSnapshot) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "relationships": snapshot.relationships,
                "family": snapshot.family,
                "suggestions": snapshot.suggestions,
            }))?),
            _ => Ok(format!(
                "{}\n{}\n{}",
                self.format_relationships(&snapshot.relationships)?,
                self.format_family(&snapshot.family)?,
                self.format_suggestions(&snapshot.suggestions)?
            )),
        }
    }

    /// Label for a raw relationship type value.
    pub fn type_label(&self, raw: &str) -> String {
        relationship_type_label(raw)
    }

    /// Format a notification.
    pub fn notification(&self, notification: &Notification) -> String {
        let text = if notification.description.is_empty() {
            notification.title.clone()
        } else {
            format!("{}: {}", notification.title, notification.description)
        };
        match notification.level {
            NotificationLevel::Success => self.success(&text),
            NotificationLevel::Info => self.info(&text),
            NotificationLevel::Error => self.error(&text),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format bulk operation result.
    pub fn bulk_result(&self, operation: &str, count: usize) -> String {
        self.success(&format!("{} {} relationship(s)", operation, count))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join("\n")
}

/// First 8 characters of an ID, for table columns
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use engagerr_domain::{Content, ContentType, FamilyMetrics, PlatformType};

    fn relationship() -> ContentRelationship {
        ContentRelationship {
            id: "0190a5b2-7c1d-7e3f-9a2b-3c4d5e6f7a8b".to_string(),
            source_content_id: "c2".to_string(),
            target_content_id: "c1".to_string(),
            relationship_type: RelationshipType::Derivative,
            creation_method: Default::default(),
            creator_id: "u1".to_string(),
            confidence: None,
            created_at: None,
        }
    }

    fn family() -> ContentFamily {
        let nodes = vec![
            Content::new("c1", "Episode 42", PlatformType::Podcast, ContentType::PodcastEpisode, "u1"),
            Content::new("c2", "Best moment", PlatformType::YouTube, ContentType::Short, "u1"),
        ];
        ContentFamily {
            root_content_id: "c1".to_string(),
            metrics: FamilyMetrics::from_nodes(&nodes),
            nodes,
            relationships: vec![relationship()],
        }
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_relationships(&[relationship()]).unwrap();
        assert!(output.contains("Derivative Work"));
        assert!(output.contains("0190a5b2"));
        assert!(!output.contains("0190a5b2-7c1d"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_relationships(&[relationship()]).unwrap();
        assert!(output.contains("\"sourceContentId\": \"c2\""));
        assert!(output.contains("\"DERIVATIVE\""));
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_relationships(&[relationship()]).unwrap();
        assert_eq!(output, "0190a5b2-7c1d-7e3f-9a2b-3c4d5e6f7a8b");
    }

    #[test]
    fn test_empty_relationships() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_relationships(&[]).unwrap();
        assert!(output.contains("No relationships found"));
    }

    #[test]
    fn test_family_table_marks_root() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_family(&family()).unwrap();
        assert!(output.contains("Episode 42"));
        assert!(output.contains("2 item(s) on 2 platform(s), 1 relationship(s)"));
    }

    #[test]
    fn test_types_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_types().unwrap();
        assert!(output.contains("REPURPOSED"));
        assert!(output.contains("Repurposed Content"));
    }

    #[test]
    fn test_notification_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let n = Notification::error("Error", "Relationship not found");
        assert_eq!(formatter.notification(&n), "✗ Error: Relationship not found");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }

    #[test]
    fn test_type_label_passthrough() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.type_label("CHILD"), "Child Content");
        assert_eq!(formatter.type_label("SEQUEL"), "SEQUEL");
    }
}
