//! Text card builder for CLI output.
//!
//! Same fields as the HTML card, formatted as aligned lines for a terminal.

use crate::render::CardDocument;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build the text card for one lookup result.
pub(crate) fn build_text_summary(doc: &CardDocument) -> TextSummary {
    let mut lines = Vec::new();

    lines.push(format!("{} (#{})", doc.title, doc.id));

    let details = [
        ("Species", doc.species.clone()),
        ("ID", doc.id.to_string()),
        ("Height", doc.height.to_string()),
        ("Weight", doc.weight.to_string()),
        ("Base Experience", doc.base_experience.clone()),
        ("Abilities", doc.abilities.clone()),
        ("Type", doc.types.clone()),
    ];
    for (label, value) in details {
        lines.push(format!("  {label:<16} {value}"));
    }

    if !doc.stats.is_empty() {
        lines.push("Stats:".to_string());
        let width = doc
            .stats
            .iter()
            .map(|s| s.name.chars().count())
            .max()
            .unwrap_or(0);
        for stat in &doc.stats {
            lines.push(format!("  {:<width$} {:>3}", stat.name, stat.value));
        }
    }

    if let Some(url) = doc.thumbnail_url.as_deref() {
        lines.push(format!("Sprite:  {url}"));
    }
    if let Some(url) = doc.artwork_url.as_deref() {
        lines.push(format!("Artwork: {url}"));
    }

    TextSummary { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::pikachu;

    #[test]
    fn lists_details_then_stats() {
        let doc = CardDocument::from_result(&pikachu());
        let summary = build_text_summary(&doc);

        assert_eq!(summary.lines[0], "Pikachu (#25)");
        assert!(summary
            .lines
            .contains(&"  Abilities        static, lightning-rod".to_string()));
        assert!(summary.lines.contains(&"  Type             electric".to_string()));

        let stats_at = summary.lines.iter().position(|l| l == "Stats:").unwrap();
        assert_eq!(summary.lines[stats_at + 1], "  hp               35");
        assert_eq!(summary.lines[stats_at + 6], "  speed            90");
    }

    #[test]
    fn omits_missing_images() {
        let mut r = pikachu();
        r.sprite_url = None;
        r.artwork_url = None;
        let summary = build_text_summary(&CardDocument::from_result(&r));
        assert!(!summary.lines.iter().any(|l| l.starts_with("Sprite")));
        assert!(!summary.lines.iter().any(|l| l.starts_with("Artwork")));
    }
}
