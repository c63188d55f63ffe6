//! Card rendering.
//!
//! `CardDocument` is the display model built from a lookup result; the HTML
//! card is rendered from it with Tera. Nothing here touches a display surface.

use crate::model::LookupResult;
use crate::normalize::to_title_case;
use anyhow::{Context, Result};
use serde::Serialize;
use tera::Tera;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatRow {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardDocument {
    /// Raw API name, used as image alt text.
    pub name: String,
    pub title: String,
    pub species: String,
    pub id: u32,
    pub height: u32,
    pub weight: u32,
    pub base_experience: String,
    pub abilities: String,
    pub types: String,
    pub stats: Vec<StatRow>,
    pub thumbnail_url: Option<String>,
    pub artwork_url: Option<String>,
}

impl CardDocument {
    pub fn from_result(r: &LookupResult) -> Self {
        let title = to_title_case(&r.name);
        Self {
            name: r.name.clone(),
            species: title.clone(),
            title,
            id: r.id,
            height: r.height,
            weight: r.weight,
            base_experience: r
                .base_experience
                .map(|xp| xp.to_string())
                .unwrap_or_else(|| "unknown".into()),
            abilities: r.abilities.join(", "),
            types: r.types.join(", "),
            stats: r
                .stats
                .iter()
                .map(|s| StatRow {
                    name: s.name.clone(),
                    value: s.value,
                })
                .collect(),
            thumbnail_url: r.sprite_url.clone(),
            artwork_url: r.artwork_url.clone(),
        }
    }
}

const CARD_TEMPLATE: &str = r#"{% set cell = "padding: 8px; border: 5px solid #ddd;" -%}
<div class="pokemon-backdrop" style="{% if artwork_url %}background-image: url('{{ artwork_url }}'); {% endif %}background-size: cover; background-position: center;">
  <div class="card" style="background: rgba(255, 255, 255, 0.9); max-width: 100%; margin: 20px; padding: 20px; border-radius: 10px; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.1); text-align: center;">
    {%- if thumbnail_url %}
    <div>
      <img src="{{ thumbnail_url }}" alt="{{ name }}" style="background-color: white; border-radius: 50%; width: 150px; height: 150px; padding: 5px; border: solid 2px #ddd;">
    </div>
    {%- endif %}
    <h1 style="margin-top: 10px; font-family: Arial, sans-serif; color: #333;">{{ title }}</h1>
    <h2 style="margin-top: 20px; font-family: Arial, sans-serif; color: #555;">Details</h2>
    <table style="margin: 20px auto; border-collapse: collapse; font-family: Arial, sans-serif; color: #555;">
      <tr><td style="{{ cell }}">Species</td><td style="{{ cell }}">{{ species }}</td></tr>
      <tr><td style="{{ cell }}">ID</td><td style="{{ cell }}">{{ id }}</td></tr>
      <tr><td style="{{ cell }}">Height</td><td style="{{ cell }}">{{ height }}</td></tr>
      <tr><td style="{{ cell }}">Weight</td><td style="{{ cell }}">{{ weight }}</td></tr>
      <tr><td style="{{ cell }}">Base Experience</td><td style="{{ cell }}">{{ base_experience }}</td></tr>
      <tr><td style="{{ cell }}">Abilities</td><td style="{{ cell }}">{{ abilities }}</td></tr>
      <tr><td style="{{ cell }}">Type</td><td style="{{ cell }}">{{ types }}</td></tr>
    </table>
    <h2 style="margin-top: 20px; font-family: Arial, sans-serif; color: #555;">Stats</h2>
    <table style="margin: 20px auto; border-collapse: collapse; width: 80%; font-family: Arial, sans-serif; color: #555;">
      {%- for stat in stats %}
      <tr><td style="{{ cell }}">{{ stat.name }}</td><td style="{{ cell }}">{{ stat.value }}</td></tr>
      {%- endfor %}
    </table>
  </div>
</div>
"#;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{ title }} | Pokédex</title>
</head>
<body>
{{ card | safe }}
</body>
</html>
"#;

/// Holds the compiled card templates.
pub struct CardRenderer {
    tera: Tera,
}

impl CardRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        // `.html` names keep Tera's autoescaping on.
        tera.add_raw_templates(vec![
            ("card.html", CARD_TEMPLATE),
            ("page.html", PAGE_TEMPLATE),
        ])
        .context("compile card templates")?;
        Ok(Self { tera })
    }

    /// The card fragment alone.
    pub fn render_card(&self, doc: &CardDocument) -> Result<String> {
        self.render("card.html", doc)
    }

    /// A standalone HTML page wrapping the card.
    pub fn render_page(&self, doc: &CardDocument) -> Result<String> {
        let card = self.render_card(doc)?;
        let mut ctx = tera::Context::new();
        ctx.insert("title", &doc.title);
        ctx.insert("card", &card);
        self.tera
            .render("page.html", &ctx)
            .context("render page.html")
    }

    fn render(&self, template: &str, doc: &CardDocument) -> Result<String> {
        let ctx = tera::Context::from_serialize(doc).context("build card context")?;
        self.tera
            .render(template, &ctx)
            .with_context(|| format!("render {template}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::pikachu;

    /// Text of the value cell next to the `label` cell.
    fn field<'a>(html: &'a str, label: &str) -> &'a str {
        let start = html
            .find(&format!(">{label}</td>"))
            .unwrap_or_else(|| panic!("no {label} row"));
        let rest = &html[start + label.len() + 6..];
        let cell = &rest[rest.find("<td").unwrap()..];
        let open = cell.find('>').unwrap() + 1;
        let close = cell.find("</td>").unwrap();
        &cell[open..close]
    }

    #[test]
    fn document_uses_title_case_name_for_title_and_species() {
        let doc = CardDocument::from_result(&pikachu());
        assert_eq!(doc.title, "Pikachu");
        assert_eq!(doc.species, "Pikachu");
        assert_eq!(doc.name, "pikachu");
        assert_eq!(doc.stats.len(), 6);
        assert_eq!(doc.base_experience, "112");
    }

    #[test]
    fn abilities_and_types_are_comma_joined() {
        let doc = CardDocument::from_result(&pikachu());
        assert_eq!(doc.abilities, "static, lightning-rod");
        assert_eq!(doc.types, "electric");

        let html = CardRenderer::new().unwrap().render_card(&doc).unwrap();
        assert_eq!(field(&html, "Abilities").matches(',').count(), 1);
        assert_eq!(field(&html, "Type").matches(',').count(), 0);
        assert_eq!(field(&html, "Species"), "Pikachu");
        assert_eq!(field(&html, "ID"), "25");
    }

    #[test]
    fn one_row_per_stat() {
        let doc = CardDocument::from_result(&pikachu());
        let html = CardRenderer::new().unwrap().render_card(&doc).unwrap();
        assert_eq!(field(&html, "special-attack"), "50");
        assert_eq!(field(&html, "speed"), "90");
        assert_eq!(html.matches("<tr>").count(), 7 + 6);
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = CardRenderer::new().unwrap();
        let doc = CardDocument::from_result(&pikachu());
        assert_eq!(
            renderer.render_card(&doc).unwrap(),
            renderer.render_card(&doc).unwrap()
        );
        assert_eq!(
            renderer.render_page(&doc).unwrap(),
            CardRenderer::new().unwrap().render_page(&doc).unwrap()
        );
    }

    #[test]
    fn interpolated_values_are_escaped() {
        let mut r = pikachu();
        r.name = "<script>alert(1)</script>".into();
        let doc = CardDocument::from_result(&r);
        let html = CardRenderer::new().unwrap().render_card(&doc).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn missing_images_are_left_out() {
        let mut r = pikachu();
        r.sprite_url = None;
        r.artwork_url = None;
        r.base_experience = None;
        let doc = CardDocument::from_result(&r);
        let html = CardRenderer::new().unwrap().render_card(&doc).unwrap();
        assert!(!html.contains("<img"));
        assert!(!html.contains("background-image"));
        assert_eq!(field(&html, "Base Experience"), "unknown");
    }

    #[test]
    fn page_wraps_the_card() {
        let renderer = CardRenderer::new().unwrap();
        let doc = CardDocument::from_result(&pikachu());
        let page = renderer.render_page(&doc).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Pikachu | Pokédex</title>"));
        assert!(page.contains(">Abilities</td>"));
    }
}
