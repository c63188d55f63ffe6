use crate::model::{Alert, LookupError, LookupEvent, LookupResult, Query};
use crate::render::CardDocument;
use ratatui::{
    style::Color,
    style::Style,
    text::{Line, Span},
};
use std::path::PathBuf;

/// Which part of the search form has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Button,
}

#[derive(Default)]
pub struct UiState {
    pub input: String,
    pub focus: Focus,
    pub show_help: bool,
    pub info: String,

    /// Query of the lookup currently in flight.
    pub pending: Option<Query>,
    pub card: Option<CardDocument>,
    pub last_result: Option<LookupResult>,
    /// Blocking alert; input is ignored until it is dismissed.
    pub alert: Option<Alert>,

    pub last_saved_path: Option<PathBuf>,
}

impl UiState {
    pub fn apply_event(&mut self, ev: LookupEvent) {
        match ev {
            LookupEvent::Started { query } => {
                self.info = if query.as_str().is_empty() {
                    "Searching…".into()
                } else {
                    format!("Searching for {query}…")
                };
                self.pending = Some(query);
            }
            LookupEvent::Completed { result } => {
                let doc = CardDocument::from_result(&result);
                self.info = format!("Found {} (#{})", doc.title, doc.id);
                self.card = Some(doc);
                self.last_result = Some(*result);
                self.pending = None;
            }
            // Superseded lookups already have a newer one pending.
            LookupEvent::Failed {
                error: LookupError::Superseded,
                ..
            } => {}
            LookupEvent::Failed { query, error } => {
                self.info = format!("Lookup for '{query}' failed: {error}");
                self.pending = None;
            }
            LookupEvent::Alert(alert) => {
                self.alert = Some(alert);
            }
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Button,
            Focus::Button => Focus::Input,
        };
    }
}

/// Push a `label: value` line, wrapping long values under a two-space indent.
pub fn push_wrapped_kv(out: &mut Vec<Line<'static>>, label: &str, value: &str, width: u16) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }

    // Account for borders (2 chars on each side)
    let usable_width = width.saturating_sub(4).max(1);
    let label_text = format!("{label}:");
    let label_width = label_text.chars().count() as u16;

    let value_chars: Vec<char> = value.chars().collect();
    let mut remaining = value_chars.as_slice();
    let mut first = true;

    while !remaining.is_empty() {
        let line_width = if first {
            usable_width.saturating_sub(label_width + 1).max(1)
        } else {
            usable_width.saturating_sub(2).max(1)
        };

        let take = (remaining.len() as u16).min(line_width) as usize;
        let (line_chars, rest) = remaining.split_at(take);
        let line_text: String = line_chars.iter().collect();

        if first {
            out.push(Line::from(vec![
                Span::styled(label_text.clone(), Style::default().fg(Color::Gray)),
                Span::raw(" "),
                Span::raw(line_text),
            ]));
            first = false;
        } else {
            out.push(Line::from(vec![Span::raw("  "), Span::raw(line_text)]));
        }

        remaining = rest;
    }
}
