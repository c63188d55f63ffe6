use crate::render::{CardDocument, CardRenderer};
use anyhow::{Context, Result};
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

use super::state::UiState;

// Clipboard worker channel, started on first copy.
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// Render the standalone HTML page for the card on screen.
pub fn current_card_html(state: &UiState, renderer: &CardRenderer) -> Result<String> {
    let result = state
        .last_result
        .as_ref()
        .context("no card to export yet")?;
    renderer.render_page(&CardDocument::from_result(result))
}

/// Save the current card into the data directory and report the path in the status line.
pub fn save_and_show_path(state: &mut UiState, renderer: &CardRenderer) {
    let saved = current_card_html(state, renderer).and_then(|html| {
        let result = state
            .last_result
            .as_ref()
            .context("no card to export yet")?;
        crate::storage::save_card(result, &html)
    });
    match saved {
        Ok(path) => {
            state.info = format!("Saved: {}", path.display());
            state.last_saved_path = Some(path);
        }
        Err(e) => {
            state.info = format!("Save failed: {e:#}");
        }
    }
}

/// Open the last saved card in the default browser.
pub fn open_saved(state: &mut UiState) {
    match state.last_saved_path.as_ref() {
        Some(path) => {
            state.info = match open::that_detached(path) {
                Ok(()) => format!("Opened: {}", path.display()),
                Err(e) => format!("Open failed: {e}"),
            };
        }
        None => state.info = "No saved card to open. Save one first (s)".into(),
    }
}

/// Copy the current card's HTML to the clipboard.
pub fn copy_card(state: &mut UiState, renderer: &CardRenderer) {
    state.info = match current_card_html(state, renderer).and_then(|html| copy_to_clipboard(&html)) {
        Ok(()) => "✓ Copied card HTML to clipboard".into(),
        Err(e) => format!("Clipboard copy failed: {e:#}"),
    };
}

/// Start the clipboard worker thread once. Each copy gets a fresh clipboard
/// instance that stays alive long enough for clipboard managers on Linux.
fn init_clipboard_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();
        std::thread::spawn(move || {
            for text in rx {
                if let Ok(mut clipboard) = arboard::Clipboard::new() {
                    if clipboard.set_text(text).is_ok() {
                        std::thread::sleep(Duration::from_secs(2));
                    }
                }
            }
        });
        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Failed to initialize clipboard manager"))
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    init_clipboard_manager()?
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))
}
