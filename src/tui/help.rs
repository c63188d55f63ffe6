use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_line(key: &str, pad: usize, what: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key.to_string(), Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(what.to_string()),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Search:"),
        key_line("Enter", 7, "Look up the typed name or id"),
        key_line("Tab", 9, "Move focus between field and Search button"),
        key_line("Click", 7, "Search button looks up the typed name or id"),
        Line::from(""),
        Line::from("With the Search button focused:"),
        key_line("Enter/Space", 1, "Look up"),
        key_line("s", 11, "Save HTML card"),
        key_line("y", 11, "Copy HTML card to clipboard"),
        key_line("o", 11, "Open saved card in browser"),
        key_line("?", 11, "Toggle this help"),
        Line::from(""),
        Line::from("Anywhere:"),
        key_line("Esc", 9, "Dismiss alert / close help / quit"),
        key_line("Ctrl-C", 6, "Quit"),
        Line::from(""),
        Line::from("Data:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("https://pokeapi.co", Style::default().fg(Color::Cyan)),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
