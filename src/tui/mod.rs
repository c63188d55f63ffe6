mod export;
mod help;
mod state;

use crate::cli::{build_config, Cli};
use crate::engine::PokeApiClient;
use crate::model::{Alert, LookupEvent};
use crate::orchestrator::{self, LookupController, UiCommand};
use crate::render::{CardDocument, CardRenderer};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Terminal,
};
use state::{Focus, UiState};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let client = PokeApiClient::new(&cfg)?;

    // Unbounded channels keep the UI thread from ever blocking on the controller.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<LookupEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();
    let controller = LookupController::new(client, cfg.timeout, event_tx);

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(event_rx, cmd_tx));

    let res = orchestrator::run_controller(controller, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Screen regions, computed the same way for drawing and for mouse hit-testing.
struct AppLayout {
    input: Rect,
    button: Rect,
    body: Rect,
    status: Rect,
}

fn app_layout(area: Rect) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);
    let search = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(12)])
        .split(rows[0]);
    AppLayout {
        input: search[0],
        button: search[1],
        body: rows[1],
        status: rows[2],
    }
}

/// Form submit and button click both land here.
fn submit(state: &mut UiState, cmd_tx: &UnboundedSender<UiCommand>) {
    let _ = cmd_tx.send(UiCommand::Lookup(state.input.clone()));
    state.show_help = false;
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    mut event_rx: UnboundedReceiver<LookupEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    let renderer = CardRenderer::new()?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState {
        info: "Type a Pokémon name or id and press Enter. ? for help.".into(),
        ..Default::default()
    };

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now() - tick_rate;

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            state.apply_event(ev);
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if !event::poll(Duration::from_millis(10)).unwrap_or(false) {
            continue;
        }
        let ev = match event::read() {
            Ok(ev) => ev,
            Err(_) => continue,
        };

        match ev {
            Event::Key(k) => {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if k.modifiers == KeyModifiers::CONTROL && k.code == KeyCode::Char('c') {
                    let _ = cmd_tx.send(UiCommand::Quit);
                    break Ok(());
                }

                // The alert is modal: the next key only dismisses it.
                if state.alert.is_some() {
                    if matches!(k.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                        state.alert = None;
                    }
                    continue;
                }

                match (state.focus, k.code) {
                    (_, KeyCode::Esc) => {
                        if state.show_help {
                            state.show_help = false;
                        } else {
                            let _ = cmd_tx.send(UiCommand::Quit);
                            break Ok(());
                        }
                    }
                    (_, KeyCode::Tab) | (_, KeyCode::BackTab) => state.toggle_focus(),
                    (Focus::Input, KeyCode::Enter) => submit(&mut state, &cmd_tx),
                    (Focus::Input, KeyCode::Backspace) => {
                        state.input.pop();
                    }
                    (Focus::Input, KeyCode::Char(c)) => state.input.push(c),
                    (Focus::Button, KeyCode::Enter) | (Focus::Button, KeyCode::Char(' ')) => {
                        submit(&mut state, &cmd_tx)
                    }
                    (Focus::Button, KeyCode::Char('s')) => {
                        export::save_and_show_path(&mut state, &renderer)
                    }
                    (Focus::Button, KeyCode::Char('y')) => export::copy_card(&mut state, &renderer),
                    (Focus::Button, KeyCode::Char('o')) => export::open_saved(&mut state),
                    (Focus::Button, KeyCode::Char('?')) => state.show_help = !state.show_help,
                    _ => {}
                }
            }
            Event::Mouse(m) => {
                if state.alert.is_some() {
                    continue;
                }
                if let MouseEventKind::Down(MouseButton::Left) = m.kind {
                    let size = terminal.size().unwrap_or_default();
                    let layout = app_layout(Rect::new(0, 0, size.width, size.height));
                    let at = Position::new(m.column, m.row);
                    if layout.button.contains(at) {
                        state.focus = Focus::Button;
                        submit(&mut state, &cmd_tx);
                    } else if layout.input.contains(at) {
                        state.focus = Focus::Input;
                    }
                }
            }
            _ => {}
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, DisableMouseCapture, LeaveAlternateScreen).ok();
    res
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let layout = app_layout(area);
    let focused = Style::default().fg(Color::Yellow);

    let input = Paragraph::new(state.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Name or id")
            .border_style(if state.focus == Focus::Input {
                focused
            } else {
                Style::default()
            }),
    );
    f.render_widget(input, layout.input);
    if state.focus == Focus::Input && state.alert.is_none() {
        let x = layout.input.x + 1 + state.input.chars().count() as u16;
        let max_x = layout.input.right().saturating_sub(2);
        f.set_cursor_position(Position::new(x.min(max_x), layout.input.y + 1));
    }

    let button = Paragraph::new(Line::from(Span::styled(
        "Search",
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if state.focus == Focus::Button {
                focused
            } else {
                Style::default()
            }),
    );
    f.render_widget(button, layout.button);

    if state.show_help {
        help::draw_help(layout.body, f);
    } else {
        draw_card(layout.body, f, state);
    }

    let status_style = if state.pending.is_some() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    let status = Paragraph::new(Span::styled(state.info.clone(), status_style))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, layout.status);

    if let Some(alert) = state.alert {
        draw_alert(area, f, alert);
    }
}

fn draw_card(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let Some(doc) = state.card.as_ref() else {
        let p = Paragraph::new("No Pokémon yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Pokémon"));
        f.render_widget(p, area);
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    f.render_widget(
        Paragraph::new(card_detail_lines(doc, cols[0].width)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} #{}", doc.title, doc.id)),
        ),
        cols[0],
    );
    f.render_widget(
        Paragraph::new(stat_lines(doc, cols[1].width))
            .block(Block::default().borders(Borders::ALL).title("Stats")),
        cols[1],
    );
}

fn card_detail_lines(doc: &CardDocument, width: u16) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            doc.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    state::push_wrapped_kv(&mut lines, "Species", &doc.species, width);
    state::push_wrapped_kv(&mut lines, "ID", &doc.id.to_string(), width);
    state::push_wrapped_kv(&mut lines, "Height", &doc.height.to_string(), width);
    state::push_wrapped_kv(&mut lines, "Weight", &doc.weight.to_string(), width);
    state::push_wrapped_kv(&mut lines, "Base Experience", &doc.base_experience, width);
    state::push_wrapped_kv(&mut lines, "Abilities", &doc.abilities, width);
    state::push_wrapped_kv(&mut lines, "Type", &doc.types, width);
    if let Some(url) = doc.thumbnail_url.as_deref() {
        state::push_wrapped_kv(&mut lines, "Sprite", url, width);
    }
    if let Some(url) = doc.artwork_url.as_deref() {
        state::push_wrapped_kv(&mut lines, "Artwork", url, width);
    }
    lines
}

fn stat_lines(doc: &CardDocument, width: u16) -> Vec<Line<'static>> {
    const MAX_STAT: f64 = 255.0;
    let name_width = doc
        .stats
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0);
    // name, space, value (3), space, bar; plus borders.
    let bar_room = (width as usize).saturating_sub(name_width + 5 + 2).max(1);

    doc.stats
        .iter()
        .map(|s| {
            let filled = ((s.value as f64 / MAX_STAT) * bar_room as f64).round() as usize;
            Line::from(vec![
                Span::styled(
                    format!("{:<name_width$} ", s.name),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(format!("{:>3} ", s.value)),
                Span::styled(
                    "█".repeat(filled.min(bar_room)),
                    Style::default().fg(Color::Green),
                ),
            ])
        })
        .collect()
}

fn draw_alert(area: Rect, f: &mut ratatui::Frame, alert: Alert) {
    let popup = centered_rect(area, 60, 7);
    f.render_widget(Clear, popup);
    let p = Paragraph::new(vec![
        Line::from(alert.message()),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Alert")
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(p, popup);
}

/// A `width` percent wide, `height` rows tall rect centered in `area`.
fn centered_rect(area: Rect, width_pct: u16, height: u16) -> Rect {
    let w = (area.width as u32 * width_pct as u32 / 100) as u16;
    let h = height.min(area.height);
    Rect::new(
        area.x + area.width.saturating_sub(w) / 2,
        area.y + area.height.saturating_sub(h) / 2,
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::pikachu;

    #[test]
    fn layout_puts_button_right_of_input() {
        let l = app_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(l.input.height, 3);
        assert_eq!(l.button.width, 12);
        assert_eq!(l.button.x, l.input.right());
        assert_eq!(l.status.bottom(), 24);
        assert!(l.body.height >= 5);
    }

    #[test]
    fn submit_sends_raw_input() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = UiState {
            input: "  Pikachu ".into(),
            show_help: true,
            ..Default::default()
        };
        submit(&mut state, &tx);
        match rx.try_recv().unwrap() {
            UiCommand::Lookup(raw) => assert_eq!(raw, "  Pikachu "),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!state.show_help);
    }

    #[test]
    fn stat_bars_fit_their_column() {
        let doc = CardDocument::from_result(&pikachu());
        let lines = stat_lines(&doc, 40);
        assert_eq!(lines.len(), 6);
        for line in lines {
            assert!(line.width() <= 40);
        }
    }

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 100, 30);
        let r = centered_rect(area, 60, 7);
        assert_eq!(r, Rect::new(20, 11, 60, 7));
        assert_eq!(area.intersection(r), r);
    }
}
