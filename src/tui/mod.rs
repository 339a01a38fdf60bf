mod editor;
mod state;

use crate::cli::{build_config, Cli};
use crate::orchestrator::{self, RunEvent, UiCommand};
use crate::render::LineKind;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use editor::Editor;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use state::{apply_event, UiState};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

// Exception lines use the playground's error red.
const ERROR_FG: Color = Color::Rgb(207, 62, 62);

const PAGE_SCROLL: usize = 5;

pub async fn run(args: Cli) -> Result<()> {
    // Unbounded channels avoid backpressure and task switching in the hot path.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<RunEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let cfg = build_config(&args);

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(event_rx, cmd_tx));

    let res = orchestrator::run_controller(cfg, event_tx, cmd_rx).await;

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

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    mut event_rx: UnboundedReceiver<RunEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut state = UiState::default();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = 'ui: loop {
        // Drain events without blocking to keep the UI responsive.
        loop {
            match event_rx.try_recv() {
                Ok(ev) => apply_event(&mut state, ev),
                Err(TryRecvError::Empty) => break,
                // Controller gone; no more events can arrive.
                Err(TryRecvError::Disconnected) => break 'ui Ok(()),
            }
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if k.modifiers.contains(KeyModifiers::CONTROL) {
                    match k.code {
                        KeyCode::Char('c') | KeyCode::Char('q') => {
                            let _ = cmd_tx.send(UiCommand::Quit);
                            break Ok(());
                        }
                        KeyCode::Char('r') => {
                            let _ = cmd_tx.send(UiCommand::Run(state.editor.text()));
                        }
                        KeyCode::Char('l') => {
                            let _ = cmd_tx.send(UiCommand::ClearLog);
                        }
                        KeyCode::Char('y') => copy_log_to_clipboard(&mut state),
                        _ => {}
                    }
                    continue;
                }
                match k.code {
                    KeyCode::Char(c) => state.editor.insert_char(c),
                    // Literal tab; it reaches the service verbatim.
                    KeyCode::Tab => state.editor.insert_char('\t'),
                    KeyCode::Enter => state.editor.insert_newline(),
                    KeyCode::Backspace => state.editor.backspace(),
                    KeyCode::Delete => state.editor.delete(),
                    KeyCode::Left => state.editor.move_left(),
                    KeyCode::Right => state.editor.move_right(),
                    KeyCode::Up => state.editor.move_up(),
                    KeyCode::Down => state.editor.move_down(),
                    KeyCode::Home => state.editor.move_home(),
                    KeyCode::End => state.editor.move_end(),
                    KeyCode::PageUp => {
                        state.scroll_offset =
                            (state.scroll_offset + PAGE_SCROLL).min(state.log.len());
                    }
                    KeyCode::PageDown => {
                        state.scroll_offset = state.scroll_offset.saturating_sub(PAGE_SCROLL);
                    }
                    _ => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    res
}

fn copy_log_to_clipboard(state: &mut UiState) {
    let text: String = state
        .log
        .lines()
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text)) {
        Ok(()) => state.status = "output log copied to clipboard".into(),
        Err(e) => state.status = format!("clipboard copy failed: {e}"),
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);
    draw_editor(rows[0], f, state);
    draw_output_log(rows[1], f, state);
    draw_status(rows[2], f, state);
}

fn draw_editor(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Editor (Ctrl-R run, Ctrl-L clear, Ctrl-Y copy, Ctrl-C quit)");
    let inner = block.inner(area);

    let (row, _) = state.editor.cursor();
    let top = row.saturating_sub((inner.height as usize).saturating_sub(1));

    let lines: Vec<Line> = state
        .editor
        .lines()
        .iter()
        .map(|l| Line::from(Editor::display_line(l)))
        .collect();
    let p = Paragraph::new(lines).block(block).scroll((top as u16, 0));
    f.render_widget(p, area);

    if inner.width > 0 && inner.height > 0 {
        let x = inner.x + (state.editor.display_col() as u16).min(inner.width.saturating_sub(1));
        let y = inner.y + ((row - top) as u16).min(inner.height.saturating_sub(1));
        f.set_cursor_position((x, y));
    }
}

fn draw_output_log(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Output ({} lines)", state.log.len()));
    let inner = block.inner(area);

    let visible = inner.height as usize;
    let total = state.log.len();
    let offset = state.scroll_offset.min(total.saturating_sub(visible));
    let end = total - offset;
    let start = end.saturating_sub(visible);

    let lines: Vec<Line> = state.log.lines()[start..end]
        .iter()
        .map(|l| match l.kind {
            LineKind::Error => {
                Line::from(Span::styled(l.text.clone(), Style::default().fg(ERROR_FG)))
            }
            LineKind::Output => Line::from(l.text.clone()),
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let activity = if state.in_flight > 0 {
        format!("{} run(s) in flight", state.in_flight)
    } else {
        "idle".to_string()
    };
    let line = Line::from(vec![
        Span::styled(activity, Style::default().fg(Color::Magenta)),
        Span::raw("  "),
        Span::raw(state.status.clone()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
