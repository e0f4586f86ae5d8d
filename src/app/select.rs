use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend, widgets::ListState};
use tokio::sync::mpsc;

use crate::error::PrefillError;
use crate::logic::{SelectionEvent, SelectionSession, SessionOutcome};
use crate::state::SelectableAppModel;
use crate::ui::render_selection;

use super::terminal::{restore_terminal, setup_terminal};

/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 10;

/// What: Move the cursor by `delta` rows, clamped to the list.
fn move_cursor(cursor: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        cursor.select(None);
        return;
    }
    let current = cursor.selected().unwrap_or(0);
    let next = current.saturating_add_signed(delta).min(len - 1);
    cursor.select(Some(next));
}

/// What: Translate one key press into session events, updating the cursor.
///
/// Inputs:
/// - `key`: Pressed key
/// - `cursor`: Highlighted row, moved in place for navigation keys
/// - `models`: Current models (needed to expand select-all/none)
///
/// Output:
/// - Events to apply in order; empty for navigation and unknown keys.
///
/// Details:
/// - `a` toggles every unselected row, `n` every selected row, so both end
///   up as plain `Toggle` events.
#[must_use]
pub fn events_for_key(
    key: &KeyEvent,
    cursor: &mut ListState,
    models: &[SelectableAppModel],
) -> Vec<SelectionEvent> {
    let len = models.len();
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            vec![SelectionEvent::Cancel]
        }
        KeyCode::Esc | KeyCode::Char('q') => vec![SelectionEvent::Cancel],
        KeyCode::Enter => vec![SelectionEvent::Confirm],
        KeyCode::Char(' ') => cursor
            .selected()
            .filter(|&i| i < len)
            .map(SelectionEvent::Toggle)
            .into_iter()
            .collect(),
        KeyCode::Char('a') => models
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_selected)
            .map(|(i, _)| SelectionEvent::Toggle(i))
            .collect(),
        KeyCode::Char('n') => models
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_selected)
            .map(|(i, _)| SelectionEvent::Toggle(i))
            .collect(),
        KeyCode::Up | KeyCode::Char('k') => {
            move_cursor(cursor, len, -1);
            Vec::new()
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_cursor(cursor, len, 1);
            Vec::new()
        }
        KeyCode::PageUp => {
            move_cursor(cursor, len, -PAGE_STEP);
            Vec::new()
        }
        KeyCode::PageDown => {
            move_cursor(cursor, len, PAGE_STEP);
            Vec::new()
        }
        KeyCode::Home => {
            move_cursor(cursor, len, isize::MIN);
            Vec::new()
        }
        KeyCode::End => {
            move_cursor(cursor, len, isize::MAX);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// What: Spawn the blocking thread that forwards terminal input.
///
/// Inputs:
/// - `event_tx`: Channel receiving raw terminal events
/// - `cancelled`: Set by the caller to stop the thread
///
/// Details:
/// - Polls every 50ms so the thread notices cancellation promptly.
fn spawn_event_thread(event_tx: mpsc::UnboundedSender<CEvent>, cancelled: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        while !cancelled.load(Ordering::Relaxed) {
            match crossterm::event::poll(Duration::from_millis(50)) {
                Ok(true) => {
                    if let Ok(ev) = crossterm::event::read()
                        && event_tx.send(ev).is_err()
                    {
                        break;
                    }
                }
                Ok(false) | Err(_) => {}
            }
        }
    });
}

/// Draw/read loop; the terminal must already be set up.
async fn drive(
    session: &mut SelectionSession,
    no_color: bool,
    events: &mut mpsc::UnboundedReceiver<CEvent>,
) -> Result<(), PrefillError> {
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
    let mut cursor = ListState::default();
    if !session.models().is_empty() {
        cursor.select(Some(0));
    }

    while !session.state().is_terminal() {
        terminal.draw(|f| render_selection(f, session.models(), &mut cursor, no_color))?;
        match events.recv().await {
            Some(CEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                for ev in events_for_key(&key, &mut cursor, session.models()) {
                    session.apply(ev);
                }
            }
            Some(_) => {}
            None => {
                session.apply(SelectionEvent::Cancel);
            }
        }
    }
    Ok(())
}

/// What: Run the interactive selection screen until the user confirms or cancels.
///
/// Inputs:
/// - `session`: Session seeded with the merged catalog
/// - `no_color`: Render without colors
///
/// Output:
/// - Session outcome; the terminal is restored on every path.
///
/// # Errors
/// - `Terminal` when the terminal cannot be set up, drawn or restored.
pub async fn run_selection_tui(
    mut session: SelectionSession,
    no_color: bool,
) -> Result<SessionOutcome, PrefillError> {
    setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let cancelled = Arc::new(AtomicBool::new(false));
    spawn_event_thread(event_tx, Arc::clone(&cancelled));

    let result = drive(&mut session, no_color, &mut event_rx).await;
    cancelled.store(true, Ordering::Relaxed);
    let restored = restore_terminal();
    result?;
    restored?;

    tracing::debug!(
        selected = session.selected_count(),
        state = ?session.state(),
        "[Select] Selection screen closed"
    );
    Ok(session.finish())
}
