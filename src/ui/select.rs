use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::state::SelectableAppModel;

/// Key hints shown under the list.
const FOOTER_HINT: &str =
    "Space: toggle  a: all  n: none  Enter: save  Esc/q: cancel  Up/Down/PgUp/PgDn: move";

/// Colors used by the selection screen; all default when colors are disabled.
struct Palette {
    /// Border and title of the list block.
    accent: Style,
    /// Marker of a selected row.
    selected: Style,
    /// Highlight of the row under the cursor.
    cursor: Style,
    /// Footer text.
    hint: Style,
}

impl Palette {
    /// Pick the palette for the current color mode.
    fn new(no_color: bool) -> Self {
        if no_color {
            return Self {
                accent: Style::default(),
                selected: Style::default(),
                cursor: Style::default().add_modifier(Modifier::REVERSED),
                hint: Style::default(),
            };
        }
        Self {
            accent: Style::default().fg(Color::Magenta),
            selected: Style::default().fg(Color::Green),
            cursor: Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            hint: Style::default().fg(Color::Gray),
        }
    }
}

/// What: Build one list row for an app.
///
/// Output:
/// - `[x] Title` when selected, `[ ] Title` otherwise.
fn app_row<'a>(model: &'a SelectableAppModel, palette: &Palette) -> ListItem<'a> {
    let (marker, style) = if model.is_selected {
        ("[x] ", palette.selected)
    } else {
        ("[ ] ", Style::default())
    };
    ListItem::new(Line::from(vec![
        Span::styled(marker, style),
        Span::raw(model.title.as_str()),
    ]))
}

/// What: Draw the app selection screen.
///
/// Inputs:
/// - `f`: Frame to render into
/// - `models`: Current list models in catalog order
/// - `cursor`: List state holding the highlighted row
/// - `no_color`: Render without colors
///
/// Output:
/// - Draws a bordered list whose title shows the selected count, plus a
///   one-line key hint footer.
pub fn render_selection(
    f: &mut Frame,
    models: &[SelectableAppModel],
    cursor: &mut ListState,
    no_color: bool,
) {
    let palette = Palette::new(no_color);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let selected = models.iter().filter(|m| m.is_selected).count();
    let title = format!(" Select apps to prefill ({selected}/{}) ", models.len());
    let block = Block::default()
        .title(Line::from(Span::styled(title, palette.accent)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.accent);

    let items: Vec<ListItem> = models.iter().map(|m| app_row(m, &palette)).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(palette.cursor)
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[0], cursor);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(FOOTER_HINT, palette.hint))),
        chunks[1],
    );
}
