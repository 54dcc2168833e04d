use crate::application::{App, AppMode, FetchState, Route};
use crate::domain::{Field, RemoteUser};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

const BRAND: &str = "Julian Florez Pag React";
const COPYRIGHT: &str = "© 2025 Mi App React - Todos los derechos reservados";
const CONTACT: &str = "Contacto: julian@example.com | Tel: +57 300 123 4567";

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(f.area());

    render_navbar(f, app, chunks[0]);
    match app.route {
        Route::Registry => render_registry(f, app, chunks[1]),
        Route::Directory => render_directory(f, app, chunks[1]),
        Route::DirectoryDetail(_) => render_detail(f, app, chunks[1]),
        Route::Message => render_message(f, app, chunks[1]),
    }
    render_footer(f, app, chunks[2]);
}

fn render_navbar(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Route::NAV
        .iter()
        .enumerate()
        .map(|(i, route)| Line::from(format!("{} {}", i + 1, route.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(BRAND))
        .select(app.route.nav_index())
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

fn render_registry(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(0)])
        .split(area);

    render_form(f, app, chunks[0]);
    render_records(f, app, chunks[1]);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.mode == AppMode::Editing;
    let block = Block::default().borders(Borders::ALL).title("Inicio");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(inner);

    for (field, row) in Field::ALL.iter().zip(rows.iter()) {
        let focused = editing && app.focus == *field;
        let error = app.errors.get(*field);
        let border_style = if error.is_some() {
            error_style()
        } else if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(field.label());
        if let Some(message) = error {
            block = block.title_bottom(Line::from(Span::styled(message.to_string(), error_style())));
        }
        let value = app.field_value(*field);
        let (offset, column) = if focused {
            input_scroll(value, app.cursor_position, row.width.saturating_sub(2))
        } else {
            (0, 0)
        };
        let input = Paragraph::new(value.to_string())
            .block(block)
            .scroll((0, offset));
        f.render_widget(input, *row);

        if focused {
            f.set_cursor_position(Position::new(row.x + 1 + column, row.y + 1));
        }
    }
}

/// Horizontal scroll and cursor column for an input `inner_width` cells wide.
///
/// `cursor` counts chars; both results count display cells, so wide glyphs
/// take two columns.
fn input_scroll(value: &str, cursor: usize, inner_width: u16) -> (u16, u16) {
    let end = value
        .char_indices()
        .nth(cursor)
        .map_or(value.len(), |(index, _)| index);
    let width = Span::raw(&value[..end]).width();
    let column = u16::try_from(width).unwrap_or(u16::MAX);
    let offset = column.saturating_sub(inner_width.saturating_sub(1));
    (offset, column - offset)
}

fn render_records(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Usuario que han sido registrados");

    if app.registry.is_empty() {
        let empty = Paragraph::new("Aun no hay usuarios registrados").block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .registry
        .records()
        .iter()
        .map(|u| ListItem::new(format!("{} - {} - {}", u.name, u.email, u.phone)))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("X ");
    let mut state = ListState::default().with_selected(Some(app.selected_record));
    f.render_stateful_widget(list, area, &mut state);
}

/// Renders `Cargando...`, the failure message, or hands the data to `render`.
fn render_fetch_state<T>(
    f: &mut Frame,
    area: Rect,
    title: &str,
    state: &FetchState<T>,
    render: impl FnOnce(&mut Frame, Rect, Block, &T),
) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    match state {
        FetchState::Loading => f.render_widget(Paragraph::new("Cargando...").block(block), area),
        FetchState::Failure(message) => f.render_widget(
            Paragraph::new(message.as_str())
                .style(error_style())
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        ),
        FetchState::Success(data) => render(f, area, block, data),
    }
}

fn user_lines(user: &RemoteUser) -> Vec<Line<'_>> {
    vec![
        Line::from(vec![
            Span::styled("Email: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(user.email.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Tel: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(user.phone.as_str()),
        ]),
    ]
}

fn render_directory(f: &mut Frame, app: &App, area: Rect) {
    render_fetch_state(f, area, "Quiénes somos", app.directory.list(), |f, area, block, users| {
        let items: Vec<ListItem> = users
            .iter()
            .map(|user| {
                let mut lines = vec![Line::from(Span::styled(
                    user.name.as_str(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ))];
                lines.extend(user_lines(user));
                ListItem::new(lines)
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(app.selected_user));
        f.render_stateful_widget(list, area, &mut state);
    });
}

fn render_detail(f: &mut Frame, app: &App, area: Rect) {
    render_fetch_state(f, area, "Quiénes somos", app.directory.detail(), |f, area, block, user| {
        let mut lines = vec![
            Line::from(Span::styled(
                user.name.as_str(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(user_lines(user));
        lines.push(Line::from(""));
        lines.push(Line::from("← Volver (Esc)"));
        f.render_widget(Paragraph::new(lines).block(block), area);
    });
}

fn render_message(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(format!(
        "Bienvenido esta es la tarea de {}. Tu id es {}.",
        app.message.name, app.message.id
    ))];
    if let Some(url) = &app.message.image_url {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Imagen: {}", url)));
    }
    let message = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Mensaje"));
    f.render_widget(message, area);
}

fn key_hints(app: &App) -> &'static str {
    match (app.mode, app.route) {
        (AppMode::Editing, _) => "Tab/↑↓: field | Enter: Registrar | Esc: leave form",
        (AppMode::Normal, Route::Registry) => {
            "1-3: views | i/Enter: form | ↑↓: select | d: remove | q: quit"
        }
        (AppMode::Normal, Route::Directory) => "1-3: views | ↑↓: select | Enter: open | r: reload | q: quit",
        (AppMode::Normal, Route::DirectoryDetail(_)) => "1-3: views | Esc: back | r: reload | q: quit",
        (AppMode::Normal, Route::Message) => "1-3: views | q: quit",
    }
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let status = app
        .status_message
        .clone()
        .unwrap_or_else(|| key_hints(app).to_string());
    let lines = vec![
        Line::from(Span::styled(status, Style::default().fg(Color::Yellow))),
        Line::from(format!("{} | {}", COPYRIGHT, CONTACT)),
    ];
    let footer = Paragraph::new(lines).block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}
