use crate::dashboard::DetailView;
use crate::incident::{Incident, FIELD_LABELS};
use crate::tui::app::{App, Focus};
use crate::tui::colors;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table};

const PLACEHOLDER: &str = "Search by Address...";
const SEARCH_PREFIX: &str = " > ";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(3), // Search bar
            Constraint::Length(1), // Loading / empty notice
            Constraint::Min(5),    // Incidents
            Constraint::Length(1), // Pagination
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(frame, app, chunks[0]);
    draw_search_bar(frame, app, chunks[1]);
    draw_notice(frame, app, chunks[2]);
    draw_table(frame, app, chunks[3]);
    draw_pagination(frame, app, chunks[4]);
    draw_status_bar(frame, app, chunks[5]);

    // Overlays
    if !app.dashboard.state().suggestions.is_empty() {
        draw_suggestions(frame, app, chunks[1], area);
    }
    match &app.dashboard.state().detail {
        DetailView::Closed => {}
        detail => draw_detail(frame, detail, area),
    }

    if app.focus == Focus::Search && !app.dashboard.state().detail.is_open() {
        let text = &app.dashboard.state().search_text;
        let cursor_x = chunks[1].x + 1 + SEARCH_PREFIX.len() as u16 + app.search.cursor_column(text);
        let cursor_y = chunks[1].y + 1;
        frame.set_cursor_position(Position::new(
            cursor_x.min(chunks[1].right().saturating_sub(2)),
            cursor_y,
        ));
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = " Incidents Dashboard ";
    let source = format!("{} ", app.api_label);
    let padding = (area.width as usize).saturating_sub(title.len() + source.len());

    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(padding)),
        Span::styled(source, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(colors::BAR_BG)),
        area,
    );
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.focus == Focus::Search {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search ");

    let text = &app.dashboard.state().search_text;
    let line = if text.is_empty() {
        Line::from(vec![
            Span::raw(SEARCH_PREFIX),
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::raw(SEARCH_PREFIX),
            Span::styled(text.as_str(), Style::default().fg(Color::White)),
        ])
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_suggestions(frame: &mut Frame, app: &App, search_area: Rect, area: Rect) {
    let state = app.dashboard.state();
    let below = search_area.bottom().saturating_sub(1);
    let max_height = area.bottom().saturating_sub(below);
    let height = (state.suggestions.len() as u16 + 2).min(max_height);
    if height < 3 {
        return;
    }

    let popup = Rect::new(search_area.x + 1, below, search_area.width.saturating_sub(2), height);
    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = state
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, address)| {
            let style = if i == state.suggestion_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!(" {address} ")).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, popup);
}

fn draw_notice(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.dashboard.state();
    let mut spans = Vec::new();

    if state.loading {
        spans.push(Span::styled(
            " Loading incidents...",
            Style::default().fg(Color::Yellow),
        ));
    }
    if state.no_results {
        spans.push(Span::styled(
            " No incidents found.",
            Style::default().fg(Color::LightRed),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn incident_row(incident: &Incident, bg: Color, selected: bool) -> Row<'static> {
    let values = incident.display_values();
    let type_color = colors::color_for_type(&values[1]);
    let alarm_color = colors::color_for_alarm(incident.alarm);

    let cells = values.into_iter().enumerate().map(|(col, value)| {
        let fg = match col {
            1 => type_color,
            2 => alarm_color,
            _ => Color::White,
        };
        Cell::from(value).style(Style::default().fg(fg))
    });

    let modifier = if selected {
        Modifier::BOLD
    } else {
        Modifier::empty()
    };
    Row::new(cells).style(Style::default().bg(bg).add_modifier(modifier))
}

fn draw_table(frame: &mut Frame, app: &mut App, area: Rect) {
    // Area height minus borders minus header
    let inner_height = area.height.saturating_sub(3) as usize;
    app.table.visible_rows = inner_height;

    let state = app.dashboard.state();

    let header = Row::new(FIELD_LABELS.iter().map(|label| {
        Cell::from(*label).style(
            Style::default()
                .fg(Color::White)
                .bg(colors::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        )
    }))
    .height(1);

    // Build visible rows only
    let start = app.table.scroll_offset.min(state.incidents.len());
    let end = (start + inner_height).min(state.incidents.len());
    let results_focused = app.focus == Focus::Results;

    let rows: Vec<Row> = state.incidents[start..end]
        .iter()
        .enumerate()
        .map(|(visual_idx, incident)| {
            let is_selected = results_focused && app.table.selected == Some(start + visual_idx);
            let bg = if is_selected {
                colors::SELECTED_BG
            } else if visual_idx % 2 == 1 {
                colors::STRIPE_BG
            } else {
                Color::Reset
            };
            incident_row(incident, bg, is_selected)
        })
        .collect();

    let widths = [
        Constraint::Length(12), // Incident ID
        Constraint::Min(12),    // Type
        Constraint::Length(5),  // Alarm
        Constraint::Length(12), // Enroute
        Constraint::Length(12), // Arrive
        Constraint::Min(18),    // Address
        Constraint::Min(10),    // Apparatus
        Constraint::Length(5),  // Total
        Constraint::Length(10), // Scan date
        Constraint::Length(19), // Created
    ];

    let title = if state.has_selection() {
        format!(" Incidents at {} ", state.selected_address)
    } else {
        " Incidents ".to_string()
    };
    let border_style = if results_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let table = Table::new(rows, widths).header(header).column_spacing(1).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(table, area);
}

fn draw_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.dashboard.state();
    if state.incidents.is_empty() {
        return;
    }

    let button = |label: &'static str, enabled: bool| {
        if enabled {
            Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                label,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            )
        }
    };

    let page_size = app.dashboard.config().page_size;
    let first = state.offset + 1;
    let last = state.offset + state.incidents.len();

    let line = Line::from(vec![
        Span::raw(" "),
        button(" \u{25C0} Previous ", app.dashboard.has_prev()),
        Span::raw(format!(
            "  Page {}  ({}-{})  ",
            state.page_number(page_size),
            first,
            last
        )),
        button(" Next \u{25B6} ", app.dashboard.has_next()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help = match app.focus {
        Focus::Search => " Type to search \u{2502} \u{2191}\u{2193} pick \u{2502} Enter select \u{2502} Tab results \u{2502} ^U clear \u{2502} Esc quit ",
        Focus::Results => " \u{2191}\u{2193} move \u{2502} \u{2190}\u{2192} page \u{2502} Enter details \u{2502} F5 refresh \u{2502} Tab search ",
    };

    let mut right = app.status_message.clone();
    if let Some(updated) = app.dashboard.state().updated_at {
        right.push_str(&format!(" \u{2502} updated {}", updated.format("%H:%M:%S")));
    }
    right.push(' ');

    let padding = (area.width as usize)
        .saturating_sub(help.chars().count() + right.chars().count());

    let line = Line::from(vec![
        Span::styled(help, Style::default().fg(Color::Gray)),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, Style::default().fg(Color::White)),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(colors::BAR_BG)),
        area,
    );
}

fn draw_detail(frame: &mut Frame, detail: &DetailView, area: Rect) {
    let width = 64.min(area.width.saturating_sub(4));
    let height = (FIELD_LABELS.len() as u16 + 4).min(area.height.saturating_sub(2));
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);

    let (title, lines) = match detail {
        DetailView::Closed => return,
        DetailView::Loading(id) => (
            format!(" Incident #{id} "),
            vec![Line::from(Span::styled(
                "Loading incident...",
                Style::default().fg(Color::Yellow),
            ))],
        ),
        DetailView::Failed { id, message } => (
            format!(" Incident #{id} "),
            vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::LightRed),
            ))],
        ),
        DetailView::Loaded(incident) => {
            let label_width = FIELD_LABELS.iter().map(|l| l.len()).max().unwrap_or(0) + 1;
            let lines: Vec<Line> = incident
                .fields()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:<width$} ", format!("{label}:"), width = label_width),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(value),
                    ])
                })
                .collect();
            (format!(" Incident #{} ", incident.id), lines)
        }
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title)
            .title_bottom(" Esc close "),
    );
    frame.render_widget(paragraph, popup);
}
