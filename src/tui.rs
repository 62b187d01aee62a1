use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{BarChart, Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};
use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::form::FormField;
use crate::models::Status;
use crate::runtime::Runtime;
use crate::state::{DashboardState, LoadState, NoticeKind};
use crate::update::{FormInput, Msg, update};

const TICK: Duration = Duration::from_millis(50);

pub async fn run_dashboard(client: ApiClient, export_dir: PathBuf) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, client, export_dir).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    client: ApiClient,
    export_dir: PathBuf,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut runtime = Runtime::new(client, tx, export_dir);
    let mut state = DashboardState::new(chrono::Local::now().date_naive());
    let mut table_state = TableState::default();

    state = dispatch(state, Msg::Started, &mut runtime);

    loop {
        table_state.select((!state.applications.is_empty()).then_some(state.selected));
        terminal.draw(|frame| draw(frame, &state, &mut table_state))?;

        if event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(msg) = key_to_msg(&state, key) {
                        state = dispatch(state, msg, &mut runtime);
                    }
                }
            }
        } else {
            let msg = tokio::select! {
                msg = rx.recv() => msg,
                _ = tokio::time::sleep(TICK) => None,
            };
            if let Some(msg) = msg {
                state = dispatch(state, msg, &mut runtime);
            }
        }

        while let Ok(msg) = rx.try_recv() {
            state = dispatch(state, msg, &mut runtime);
        }

        if state.should_quit {
            break;
        }
    }
    Ok(())
}

fn dispatch(state: DashboardState, msg: Msg, runtime: &mut Runtime) -> DashboardState {
    let (state, effects) = update(state, msg);
    for effect in effects {
        runtime.run(effect);
    }
    state
}

/// Maps a key press to a message given the current mode.
pub fn key_to_msg(state: &DashboardState, key: KeyEvent) -> Option<Msg> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Msg::Quit);
    }

    if state.confirm_delete.is_some() {
        return match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Msg::ConfirmDelete),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Msg::CancelDelete),
            _ => None,
        };
    }

    if state.form_open {
        let input = match key.code {
            KeyCode::Esc => return Some(Msg::CloseForm),
            KeyCode::Enter => return Some(Msg::SubmitForm),
            KeyCode::Tab | KeyCode::Down => FormInput::NextField,
            KeyCode::BackTab | KeyCode::Up => FormInput::PrevField,
            KeyCode::Left => FormInput::CycleStatus { forward: false },
            KeyCode::Right => FormInput::CycleStatus { forward: true },
            KeyCode::Backspace => FormInput::Backspace,
            KeyCode::Char(c) if !c.is_control() => FormInput::Char(c),
            _ => return None,
        };
        return Some(Msg::Form(input));
    }

    if state.searching {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Msg::EndSearch),
            KeyCode::Backspace => {
                let mut query = state.filters.query.clone();
                query.pop();
                Some(Msg::QueryChanged(query))
            }
            KeyCode::Char(c) if !c.is_control() => {
                Some(Msg::QueryChanged(format!("{}{}", state.filters.query, c)))
            }
            _ => None,
        };
    }

    let selected_id = state.selected_application().map(|app| app.id);
    match key.code {
        KeyCode::Char('q') => Some(Msg::Quit),
        KeyCode::Esc if state.notice.is_some() => Some(Msg::DismissNotice),
        KeyCode::Esc => Some(Msg::Quit),
        KeyCode::Down | KeyCode::Char('j') => Some(Msg::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => Some(Msg::SelectPrev),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => Some(Msg::NextPage),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => Some(Msg::PrevPage),
        KeyCode::Char('/') => Some(Msg::StartSearch),
        KeyCode::Char('f') => Some(Msg::StatusFilterChanged(next_status_filter(
            state.filters.status,
        ))),
        KeyCode::Char('L') => Some(Msg::LinkFilterChanged(state.filters.link.cycle())),
        KeyCode::Char('o') => Some(Msg::SortOrderChanged(state.filters.sort_order.toggle())),
        KeyCode::Char('a') => Some(Msg::OpenForm),
        KeyCode::Char('r') => Some(Msg::Refresh),
        KeyCode::Char('e') => Some(Msg::Export),
        KeyCode::Char('u') => Some(Msg::Undo),
        KeyCode::Char('d') | KeyCode::Delete => selected_id.map(Msg::RequestDelete),
        KeyCode::Char('s') => state.selected_application().map(|app| Msg::SetStatus {
            id: app.id,
            status: app.status.next(),
        }),
        KeyCode::Char(c @ '1'..='5') => {
            let status = Status::ALL[c as usize - '1' as usize];
            selected_id.map(|id| Msg::SetStatus { id, status })
        }
        _ => None,
    }
}

fn next_status_filter(current: Option<Status>) -> Option<Status> {
    match current {
        None => Some(Status::ALL[0]),
        Some(Status::Rejected) => None,
        Some(status) => Some(status.next()),
    }
}

fn draw(frame: &mut Frame, state: &DashboardState, table_state: &mut TableState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, state, rows[0]);
    draw_cards(frame, state, rows[1]);
    draw_insights(frame, state, rows[2]);
    draw_filters(frame, state, rows[3]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(rows[4]);
    draw_table(frame, state, table_state, body[0]);
    draw_detail(frame, state, body[1]);

    draw_pagination(frame, state, rows[5]);

    let help = if state.form_open {
        " Tab/Shift-Tab:field  \u{2190}/\u{2192}:status  Enter:save  Esc:close"
    } else if state.searching {
        " type to search  Enter/Esc:done"
    } else {
        " j/k:select  h/l:page  /:search  f:status  L:links  o:sort  a:add  1-5/s:set status  d:delete  u:undo  e:export  r:refresh  q:quit"
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        rows[6],
    );

    if state.form_open {
        draw_form(frame, state);
    }
    if let Some(id) = state.confirm_delete {
        draw_confirm(frame, state, id);
    }
    if let Some(pending) = &state.undo {
        draw_toast(frame, &pending.company);
    }
}

fn draw_header(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let status = match state.load {
        LoadState::Idle => Span::raw(""),
        LoadState::Loading => Span::styled(" loading...", Style::default().fg(Color::Yellow)),
        LoadState::Loaded => Span::styled(" connected", Style::default().fg(Color::Green)),
        LoadState::Error => Span::styled(" offline", Style::default().fg(Color::Red)),
    };
    let line = Line::from(vec![
        Span::styled(
            " ApplyIntel Command Center ",
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        status,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_cards(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let stats = &state.stats;
    let cards = [
        ("Total Applications", stats.total.to_string()),
        ("Interviews", stats.interviews.to_string()),
        ("Offers", stats.count(Status::Offer).to_string()),
        ("Response Rate", format!("{}%", stats.response_rate_percent())),
    ];
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    for ((title, value), area) in cards.iter().zip(areas.iter()) {
        let card = Paragraph::new(Span::styled(
            value.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)));
        frame.render_widget(card, *area);
    }
}

fn draw_insights(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let data: Vec<(&str, u64)> = Status::ALL
        .iter()
        .map(|status| (status.as_str(), state.stats.count(*status)))
        .collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" Status Mix "))
        .data(data.as_slice())
        .bar_width(9)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    frame.render_widget(chart, halves[0]);

    let queue = vec![
        Line::from(format!("Due Today    {}", state.stats.due_today)),
        Line::from(format!("Saved Jobs   {}", state.stats.saved_jobs)),
        Line::from(format!("Interviews   {}", state.stats.interviews)),
    ];
    frame.render_widget(
        Paragraph::new(queue)
            .block(Block::default().borders(Borders::ALL).title(" Follow-up Queue ")),
        halves[1],
    );
}

fn draw_filters(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let filters = &state.filters;
    let search_style = if state.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let cursor = if state.searching { "_" } else { "" };
    let query = if filters.query.is_empty() && !state.searching {
        "Search company or role".to_string()
    } else {
        format!("{}{}", filters.query, cursor)
    };
    let line = Line::from(vec![
        Span::styled(format!("Search: {}", query), search_style),
        Span::raw("   "),
        Span::raw(format!("Status: {}", filters.status_label())),
        Span::raw("   "),
        Span::raw(format!("Links: {}", filters.link.label())),
        Span::raw("   "),
        Span::raw(format!("Sort: {}", filters.sort_order.label())),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" Pipeline ")),
        area,
    );
}

fn draw_table(frame: &mut Frame, state: &DashboardState, table_state: &mut TableState, area: Rect) {
    let title = match state.load {
        LoadState::Loading => " Applications (loading...) ".to_string(),
        _ => format!(" Applications ({}) ", state.applications.len()),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if state.applications.is_empty() {
        let text = if state.load == LoadState::Loading {
            "Loading..."
        } else {
            "No applications found."
        };
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let header = Row::new(["Company", "Role", "Status", "Applied", "Next Action", "Location", "Link"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = state
        .applications
        .iter()
        .map(|app| {
            Row::new(vec![
                Cell::from(app.company.clone()),
                Cell::from(app.role.clone()),
                Cell::from(Span::styled(app.status.as_str(), status_style(app.status))),
                Cell::from(format_date(Some(app.date_applied))),
                Cell::from(format_date(app.next_action_date)),
                Cell::from(or_dash(app.location.as_deref())),
                Cell::from(if app.url.is_some() { "Open" } else { "\u{2014}" }),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(18),
            Constraint::Percentage(20),
            Constraint::Length(10),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Percentage(14),
            Constraint::Length(5),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, table_state);
}

fn draw_detail(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let detail = build_detail(state, area.width.saturating_sub(2) as usize);
    frame.render_widget(
        Paragraph::new(detail)
            .block(Block::default().borders(Borders::ALL).title(" Detail "))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn build_detail(state: &DashboardState, width: usize) -> Text<'_> {
    let Some(app) = state.selected_application() else {
        return Text::raw("No application selected");
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        &app.role,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("at {}", app.company)));
    lines.push(Line::from(Span::styled(
        format!("Status: {}", app.status),
        status_style(app.status),
    )));
    lines.push(Line::from(format!("Applied: {}", format_date(Some(app.date_applied)))));
    lines.push(Line::from(format!(
        "Next action: {}",
        format_date(app.next_action_date)
    )));
    if let Some(location) = &app.location {
        lines.push(Line::from(format!("Location: {}", location)));
    }
    if let Some(url) = &app.url {
        lines.push(Line::from(format!("URL: {}", url)));
    }
    lines.push(Line::from(""));

    match &app.notes {
        Some(notes) => {
            lines.push(Line::from(Span::styled(
                "Notes",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for line in textwrap::fill(notes, width.max(10)).lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "(No notes)",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    Text::from(lines)
}

fn draw_pagination(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let mut spans = vec![Span::raw(format!(
        " Page {} of {} \u{00b7} {} records",
        state.filters.page,
        state.total_pages(),
        state.total
    ))];
    if let Some(error) = &state.error {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(error.as_str(), Style::default().fg(Color::Red)));
    } else if let Some(notice) = &state.notice {
        let color = match notice.kind {
            NoticeKind::Info => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        spans.push(Span::raw("   "));
        spans.push(Span::styled(notice.text.as_str(), Style::default().fg(color)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_form(frame: &mut Frame, state: &DashboardState) {
    let area = centered_rect(frame.area(), 60, FormField::ALL.len() as u16 + 5);
    let form = &state.form;

    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| {
            let focused = *field == form.focus;
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut value = form.value(*field);
            if focused {
                value.push(if *field == FormField::Status { ' ' } else { '_' });
            }
            Line::from(vec![
                Span::styled(format!("{:>12}: ", field.label()), label_style),
                Span::raw(value),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
    } else if state.submitting {
        lines.push(Line::from(Span::styled(
            "Saving...",
            Style::default().fg(Color::Yellow),
        )));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Add Application ")),
        area,
    );
}

fn draw_confirm(frame: &mut Frame, state: &DashboardState, id: i64) {
    let area = centered_rect(frame.area(), 56, 6);
    let target = state
        .application(id)
        .map(|app| format!("{} - {}", app.company, app.role))
        .unwrap_or_else(|| format!("#{}", id));
    let lines = vec![
        Line::from(Span::styled(target, Style::default().add_modifier(Modifier::BOLD))),
        Line::from("This will move the record to deleted. You can undo for 5 seconds."),
        Line::from(Span::styled(
            "y/Enter: confirm delete   n/Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Delete application? ")),
        area,
    );
}

fn draw_toast(frame: &mut Frame, company: &str) {
    let full = frame.area();
    let width = 44.min(full.width);
    let area = Rect {
        x: full.x + full.width.saturating_sub(width + 1),
        y: full.y + full.height.saturating_sub(5),
        width,
        height: 3.min(full.height),
    };
    let line = Line::from(vec![
        Span::raw(format!("Deleted {}. ", company)),
        Span::styled("u: Undo", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn status_style(status: Status) -> Style {
    match status {
        Status::Saved => Style::default().fg(Color::Blue),
        Status::Applied => Style::default().fg(Color::Cyan),
        Status::Interview => Style::default().fg(Color::Yellow),
        Status::Offer => Style::default().fg(Color::Magenta),
        Status::Rejected => Style::default().fg(Color::Red),
    }
}

pub fn format_date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "\u{2014}".to_string())
}

fn or_dash(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or("\u{2014}")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Application, ApplicationList, Stats};
    use ratatui::backend::TestBackend;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_state() -> DashboardState {
        let (state, _) = update(DashboardState::new(today()), Msg::Started);
        let app = Application {
            id: 42,
            company: "Acme".to_string(),
            role: "SWE".to_string(),
            location: Some("Berlin".to_string()),
            url: None,
            status: Status::Applied,
            date_applied: today(),
            next_action_date: None,
            notes: Some("Recruiter said two more rounds".to_string()),
            created_at: "2024-01-01T00:00:00".to_string(),
        };
        let generation = state.generation();
        let (state, _) = update(
            state,
            Msg::Loaded {
                generation,
                result: Ok((
                    Stats {
                        total: 1,
                        ..Default::default()
                    },
                    ApplicationList {
                        items: vec![app],
                        total: 1,
                    },
                )),
            },
        );
        state
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some(today())), "Jan 01, 2024");
        assert_eq!(format_date(None), "\u{2014}");
    }

    #[test]
    fn test_status_filter_cycles_through_all() {
        let mut filter = None;
        let mut seen = Vec::new();
        for _ in 0..6 {
            filter = next_status_filter(filter);
            seen.push(filter);
        }
        assert_eq!(
            seen,
            vec![
                Some(Status::Saved),
                Some(Status::Applied),
                Some(Status::Interview),
                Some(Status::Offer),
                Some(Status::Rejected),
                None,
            ]
        );
    }

    #[test]
    fn test_number_keys_set_status_of_selected_row() {
        let state = loaded_state();
        assert_eq!(
            key_to_msg(&state, press(KeyCode::Char('3'))),
            Some(Msg::SetStatus {
                id: 42,
                status: Status::Interview,
            })
        );
        assert_eq!(
            key_to_msg(&state, press(KeyCode::Char('d'))),
            Some(Msg::RequestDelete(42))
        );
    }

    #[test]
    fn test_row_actions_need_a_row() {
        let state = DashboardState::new(today());
        assert_eq!(key_to_msg(&state, press(KeyCode::Char('d'))), None);
        assert_eq!(key_to_msg(&state, press(KeyCode::Char('s'))), None);
    }

    #[test]
    fn test_confirm_mode_captures_keys() {
        let (state, _) = update(loaded_state(), Msg::RequestDelete(42));
        assert_eq!(
            key_to_msg(&state, press(KeyCode::Char('y'))),
            Some(Msg::ConfirmDelete)
        );
        assert_eq!(key_to_msg(&state, press(KeyCode::Esc)), Some(Msg::CancelDelete));
        assert_eq!(key_to_msg(&state, press(KeyCode::Char('q'))), None);
    }

    #[test]
    fn test_search_mode_edits_query() {
        let (mut state, _) = update(loaded_state(), Msg::StartSearch);
        state.filters.query = "ac".to_string();
        assert_eq!(
            key_to_msg(&state, press(KeyCode::Char('m'))),
            Some(Msg::QueryChanged("acm".to_string()))
        );
        assert_eq!(
            key_to_msg(&state, press(KeyCode::Backspace)),
            Some(Msg::QueryChanged("a".to_string()))
        );
        assert_eq!(key_to_msg(&state, press(KeyCode::Enter)), Some(Msg::EndSearch));
    }

    #[test]
    fn test_form_mode_routes_typing_to_form() {
        let (state, _) = update(loaded_state(), Msg::OpenForm);
        assert_eq!(
            key_to_msg(&state, press(KeyCode::Char('q'))),
            Some(Msg::Form(FormInput::Char('q')))
        );
        assert_eq!(key_to_msg(&state, press(KeyCode::Enter)), Some(Msg::SubmitForm));
        assert_eq!(key_to_msg(&state, press(KeyCode::Esc)), Some(Msg::CloseForm));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let (state, _) = update(loaded_state(), Msg::OpenForm);
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_msg(&state, key), Some(Msg::Quit));
    }

    #[test]
    fn test_draw_renders_rows_and_pagination() {
        let state = loaded_state();
        let backend = TestBackend::new(140, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut table_state = TableState::default();
        table_state.select(Some(0));
        terminal
            .draw(|frame| draw(frame, &state, &mut table_state))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Acme"));
        assert!(text.contains("Page 1 of 1"));
        assert!(text.contains("Response Rate"));
        assert!(text.contains("0%"));
    }

    #[test]
    fn test_draw_empty_page() {
        let (state, _) = update(DashboardState::new(today()), Msg::Started);
        let generation = state.generation();
        let (state, _) = update(
            state,
            Msg::Loaded {
                generation,
                result: Ok((Stats::default(), ApplicationList::default())),
            },
        );
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        let mut table_state = TableState::default();
        terminal
            .draw(|frame| draw(frame, &state, &mut table_state))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("No applications found."));
    }
}
