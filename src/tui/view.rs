//! Rendering of the three panes, the overlays and the toasts.

use chrono::{Local, NaiveDate};
use log::error;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::app::{App, Form, LoginField, Pane, TaskField, Theme, ToastKind};
use crate::input::format_due_date;

/// Days before a deadline at which it is highlighted as close.
const DEADLINE_WARN_DAYS: i64 = 3;
const TOAST_WIDTH: u16 = 40;

struct Palette {
    base: Style,
    muted: Style,
    accent: Color,
    cursor: Style,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            base: Style::default().fg(Color::Black).bg(Color::White),
            muted: Style::default().fg(Color::DarkGray),
            accent: Color::Blue,
            cursor: Style::default().bg(Color::Gray),
        },
        Theme::Dark => Palette {
            base: Style::default().fg(Color::Gray).bg(Color::Black),
            muted: Style::default().fg(Color::DarkGray),
            accent: Color::Cyan,
            cursor: Style::default().bg(Color::DarkGray),
        },
    }
}

pub fn render(frame: &mut Frame, app: &App) {
    let pal = palette(app.theme);
    frame.render_widget(Block::default().style(pal.base), frame.area());

    let [main, footer] = Layout::vertical([Constraint::Min(3), Constraint::Length(1)])
        .areas(frame.area());
    let [manager, list, task] = Layout::horizontal([
        Constraint::Percentage(25),
        Constraint::Percentage(35),
        Constraint::Percentage(40),
    ])
    .areas(main);

    render_manager(frame, app, &pal, manager);
    render_list(frame, app, &pal, list);
    render_task(frame, app, &pal, task);
    frame.render_widget(
        Paragraph::new(" ? help  a task  L list  x done  d delete  t theme  q quit")
            .style(pal.muted),
        footer,
    );

    if app.login_visible() {
        render_login(frame, app, &pal);
    } else if let Some(form) = &app.form {
        render_form(frame, app, &pal, form);
    }
    if app.show_help {
        render_help(frame, &pal);
    }
    render_toasts(frame, app);
}

fn pane_block<'a>(title: String, focused: bool, pal: &Palette) -> Block<'a> {
    let border = if focused {
        Style::default().fg(pal.accent)
    } else {
        pal.muted
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {title} "))
}

/// Lists with their task-count badges.
fn render_manager(frame: &mut Frame, app: &App, pal: &Palette, area: Rect) {
    let selected = app.selected_list().map(|l| l.id());
    let items: Vec<ListItem> = app
        .manager
        .lists()
        .iter()
        .map(|list| {
            let name_style = if Some(list.id()) == selected {
                Style::default().fg(pal.accent).bold()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(list.name.clone(), name_style),
                Span::raw(" "),
                Span::styled(format!("[{}]", list.len()), pal.muted),
            ]))
        })
        .collect();

    let focused = app.focus == Pane::Manager;
    let widget = List::new(items)
        .block(pane_block(app.strings().lists.to_string(), focused, pal))
        .highlight_style(if focused { pal.cursor } else { Style::default() });
    let mut state = ListState::default().with_selected(
        (!app.manager.lists().is_empty()).then_some(app.manager_cursor),
    );
    frame.render_stateful_widget(widget, area, &mut state);
}

/// Tasks of the selected list with done and priority badges.
fn render_list(frame: &mut Frame, app: &App, pal: &Palette, area: Rect) {
    let strings = app.strings();
    let focused = app.focus == Pane::List;
    let Some(list) = app.selected_list() else {
        if !app.manager.lists().is_empty() {
            error!("list view rendered without a selected list");
        }
        let placeholder = Paragraph::new(strings.select_list)
            .style(pal.muted)
            .block(pane_block(strings.tasks.to_string(), focused, pal));
        frame.render_widget(placeholder, area);
        return;
    };

    let selected = app.selected_task().map(|t| t.id());
    let items: Vec<ListItem> = list
        .tasks()
        .iter()
        .map(|task| {
            let done_style = if task.done {
                Style::default().fg(Color::Green)
            } else {
                pal.muted
            };
            let mut name_style = Style::default();
            if task.done {
                name_style = name_style.crossed_out();
            }
            if Some(task.id()) == selected {
                name_style = name_style.fg(pal.accent).bold();
            }
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", task.icon()), done_style),
                Span::styled(task.name.clone(), name_style),
                Span::raw(" "),
                Span::styled(format!("[{}]", task.lvl), done_style),
            ]))
        })
        .collect();

    let widget = List::new(items)
        .block(pane_block(list.name.clone(), focused, pal))
        .highlight_style(if focused { pal.cursor } else { Style::default() });
    let mut state =
        ListState::default().with_selected((!list.is_empty()).then_some(app.list_cursor));
    frame.render_stateful_widget(widget, area, &mut state);
}

/// Details of the selected task.
fn render_task(frame: &mut Frame, app: &App, pal: &Palette, area: Rect) {
    let strings = app.strings();
    let block = pane_block(strings.task_view.to_string(), false, pal);
    let (Some(list), Some(task)) = (app.selected_list(), app.selected_task()) else {
        if app.selected_list().is_some() {
            error!("task view rendered without a selected task");
        }
        let placeholder = Paragraph::new(strings.select_task)
            .style(pal.muted)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let mut title_style = Style::default().bold();
    if task.done {
        title_style = title_style.fg(Color::Green).crossed_out();
    }
    let deadline = match task.date {
        Some(date) => Span::styled(
            format_due_date(date),
            deadline_style(date, Local::now().date_naive(), app.date_alert),
        ),
        None => Span::raw(strings.no_deadline),
    };

    let text = vec![
        Line::from(Span::styled(task.name.clone(), title_style)),
        Line::raw(""),
        Line::raw(task.description.clone()),
        Line::raw(""),
        Line::from(vec![
            Span::styled(format!("{}: ", strings.importance), pal.muted),
            Span::raw(task.lvl.to_string()),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", strings.deadline), pal.muted),
            deadline,
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            format!("#{}", list.name),
            Style::default().fg(pal.accent),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

/// Deadline colouring, active only when the server enables date alerts.
pub fn deadline_style(date: NaiveDate, today: NaiveDate, alert: bool) -> Style {
    if !alert {
        return Style::default();
    }
    let days_left = (date - today).num_days();
    if days_left < 0 {
        Style::default().fg(Color::Red).bold()
    } else if days_left <= DEADLINE_WARN_DAYS {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Green)
    }
}

/// Center a rectangle within an area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn field_line<'a>(label: &str, value: String, focused: bool, pal: &Palette) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::default().fg(pal.accent).bold()
    } else {
        pal.muted
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{label}: "), label_style),
        Span::raw(value),
        Span::raw(cursor),
    ])
}

fn render_overlay(frame: &mut Frame, title: &str, lines: Vec<Line>, width: u16, pal: &Palette) {
    let height = lines.len() as u16 + 2;
    let area = centered_rect(width, height, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .border_style(Style::default().fg(pal.accent))
        .style(pal.base);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_login(frame: &mut Frame, app: &App, pal: &Palette) {
    let Some(form) = app.login_form() else {
        return;
    };
    let strings = app.strings();
    let focused = form.focused;
    let masked = "*".repeat(form.password.chars().count());
    let lines = vec![
        field_line(
            strings.login,
            form.login.clone(),
            focused == LoginField::Login,
            pal,
        ),
        field_line(
            strings.password,
            masked,
            focused == LoginField::Password,
            pal,
        ),
    ];
    render_overlay(frame, strings.login_title, lines, 44, pal);
}

fn render_form(frame: &mut Frame, app: &App, pal: &Palette, form: &Form) {
    let strings = app.strings();
    match form {
        Form::Task(form) => {
            let fields = [
                (TaskField::Name, strings.name, &form.name),
                (TaskField::Description, strings.description, &form.description),
                (TaskField::Priority, strings.priority, &form.priority),
                (TaskField::Date, strings.date, &form.date),
            ];
            let lines = fields
                .into_iter()
                .map(|(field, label, value)| {
                    field_line(label, value.clone(), form.focused == field, pal)
                })
                .collect();
            render_overlay(frame, strings.new_task, lines, 60, pal);
        }
        Form::List(name) => {
            let lines = vec![field_line(strings.name, name.clone(), true, pal)];
            render_overlay(frame, strings.new_list, lines, 44, pal);
        }
    }
}

fn render_help(frame: &mut Frame, pal: &Palette) {
    let bindings = [
        ("j/k", "move"),
        ("Tab h l", "switch pane"),
        ("Enter", "open list / task"),
        ("a", "new task"),
        ("L", "new list"),
        ("x", "mark done"),
        ("d", "delete task"),
        ("D", "delete list"),
        ("r", "reload from server"),
        ("t", "switch theme"),
        ("q", "quit"),
    ];
    let lines = bindings
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:<10}"), Style::default().fg(pal.accent)),
                Span::raw(*what),
            ])
        })
        .collect();
    render_overlay(frame, "Help", lines, 40, pal);
}

/// Toasts stack upwards from the bottom-right corner.
fn render_toasts(frame: &mut Frame, app: &App) {
    let term = frame.area();
    let width = TOAST_WIDTH.min(term.width);
    let mut bottom = term.bottom().saturating_sub(1);
    for toast in app.notifications.iter().collect::<Vec<_>>().into_iter().rev() {
        if bottom < term.y + 3 {
            break;
        }
        let area = Rect::new(term.right().saturating_sub(width), bottom - 3, width, 3);
        let color = match toast.kind {
            ToastKind::Info => Color::Blue,
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
        };
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(toast.message.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
            area,
        );
        bottom -= 3;
    }
}
