//! ratatui view for a form session: labeled controls, inline errors gated on
//! touched state, the submit control, and the submitted-data panel.

use careers_intake::forms::{ControlKind, ErrorMap, FieldSpec};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{Focus, FormApp};

const MAX_SUGGESTIONS_SHOWN: usize = 6;

fn label_style(focused: bool) -> Style {
    if focused {
        Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::new().add_modifier(Modifier::BOLD)
    }
}

fn error_style() -> Style {
    Style::new().fg(Color::Red)
}

fn hint_style() -> Style {
    Style::new().fg(Color::DarkGray)
}

pub(crate) fn draw(frame: &mut Frame, app: &FormApp) {
    let [title_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let title = Line::from(Span::styled(
        app.session().definition().title.clone(),
        Style::new().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(title), title_area);

    match app.receipt() {
        Some(receipt) => {
            let [form_area, receipt_area] =
                Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .areas(body_area);
            render_form(frame, form_area, app);

            let panel = Paragraph::new(receipt.pretty())
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title("Submitted Data"));
            frame.render_widget(panel, receipt_area);
        }
        None => render_form(frame, body_area, app),
    }

    frame.render_widget(
        Paragraph::new(app.status().to_string()).style(hint_style()),
        status_area,
    );
}

fn render_form(frame: &mut Frame, area: Rect, app: &FormApp) {
    let errors = app.session().visible_errors();
    let mut lines: Vec<Line> = Vec::new();
    let mut focused_line = 0usize;

    for field in app.visible_fields() {
        let focused = app.focus() == &Focus::Field(field.key.clone());
        if focused {
            focused_line = lines.len();
        }
        field_lines(app, &field, focused, &errors, &mut lines);
    }

    lines.push(Line::default());
    let submit_focused = app.focus() == &Focus::Submit;
    if submit_focused {
        focused_line = lines.len();
    }
    lines.push(submit_line(app.session().is_submitting(), submit_focused));

    let block = Block::bordered();
    let inner_height = area.height.saturating_sub(2).max(1) as usize;
    let scroll = focused_line.saturating_sub(inner_height.saturating_sub(2)) as u16;

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn submit_line(submitting: bool, focused: bool) -> Line<'static> {
    let (text, mut style) = if submitting {
        ("[ Submitting ]", hint_style())
    } else {
        ("[ Submit ]", Style::new().add_modifier(Modifier::BOLD))
    };
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Line::from(Span::styled(text, style))
}

fn field_lines(
    app: &FormApp,
    field: &FieldSpec,
    focused: bool,
    errors: &ErrorMap,
    lines: &mut Vec<Line<'static>>,
) {
    let label = Span::styled(format!("{}: ", field.label), label_style(focused));

    match &field.control {
        ControlKind::TextArea => {
            lines.push(Line::from(label));
            let text = app
                .session()
                .values()
                .text(&field.key)
                .unwrap_or_default()
                .to_string();
            let rendered = if focused {
                with_cursor(&text, app.cursor(&field.key))
            } else {
                text
            };
            if rendered.is_empty() {
                lines.push(Line::from(Span::styled("  (empty)", hint_style())));
            } else {
                for row in rendered.split('\n') {
                    lines.push(Line::from(format!("  {row}")));
                }
            }
        }
        ControlKind::Select { .. } => {
            let value = app.session().values().text(&field.key);
            let rendered = match value {
                Some(selected) if focused => format!("< {selected} >"),
                Some(selected) => selected.to_string(),
                None => "(select an option)".to_string(),
            };
            let style = if value.is_none() {
                hint_style()
            } else {
                Style::new()
            };
            lines.push(Line::from(vec![label, Span::styled(rendered, style)]));
        }
        ControlKind::TagPicker { suggestions } => {
            let mut spans = vec![label];
            if let Some(tags) = app.session().values().tags(&field.key) {
                for tag in tags {
                    spans.push(Span::styled(
                        format!("[{tag}] "),
                        Style::new().fg(Color::Green),
                    ));
                }
            }
            let draft = app.tag_draft(&field.key);
            if focused {
                spans.push(Span::raw(format!("{draft}\u{2581}")));
            } else if !draft.is_empty() {
                spans.push(Span::raw(draft.to_string()));
            }
            lines.push(Line::from(spans));
            if focused && !suggestions.is_empty() {
                let shown: Vec<&str> = suggestions
                    .iter()
                    .take(MAX_SUGGESTIONS_SHOWN)
                    .map(String::as_str)
                    .collect();
                lines.push(Line::from(Span::styled(
                    format!("  suggestions: {}", shown.join(", ")),
                    hint_style(),
                )));
            }
        }
        ControlKind::Secret => {
            let count = app
                .session()
                .values()
                .text(&field.key)
                .map(|text| text.chars().count())
                .unwrap_or(0);
            let mut masked = "\u{2022}".repeat(count);
            if focused {
                masked.push('\u{2581}');
            }
            lines.push(Line::from(vec![label, Span::raw(masked)]));
        }
        _ => {
            let text = field_text(app, field);
            let (rendered, style) = if text.is_empty() && !focused {
                let placeholder = field.placeholder.clone().unwrap_or_default();
                (placeholder, hint_style())
            } else if focused {
                (with_cursor(&text, app.cursor(&field.key)), Style::new())
            } else {
                (text, Style::new())
            };
            lines.push(Line::from(vec![label, Span::styled(rendered, style)]));
        }
    }

    if let Some(message) = errors.get(&field.key) {
        lines.push(Line::from(Span::styled(
            format!("  {message}"),
            error_style(),
        )));
    }
}

fn field_text(app: &FormApp, field: &FieldSpec) -> String {
    match field.control {
        ControlKind::FilePicker => app
            .session()
            .values()
            .file(&field.key)
            .map(|reference| reference.path.display().to_string())
            .unwrap_or_default(),
        _ => app
            .session()
            .values()
            .text(&field.key)
            .unwrap_or_default()
            .to_string(),
    }
}

/// Mark the cursor position with a low-block glyph.
fn with_cursor(text: &str, cursor: usize) -> String {
    let cursor = cursor.min(text.chars().count());
    let byte = text
        .char_indices()
        .nth(cursor)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len());
    let mut rendered = text.to_string();
    rendered.insert(byte, '\u{2581}');
    rendered
}
