//! Dialog modules for the TUI
//!
//! Modal dialogs for editing the bill and participants, confirmations and
//! help.

pub mod confirm;
pub mod help;
pub mod item;
pub mod prompt;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::widgets::TextInput;

/// Render a labelled text field, drawing the cursor when focused
pub(crate) fn render_text_field(frame: &mut Frame, area: Rect, input: &TextInput, focused: bool) {
    let label_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let value_style = Style::default().fg(Color::White);

    let mut spans = vec![Span::styled(format!("{:<11}", format!("{}:", input.label)), label_style)];

    if focused {
        let cursor = input.cursor();
        let before: String = input.value().chars().take(cursor).collect();
        let mut after = input.value().chars().skip(cursor);
        let cursor_char = after.next().unwrap_or(' ');
        let rest: String = after.collect();

        spans.push(Span::styled(before, value_style));
        spans.push(Span::styled(
            cursor_char.to_string(),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
        spans.push(Span::styled(rest, value_style));
    } else if input.is_empty() {
        spans.push(Span::styled(
            input.placeholder.as_str(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(input.value(), value_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// "[Enter] Save  [Esc] Cancel" plus any extra hints
pub(crate) fn form_hints(extra: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ];
    for (key, action) in extra {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(format!(" {}", action)));
    }
    Line::from(spans)
}
