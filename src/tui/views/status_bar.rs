//! Status bar view
//!
//! Shows the current step, the bill total and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::models::SplitMethod;
use crate::tui::app::App;
use crate::wizard::Step;

/// Short key hints for the current step
fn hints(step: Step) -> &'static str {
    match step {
        Step::Upload => " Enter:Read  Esc:Clear  F1:Help  Ctrl+c:Quit ",
        Step::Edit => " a:Add  e:Edit  d:Del  n:Next  b:Back  ?:Help ",
        Step::Friends => " a:Add  r:Rename  d:Del  n:Next  b:Back  ?:Help ",
        Step::Split => " e/p:Method  Space:Toggle  n:Result  b:Back  ?:Help ",
        Step::Result => " r:Start over  b:Back  q:Quit  ?:Help ",
    }
}

/// Render the status bar
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let state = app.controller.state();
    let step = state.step();

    let mut spans = vec![Span::styled(
        format!(" {}/{} {} ", step.number(), Step::ALL.len(), step.title()),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(bill) = state.bill() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            bill.total_amount().format_with_symbol(app.currency()),
            Style::default().fg(Color::Green),
        ));
    }

    let people = state.participants().len();
    spans.push(Span::raw(" │ "));
    spans.push(Span::styled(
        format!("{} {}", people, if people == 1 { "person" } else { "people" }),
        Style::default().fg(Color::White),
    ));

    if let Some(method) = state.split_method() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(method.to_string(), Style::default().fg(Color::Cyan)));
    }

    let unassigned = match state.split_method() {
        Some(SplitMethod::PerItem) => app.controller.unassigned_items().len(),
        _ => 0,
    };
    if unassigned > 0 {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("{} unassigned", unassigned),
            Style::default().fg(Color::Yellow),
        ));
    }

    // Key hints (right-aligned)
    let hints = hints(step);
    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize).saturating_sub(left_len + hints.len());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_fit_narrow_terminals() {
        for step in Step::ALL {
            assert!(hints(step).len() < 60, "{} hints too long", step);
        }
    }
}
