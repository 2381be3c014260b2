//! Progress header
//!
//! Gauge for how far the wizard is, with the five step labels below it.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::tui::app::App;
use crate::wizard::{Step, WizardState};

/// Render the progress header
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let state = app.controller.state();
    let block = Block::default()
        .title(" Patungan ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(ratio(state))
        .label(format!("Step {} of {}", state.step().number(), Step::ALL.len()));
    frame.render_widget(gauge, rows[0]);

    frame.render_widget(Paragraph::new(step_labels(state)), rows[1]);
}

/// Share of the wizard behind the user, counting the current step
fn ratio(state: &WizardState) -> f64 {
    f64::from(state.step().number()) / Step::ALL.len() as f64
}

fn step_labels(state: &WizardState) -> Line<'static> {
    let mut spans = Vec::new();
    for step in Step::ALL {
        let (marker, style) = if step == state.step() {
            (
                ">",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else if state.is_completed(step) {
            ("✓", Style::default().fg(Color::Green))
        } else {
            (" ", Style::default().fg(Color::DarkGray))
        };
        spans.push(Span::styled(
            format!(" {} {} {}  ", marker, step.number(), step.title()),
            style,
        ));
    }
    Line::from(spans)
}
