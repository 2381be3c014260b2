//! Friends step view

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::tui::app::App;
use crate::tui::layout::StepLayout;
use crate::wizard::Step;

use super::{step_block, truncate_string};

/// Render the participant list
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = step_block(Step::Friends, "Who is sharing?");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = StepLayout::new(inner, 2);

    let participants = app.controller.state().participants();
    let summary = match participants.len() {
        0 => Line::from(Span::styled(
            " Add at least one person with 'a' before splitting.",
            Style::default().fg(Color::Yellow),
        )),
        n => Line::from(format!(
            " {} {} sharing this bill",
            n,
            if n == 1 { "person" } else { "people" }
        )),
    };
    frame.render_widget(Paragraph::new(summary), layout.summary);

    let items: Vec<ListItem> = participants
        .iter()
        .enumerate()
        .map(|(i, participant)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>3}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(truncate_string(participant.name(), 50)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !participants.is_empty() {
        state.select(Some(app.selected_participant));
    }
    frame.render_stateful_widget(list, layout.body, &mut state);
}
