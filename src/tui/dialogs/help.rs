//! Help dialog
//!
//! Shows the keys of the current step

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::App;
use crate::tui::layout::centered_rect;
use crate::wizard::Step;

/// Render the help dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_lines(app.step()))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Keys available on `step`
pub fn step_keys(step: Step) -> &'static [(&'static str, &'static str)] {
    match step {
        Step::Upload => &[
            ("Enter", "Read the receipt (or continue with the current bill)"),
            ("Esc", "Clear the path"),
            ("Ctrl+u", "Clear the path"),
        ],
        Step::Edit => &[
            ("j/k", "Move between items"),
            ("a", "Add an item"),
            ("e/Enter", "Edit the selected item"),
            ("d", "Remove the selected item"),
            ("m", "Set the merchant name"),
            ("t", "Set the tax"),
            ("s", "Set the service charge"),
            ("n", "Next: friends"),
            ("b", "Back to upload"),
        ],
        Step::Friends => &[
            ("j/k", "Move between friends"),
            ("a", "Add a friend"),
            ("r/Enter", "Rename the selected friend"),
            ("d", "Remove the selected friend"),
            ("n", "Next: split"),
            ("b", "Back to edit"),
        ],
        Step::Split => &[
            ("e", "Split evenly"),
            ("p", "Split per item"),
            ("j/k", "Move between items"),
            ("h/l", "Move between friends"),
            ("Space", "Toggle who pays for the item"),
            ("A", "Everyone pays for the item"),
            ("n", "Show the result"),
            ("b", "Back to friends"),
        ],
        Step::Result => &[
            ("b", "Back to split"),
            ("r", "Start over"),
            ("q", "Quit"),
        ],
    }
}

fn help_lines(step: Step) -> Vec<Line<'static>> {
    let mut lines = vec![
        section("Global Keys"),
        Line::from(""),
        key_line("q", "Quit (not while typing)"),
        key_line("?/F1", "Show/hide help"),
        key_line("Ctrl+c", "Quit immediately"),
        Line::from(""),
        section(match step {
            Step::Upload => "1. Upload",
            Step::Edit => "2. Edit the bill",
            Step::Friends => "3. Friends",
            Step::Split => "4. Split",
            Step::Result => "5. Result",
        }),
        Line::from(""),
    ];
    lines.extend(step_keys(step).iter().map(|(key, desc)| key_line(key, desc)));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )]));
    lines
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    )])
}

/// Create a formatted key line
fn key_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>12}", key), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(description.to_string(), Style::default().fg(Color::White)),
    ])
}
