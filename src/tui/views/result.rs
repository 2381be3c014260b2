//! Result step view
//!
//! What everyone owes, with warnings for items nobody was assigned to.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::export::SplitReport;
use crate::models::{Money, SplitMethod};
use crate::tui::app::App;
use crate::wizard::Step;

use super::{step_block, truncate_string};

/// Render the computed split
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = step_block(Step::Result, "Who owes what");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let state = app.controller.state();
    let (Some(bill), Some(method)) = (state.bill(), state.split_method()) else {
        return;
    };
    let report = SplitReport::new(bill, method, state.outcome(), app.currency());
    let notes = note_lines(&report);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(notes.len() as u16 + 1),
        ])
        .split(inner);

    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", display_merchant(&report.merchant_name)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("({})", report.method), Style::default().fg(Color::DarkGray)),
        Span::raw(format!("  Bill total: {}", report.money(report.bill_total))),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    render_shares(frame, &report, chunks[1]);
    frame.render_widget(Paragraph::new(notes), chunks[2]);
}

fn display_merchant(name: &str) -> &str {
    if name.is_empty() {
        "Your bill"
    } else {
        name
    }
}

fn render_shares(frame: &mut Frame, report: &SplitReport, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));

    if report.shares.is_empty() {
        frame.render_widget(
            Paragraph::new("Nothing to split.")
                .block(block)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("Participant").style(bold),
        Cell::from("Owes").style(bold),
    ])
    .style(Style::default().fg(Color::Yellow));

    let rows: Vec<Row> = report
        .shares
        .iter()
        .map(|share| {
            Row::new(vec![
                Cell::from(truncate_string(&share.participant, 30)),
                Cell::from(format!("{:>18}", report.money(share.amount)))
                    .style(Style::default().fg(Color::Green)),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(32), Constraint::Length(20)])
        .header(header)
        .block(block);
    frame.render_widget(table, area);
}

fn note_lines(report: &SplitReport) -> Vec<Line<'static>> {
    let warning = Style::default().fg(Color::Yellow);
    let mut lines: Vec<Line<'static>> = report
        .unassigned
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!(
                    " ! Item '{}' has not been assigned to anyone ({})",
                    item.item,
                    report.money(item.amount)
                ),
                warning,
            ))
        })
        .collect();

    let undistributed = report.undistributed();
    if report.method == SplitMethod::PerItem
        && undistributed.is_positive()
        && !undistributed.approx_eq(Money::zero())
    {
        lines.push(Line::from(Span::styled(
            format!(" Not covered by any share: {}", report.money(undistributed)),
            warning,
        )));
    }

    lines.push(Line::from(Span::styled(
        " b: back to split  r: start over  q: quit",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::json::tests::sample_report;

    #[test]
    fn test_notes_list_unassigned_items() {
        let lines = note_lines(&sample_report());
        let text: Vec<String> = lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.to_string()).collect())
            .collect();

        assert!(text[0].contains("Item 'Snack' has not been assigned to anyone (Rp 5,000.00)"));
        assert!(text[1].contains("Not covered by any share: Rp 5,000.00"));
        assert_eq!(text.len(), 3);
    }

    #[test]
    fn test_even_split_has_no_coverage_note() {
        let mut report = sample_report();
        report.method = SplitMethod::Even;
        report.unassigned.clear();
        assert_eq!(note_lines(&report).len(), 1);
    }
}
