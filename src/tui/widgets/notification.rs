//! Toast notification widget
//!
//! Short-lived messages in the top-right corner: extraction results,
//! rejected step changes and unassigned-item warnings.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationType {
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Info => " i Info ",
            Self::Success => " + Done ",
            Self::Warning => " ! Warning ",
            Self::Error => " x Error ",
        }
    }

    /// Errors and warnings stay up longer than confirmations
    fn lifetime(&self) -> Duration {
        match self {
            Self::Info | Self::Success => Duration::from_secs(3),
            Self::Warning | Self::Error => Duration::from_secs(6),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    created_at: Instant,
    lifetime: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            created_at: Instant::now(),
            lifetime: notification_type.lifetime(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Error)
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.lifetime
    }
}

pub struct NotificationWidget<'a> {
    notification: &'a Notification,
}

impl<'a> NotificationWidget<'a> {
    pub fn new(notification: &'a Notification) -> Self {
        Self { notification }
    }

    /// Toast area in the top-right corner of `frame_area`
    pub fn area(frame_area: Rect) -> Rect {
        let width = 48u16.min(frame_area.width);
        let height = 5u16.min(frame_area.height);
        Rect::new(
            frame_area.x + frame_area.width - width,
            frame_area.y + 1u16.min(frame_area.height - height),
            width,
            height,
        )
    }
}

impl Widget for NotificationWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = self.notification.notification_type;
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(kind.color()))
            .title(kind.title())
            .title_style(Style::default().fg(kind.color()).add_modifier(Modifier::BOLD));

        Paragraph::new(self.notification.message.as_str())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

/// Notifications waiting to be shown, oldest first
#[derive(Debug, Default)]
pub struct NotificationQueue {
    notifications: VecDeque<Notification>,
}

impl NotificationQueue {
    const MAX_QUEUED: usize = 5;

    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification, dropping the oldest one when the queue is full
    pub fn push(&mut self, notification: Notification) {
        if self.notifications.len() == Self::MAX_QUEUED {
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
    }

    /// Drop the front notification once it has been shown long enough
    pub fn remove_expired(&mut self) {
        while self.notifications.front().is_some_and(Notification::is_expired) {
            self.notifications.pop_front();
        }
    }

    pub fn dismiss(&mut self) {
        self.notifications.pop_front();
    }

    pub fn current(&self) -> Option<&Notification> {
        self.notifications.front()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_order_and_capacity() {
        let mut queue = NotificationQueue::new();
        assert!(queue.is_empty());

        for i in 0..7 {
            queue.push(Notification::info(format!("n{}", i)));
        }
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.current().unwrap().message, "n2");

        queue.dismiss();
        assert_eq!(queue.current().unwrap().message, "n3");
    }

    #[test]
    fn test_expired_notifications_are_removed() {
        let mut queue = NotificationQueue::new();
        queue.push(Notification::error("gone").with_lifetime(Duration::ZERO));
        queue.push(Notification::success("stays"));

        queue.remove_expired();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.current().unwrap().message, "stays");
    }

    #[test]
    fn test_errors_outlive_confirmations() {
        assert!(NotificationType::Error.lifetime() > NotificationType::Success.lifetime());
        assert_eq!(NotificationType::Warning.color(), Color::Yellow);
    }

    #[test]
    fn test_toast_area_fits_small_frames() {
        let area = NotificationWidget::area(Rect::new(0, 0, 30, 4));
        assert_eq!(area.width, 30);
        assert_eq!(area.height, 4);
        assert_eq!(area.y, 0);
    }
}
