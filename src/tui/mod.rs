//! Terminal User Interface module
//!
//! The interactive five-step wizard: upload a receipt, fix the bill, list
//! who is sharing, choose how to split and see what everyone owes.

pub mod app;
pub mod event;
pub mod handler;
pub mod terminal;

// Views
pub mod views;

// Widgets
pub mod widgets;

// Dialogs
pub mod dialogs;

// Layout
pub mod layout;

pub use app::App;
pub use terminal::run_tui;
