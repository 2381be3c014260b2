//! Patungan - split a restaurant bill from a photo of the receipt
//!
//! The library behind the `patungan` binary. A vision model reads the line
//! items, tax and service charge off a receipt image; the user corrects the
//! result, lists who is sharing and picks an even or per-item split.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, user settings and extraction service credentials
//! - `error`: Custom error types
//! - `models`: Bills, line items, participants and split results
//! - `gateway`: Receipt image to bill extraction (OpenRouter and mock)
//! - `services`: The split engine
//! - `wizard`: The five-step session state machine and its controller
//! - `export`: Split reports in CSV, JSON and YAML
//! - `display`: Plain-text tables for the command line
//! - `cli`: Non-interactive command handlers
//! - `tui`: The interactive terminal wizard
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use patungan::config::Settings;
//! use patungan::gateway::{MockGateway, ReceiptImage};
//! use patungan::wizard::WizardController;
//!
//! let mut controller =
//!     WizardController::from_settings(Arc::new(MockGateway::demo()), &Settings::default());
//! controller.submit_receipt(&ReceiptImage::from_path("receipt.jpg")?).await?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod services;
pub mod tui;
pub mod wizard;

pub use error::{PatunganError, PatunganResult};
