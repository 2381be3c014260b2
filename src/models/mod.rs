//! Core data models for Patungan
//!
//! This module contains the data structures of the bill-splitting domain:
//! the receipt and its line items, participants, split methods, payer
//! assignments and computed results.

pub mod bill;
pub mod ids;
pub mod money;
pub mod participant;
pub mod split;

pub use bill::{BillRecord, BillValidationError, ItemEdit, LineItem};
pub use ids::ItemId;
pub use money::Money;
pub use participant::{Participant, ParticipantValidationError, DEFAULT_PARTICIPANT};
pub use split::{ItemAssignment, ResultSet, SplitMethod, SplitOutcome, UnassignedItemWarning};
