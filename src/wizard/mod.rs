//! The five-step bill-splitting wizard
//!
//! Upload, Edit, Friends, Split, Result. [`WizardState`] enforces the step
//! rules; [`WizardController`] is what front ends talk to.

pub mod controller;
pub mod state;
pub mod step;

pub use controller::WizardController;
pub use state::WizardState;
pub use step::Step;
