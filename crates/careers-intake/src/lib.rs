//! Careers intake form library: value bags, declarative validation rule
//! sets, form-session state, and simulated asynchronous submission for the
//! experienced-hire application and login forms.

pub mod config;
pub mod error;
pub mod forms;
pub mod telemetry;
