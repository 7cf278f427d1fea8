//! Form state, declarative validation, and simulated submission.
//!
//! The value bag ([`FormValues`]) holds whatever the user has typed or
//! selected; the rule set ([`RuleSet`]) is plain data that derives an
//! [`ErrorMap`] from it; the session ([`FormSession`]) layers touched
//! tracking and the submitting flag on top; and the [`Submitter`] models the
//! network round trip with a fixed delay before echoing the serialized bag.

pub mod application;
pub mod definition;
pub mod login;
pub mod rules;
pub mod session;
pub mod submit;
pub mod value;

#[cfg(test)]
mod tests;

pub use definition::{ControlKind, FieldSpec, FormDefinition};
pub use rules::{
    CharacterClassRule, Condition, Constraint, ErrorMap, FieldRules, NumericRule, RuleSet,
};
pub use session::FormSession;
pub use submit::{
    EchoSink, MemorySink, SinkError, SubmissionReceipt, SubmissionSink, SubmitError, Submitter,
};
pub use value::{FieldValue, FileRef, FormValues};
