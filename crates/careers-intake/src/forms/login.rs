//! The login form: e-mail plus a composite-class password rule.

use super::definition::{ControlKind, FieldSpec, FormDefinition};
use super::rules::{CharacterClassRule, Constraint, FieldRules, RuleSet};

/// Field names, matching the serialized payload keys.
pub mod fields {
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
}

/// Special characters a password may (and must, at least once) contain.
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

pub const PASSWORD_MIN_LENGTH: usize = 8;

/// The complete login form.
pub fn definition() -> FormDefinition {
    FormDefinition {
        name: "login".to_string(),
        title: "Login".to_string(),
        fields: vec![
            FieldSpec::new(fields::EMAIL, "Email", ControlKind::TextLine)
                .placeholder("user@example.com"),
            FieldSpec::new(fields::PASSWORD, "Password", ControlKind::Secret),
        ],
        rules: rule_set(),
    }
}

pub fn rule_set() -> RuleSet {
    RuleSet::new(vec![
        FieldRules::new(
            fields::EMAIL,
            vec![
                Constraint::Required {
                    message: "Email is required".to_string(),
                },
                Constraint::Email {
                    message: "Invalid email".to_string(),
                },
            ],
        ),
        FieldRules::new(
            fields::PASSWORD,
            vec![
                Constraint::Required {
                    message: "Password is required".to_string(),
                },
                Constraint::MinLength {
                    min: PASSWORD_MIN_LENGTH,
                    message: "Password must be at least 8 characters".to_string(),
                },
                Constraint::CharacterClasses(CharacterClassRule {
                    require_lowercase: true,
                    require_uppercase: true,
                    require_digit: true,
                    specials: PASSWORD_SPECIALS.to_string(),
                    message: "Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character".to_string(),
                }),
            ],
        ),
    ])
}
