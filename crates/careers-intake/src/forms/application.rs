//! The experienced-hire application form: field specs, option lists, and the
//! declarative rule set.

use super::definition::{ControlKind, FieldSpec, FormDefinition};
use super::rules::{Condition, Constraint, FieldRules, NumericRule, RuleSet};
use super::value::FieldValue;

/// Field names, matching the serialized payload keys.
pub mod fields {
    pub const DOB: &str = "dob";
    pub const TOTAL_EXPERIENCE: &str = "totalExperience";
    pub const RELEVANT_EXPERIENCE: &str = "relevantExperience";
    pub const ACCOMPLISHMENTS: &str = "accomplishments";
    pub const HIGHEST_EDUCATION: &str = "highestEducation";
    pub const OTHER_EDUCATION: &str = "otherEducation";
    pub const TECHNICAL_SKILLS: &str = "technicalSkills";
    pub const SOFT_SKILLS: &str = "softSkills";
    pub const RESUME: &str = "resume";
    pub const EXPECTED_CTC: &str = "expectedCTC";
    pub const CURRENT_CTC: &str = "currentCTC";
    pub const NOTICE_PERIOD: &str = "noticePeriod";
}

/// Education selection that reveals and requires the free-text field.
pub const EDUCATION_OTHER: &str = "Other";
/// Education selection that reveals and requires the technical-skill list.
/// Note this reuses an education *level* value as the skill-set gate, as the
/// product rules currently demand.
pub const EDUCATION_TECHNICAL: &str = "Technical";

pub const EXPERIENCE_CEILING: f64 = 50.0;
/// Two crores, the compensation cap.
pub const CTC_CEILING: f64 = 20_000_000.0;

pub fn education_levels() -> Vec<String> {
    [
        "High School",
        "Undergraduate",
        "Graduate",
        "Post Graduate",
        "Doctorate",
        EDUCATION_TECHNICAL,
        EDUCATION_OTHER,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub fn soft_skill_suggestions() -> Vec<String> {
    [
        "Communication",
        "Teamwork",
        "Problem Solving",
        "Time Management",
        "Leadership",
        "Adaptability",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub fn technical_skill_suggestions() -> Vec<String> {
    [
        "Python",
        "Java",
        "Javascript",
        "C",
        "C++",
        "Kotlin",
        "React",
        "Next Js",
        "MySQL",
        "MongoDB",
        "PostgreSQL",
        "Amazon Web Service(AWS)",
        "Microsoft Azure",
        "Google Cloud Platform (GCP)",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn other_education_condition() -> Condition {
    Condition::field_equals(fields::HIGHEST_EDUCATION, EDUCATION_OTHER)
}

fn technical_skills_condition() -> Condition {
    Condition::field_equals(fields::HIGHEST_EDUCATION, EDUCATION_TECHNICAL)
}

/// The complete experienced-hire application form.
pub fn definition() -> FormDefinition {
    FormDefinition {
        name: "experienced-application".to_string(),
        title: "Experienced Apply".to_string(),
        fields: vec![
            FieldSpec::new(fields::DOB, "Date of Birth", ControlKind::DateInput)
                .placeholder("YYYY-MM-DD"),
            FieldSpec::new(
                fields::TOTAL_EXPERIENCE,
                "Total Experience (in years)",
                ControlKind::NumberInput,
            ),
            FieldSpec::new(
                fields::RELEVANT_EXPERIENCE,
                "Relevant Experience",
                ControlKind::NumberInput,
            ),
            FieldSpec::new(
                fields::ACCOMPLISHMENTS,
                "Accomplishments/Achievements",
                ControlKind::TextArea,
            ),
            FieldSpec::new(
                fields::HIGHEST_EDUCATION,
                "Highest Education",
                ControlKind::Select {
                    options: education_levels(),
                },
            ),
            FieldSpec::new(
                fields::OTHER_EDUCATION,
                "Other Education",
                ControlKind::TextLine,
            )
            .shown_when(other_education_condition()),
            FieldSpec::new(
                fields::TECHNICAL_SKILLS,
                "Technical Skills",
                ControlKind::TagPicker {
                    suggestions: technical_skill_suggestions(),
                },
            )
            .shown_when(technical_skills_condition())
            .initial(FieldValue::Tags(Vec::new())),
            FieldSpec::new(
                fields::SOFT_SKILLS,
                "Soft Skills",
                ControlKind::TagPicker {
                    suggestions: soft_skill_suggestions(),
                },
            )
            .initial(FieldValue::Tags(Vec::new())),
            FieldSpec::new(fields::RESUME, "Resume", ControlKind::FilePicker)
                .placeholder("path to resume"),
            FieldSpec::new(fields::EXPECTED_CTC, "Expected CTC", ControlKind::NumberInput),
            FieldSpec::new(fields::CURRENT_CTC, "Current CTC", ControlKind::NumberInput),
            FieldSpec::new(fields::NOTICE_PERIOD, "Notice Period", ControlKind::TextLine),
        ],
        rules: rule_set(),
    }
}

/// The declarative rule set, exposed separately so it can be exercised as
/// plain data.
pub fn rule_set() -> RuleSet {
    RuleSet::new(vec![
        FieldRules::new(
            fields::DOB,
            vec![
                Constraint::Required {
                    message: "Date of Birth is required".to_string(),
                },
                Constraint::Date {
                    message: "Date of Birth must be a valid date".to_string(),
                },
            ],
        ),
        FieldRules::new(
            fields::TOTAL_EXPERIENCE,
            vec![
                Constraint::Required {
                    message: "Total Experience is required".to_string(),
                },
                Constraint::Numeric(
                    NumericRule::positive("Total Experience")
                        .round_to(1)
                        .max(EXPERIENCE_CEILING, "Total Experience cannot be more than 50"),
                ),
            ],
        ),
        FieldRules::new(
            fields::RELEVANT_EXPERIENCE,
            vec![
                Constraint::Required {
                    message: "Relevant Experience is required".to_string(),
                },
                Constraint::Numeric(
                    NumericRule::positive("Relevant Experience")
                        .max_decimals(2, "Only two decimal points allowed")
                        .max(
                            EXPERIENCE_CEILING,
                            "Relevant Experience cannot be more than 50",
                        ),
                ),
            ],
        ),
        FieldRules::new(
            fields::ACCOMPLISHMENTS,
            vec![Constraint::Required {
                message: "Accomplishments/Achievements are required".to_string(),
            }],
        ),
        FieldRules::new(
            fields::HIGHEST_EDUCATION,
            vec![Constraint::Required {
                message: "Highest Education is required".to_string(),
            }],
        ),
        FieldRules::new(
            fields::OTHER_EDUCATION,
            vec![Constraint::Conditional {
                when: other_education_condition(),
                then: vec![Constraint::Required {
                    message: "Please specify your education".to_string(),
                }],
            }],
        ),
        FieldRules::new(
            fields::TECHNICAL_SKILLS,
            vec![Constraint::Conditional {
                when: technical_skills_condition(),
                then: vec![Constraint::MinTags {
                    min: 1,
                    message: "Please select at least one technical skill".to_string(),
                }],
            }],
        ),
        FieldRules::new(
            fields::SOFT_SKILLS,
            vec![Constraint::MinTags {
                min: 1,
                message: "Please select at least one soft skill".to_string(),
            }],
        ),
        FieldRules::new(
            fields::RESUME,
            vec![Constraint::AttachmentRequired {
                message: "Resume is required".to_string(),
            }],
        ),
        FieldRules::new(
            fields::EXPECTED_CTC,
            vec![
                Constraint::Required {
                    message: "Expected CTC is required".to_string(),
                },
                Constraint::Numeric(
                    NumericRule::positive("Expected CTC")
                        .max(CTC_CEILING, "Expected CTC cannot exceed 2 crores"),
                ),
            ],
        ),
        FieldRules::new(
            fields::CURRENT_CTC,
            vec![
                Constraint::Required {
                    message: "Current CTC is required".to_string(),
                },
                Constraint::Numeric(
                    NumericRule::positive("Current CTC")
                        .max(CTC_CEILING, "Current CTC cannot exceed 2 crores"),
                ),
            ],
        ),
        FieldRules::new(
            fields::NOTICE_PERIOD,
            vec![Constraint::Required {
                message: "Notice Period is required".to_string(),
            }],
        ),
    ])
}
