use std::fmt;

use super::attributes::ImageAttributes;
use super::category::RuleSet;

/// Message returned when every check passes
pub const PASS_MESSAGE: &str = "Image meets all requirements";

/// One failed criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Format {
        expected: &'static str,
        actual: String,
    },
    Dimensions {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    Mode {
        expected: &'static str,
        actual: String,
    },
    /// No transparent pixel found
    Transparency,
}

impl Violation {
    /// Short name of the criterion
    pub fn criterion(&self) -> &'static str {
        match self {
            Violation::Format { .. } => "format",
            Violation::Dimensions { .. } => "size",
            Violation::Mode { .. } => "mode",
            Violation::Transparency => "transparency",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Format { expected, actual } => {
                write!(f, "format is {}, expected {}", actual, expected)
            }
            Violation::Dimensions { expected, actual } => write!(
                f,
                "size is {}×{}, expected {}×{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Violation::Mode { expected, actual } => {
                write!(f, "mode is {}, expected {}", actual, expected)
            }
            Violation::Transparency => {
                write!(f, "transparency missing, background has no transparent pixels")
            }
        }
    }
}

/// Verdict for one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub success: bool,
    pub message: String,
    /// Failed criteria, in evaluation order
    pub violations: Vec<Violation>,
    /// Always the decoded values, pass or fail
    pub attributes: ImageAttributes,
}

/// Check `attributes` against `rules`
///
/// Every criterion is evaluated (format, size, mode, transparency, in that
/// order) and all failures are reported together.
pub fn validate(attributes: &ImageAttributes, rules: &RuleSet) -> ValidationResult {
    let mut violations = Vec::new();

    if !attributes.format.eq_ignore_ascii_case(rules.format) {
        violations.push(Violation::Format {
            expected: rules.format,
            actual: attributes.format.clone(),
        });
    }

    if attributes.width != rules.width || attributes.height != rules.height {
        violations.push(Violation::Dimensions {
            expected: (rules.width, rules.height),
            actual: (attributes.width, attributes.height),
        });
    }

    if attributes.base_mode() != rules.mode {
        violations.push(Violation::Mode {
            expected: rules.mode,
            actual: attributes.mode.clone(),
        });
    }

    if rules.require_transparency && attributes.transparent_pixels == 0 {
        violations.push(Violation::Transparency);
    }

    let message = if violations.is_empty() {
        PASS_MESSAGE.to_string()
    } else {
        format!(
            "Image rejected: {}",
            violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        )
    };

    ValidationResult {
        success: violations.is_empty(),
        message,
        violations,
        attributes: attributes.clone(),
    }
}
