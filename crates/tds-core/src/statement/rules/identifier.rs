//! Deductee PAN extraction and validation.

use super::patterns::{PAN, PAN_EXACT, PAN_LABELED};
use super::{FieldRule, RuleInput, RuleMatch};

/// Finds the PAN embedded in the statement's file name.
///
/// TRACES exports name their files after the deductee, e.g.
/// `AAACD1461F_Q1_2025-26.pdf`, which makes the file name the most reliable
/// source.
pub struct FilenameIdentifierRule;

impl FieldRule for FilenameIdentifierRule {
    type Output = String;

    fn name(&self) -> &'static str {
        "filename"
    }

    fn apply(&self, input: &RuleInput<'_>) -> Option<RuleMatch<String>> {
        let m = PAN.find(input.file_name)?;
        Some(
            RuleMatch::new(m.as_str().to_string(), self.name(), m.as_str())
                .with_position(m.start(), m.end()),
        )
    }
}

/// Finds the PAN printed after the "PAN of the deductee" label.
pub struct LabeledIdentifierRule;

impl FieldRule for LabeledIdentifierRule {
    type Output = String;

    fn name(&self) -> &'static str {
        "document_label"
    }

    fn apply(&self, input: &RuleInput<'_>) -> Option<RuleMatch<String>> {
        let caps = PAN_LABELED.captures(input.text)?;
        let full_match = caps.get(0)?;
        Some(
            RuleMatch::new(caps[1].to_string(), self.name(), full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    }
}

/// Extract the first PAN-shaped substring from a file name.
pub fn extract_identifier_from_filename(file_name: &str) -> Option<String> {
    FilenameIdentifierRule
        .apply(&RuleInput::new("", file_name))
        .map(|m| m.value)
}

/// Check that a value is exactly a PAN and nothing else.
pub fn is_valid_identifier(value: &str) -> bool {
    PAN_EXACT.is_match(value)
}
