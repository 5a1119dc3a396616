//! Rule-based field extractors for TDS statements.
//!
//! Each field is resolved by a [`RuleChain`]: an ordered list of named rules
//! tried one after another until one produces a value. Rules never fail; a
//! rule that does not match simply yields `None`.

pub mod amounts;
pub mod identifier;
pub mod patterns;
pub mod tax;

pub use amounts::{extract_total_amount_paid, parse_amount, PaymentSummaryTotalRule};
pub use identifier::{
    extract_identifier_from_filename, is_valid_identifier, FilenameIdentifierRule,
    LabeledIdentifierRule,
};
pub use tax::{extract_total_tax_deducted, NthTotalRule, QuarterRowRule};

/// What a rule gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// Normalized document text.
    pub text: &'a str,
    /// File name of the source document (no directory part).
    pub file_name: &'a str,
}

impl<'a> RuleInput<'a> {
    pub fn new(text: &'a str, file_name: &'a str) -> Self {
        Self { text, file_name }
    }

    /// Input with document text only.
    pub fn text(text: &'a str) -> Self {
        Self::new(text, "")
    }
}

/// A single named extraction rule.
pub trait FieldRule: Send + Sync {
    /// The type of value this rule produces.
    type Output;

    /// Stable rule name, used in logs and match provenance.
    fn name(&self) -> &'static str;

    /// Try to extract the field.
    fn apply(&self, input: &RuleInput<'_>) -> Option<RuleMatch<Self::Output>>;
}

/// A value produced by a rule, with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule that produced it.
    pub rule: &'static str,
    /// Byte span of the match in the searched string.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> RuleMatch<T> {
    pub fn new(value: T, rule: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Ordered fallback list of rules for one field.
pub struct RuleChain<T> {
    field: &'static str,
    rules: Vec<Box<dyn FieldRule<Output = T>>>,
}

impl<T> RuleChain<T> {
    /// Create an empty chain for the named field.
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    /// Append a rule with the lowest priority so far.
    pub fn with_rule(mut self, rule: impl FieldRule<Output = T> + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Rule names in priority order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Evaluate rules in priority order and return the first match.
    pub fn resolve(&self, input: &RuleInput<'_>) -> Option<RuleMatch<T>> {
        self.rules.iter().find_map(|rule| rule.apply(input))
    }
}
