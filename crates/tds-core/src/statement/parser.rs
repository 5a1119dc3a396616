//! Statement parser resolving every field through its rule chain.

use std::path::PathBuf;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::record::ExtractionRecord;

use super::rules::{
    FilenameIdentifierRule, LabeledIdentifierRule, NthTotalRule, PaymentSummaryTotalRule,
    QuarterRowRule, RuleChain, RuleInput, RuleMatch,
};

/// Fields resolved from one statement, with the rule that produced each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementFields {
    pub deductee_id: Option<RuleMatch<String>>,
    pub total_amount_paid: Option<RuleMatch<Decimal>>,
    pub total_tax_deducted: Option<RuleMatch<Decimal>>,
}

impl StatementFields {
    /// Build the record for a statement found in `deal_name`.
    pub fn into_record(
        self,
        deal_name: impl Into<String>,
        source_path: impl Into<PathBuf>,
    ) -> ExtractionRecord {
        ExtractionRecord {
            deductee_id: self.deductee_id.map(|m| m.value),
            total_amount_paid: self.total_amount_paid.map(|m| m.value),
            total_tax_deducted: self.total_tax_deducted.map(|m| m.value),
            deal_name: deal_name.into(),
            source_path: source_path.into(),
        }
    }
}

/// Rule-based TDS statement parser.
pub struct StatementParser {
    identifier: RuleChain<String>,
    amount_paid: RuleChain<Decimal>,
    tax_deducted: RuleChain<Decimal>,
}

impl StatementParser {
    /// Create a parser with the default rule order.
    pub fn new() -> Self {
        Self::with_identifier_from_text(true)
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::with_identifier_from_text(config.identifier_from_text)
    }

    /// Create a parser, optionally falling back to the PAN label in the
    /// document text when the file name carries none.
    pub fn with_identifier_from_text(enabled: bool) -> Self {
        let mut identifier = RuleChain::new("deductee_id").with_rule(FilenameIdentifierRule);
        if enabled {
            identifier = identifier.with_rule(LabeledIdentifierRule);
        }

        Self {
            identifier,
            amount_paid: RuleChain::new("total_amount_paid").with_rule(PaymentSummaryTotalRule),
            tax_deducted: RuleChain::new("total_tax_deducted")
                .with_rule(QuarterRowRule)
                .with_rule(NthTotalRule::second()),
        }
    }

    /// Rule names per field, in priority order.
    pub fn describe(&self) -> Vec<(&'static str, Vec<&'static str>)> {
        vec![
            (self.identifier.field(), self.identifier.rule_names()),
            (self.amount_paid.field(), self.amount_paid.rule_names()),
            (self.tax_deducted.field(), self.tax_deducted.rule_names()),
        ]
    }

    /// Resolve all fields from normalized document text and its file name.
    pub fn parse(&self, text: &str, file_name: &str) -> StatementFields {
        let input = RuleInput::new(text, file_name);

        let fields = StatementFields {
            deductee_id: self.identifier.resolve(&input),
            total_amount_paid: self.amount_paid.resolve(&input),
            total_tax_deducted: self.tax_deducted.resolve(&input),
        };

        debug!(
            "{}: deductee_id via {:?}, amount paid via {:?}, tax deducted via {:?}",
            file_name,
            fields.deductee_id.as_ref().map(|m| m.rule),
            fields.total_amount_paid.as_ref().map(|m| m.rule),
            fields.total_tax_deducted.as_ref().map(|m| m.rule),
        );

        fields
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}
