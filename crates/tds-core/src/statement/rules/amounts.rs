//! Amount parsing and the amount-paid rule.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::PAYMENT_SUMMARY_TOTAL;
use super::{FieldRule, RuleInput, RuleMatch};

/// Parse an Indian-formatted rupee amount (e.g. "12,34,567.89" or "1,000.00").
///
/// Grouping commas are dropped; the fraction is kept as written.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// First "Total (Rs.)" following the "Summary of payment" heading.
pub struct PaymentSummaryTotalRule;

impl FieldRule for PaymentSummaryTotalRule {
    type Output = Decimal;

    fn name(&self) -> &'static str {
        "payment_summary_total"
    }

    fn apply(&self, input: &RuleInput<'_>) -> Option<RuleMatch<Decimal>> {
        let caps = PAYMENT_SUMMARY_TOTAL.captures(input.text)?;
        let amount = caps.get(1)?;
        let value = parse_amount(amount.as_str())?;
        Some(
            RuleMatch::new(value, self.name(), amount.as_str())
                .with_position(amount.start(), amount.end()),
        )
    }
}

/// Extract the total amount paid from statement text.
pub fn extract_total_amount_paid(text: &str) -> Option<Decimal> {
    PaymentSummaryTotalRule
        .apply(&RuleInput::text(text))
        .map(|m| m.value)
}
