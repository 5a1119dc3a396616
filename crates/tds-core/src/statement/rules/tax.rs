//! Tax-deducted rules.

use rust_decimal::Decimal;

use super::amounts::parse_amount;
use super::patterns::{QUARTER_ROW, TOTAL_RS};
use super::{FieldRule, RuleInput, RuleMatch};

/// First amount of the "Q1 <receipt> <deducted> <deposited>" summary row.
pub struct QuarterRowRule;

impl FieldRule for QuarterRowRule {
    type Output = Decimal;

    fn name(&self) -> &'static str {
        "quarter_row"
    }

    fn apply(&self, input: &RuleInput<'_>) -> Option<RuleMatch<Decimal>> {
        let caps = QUARTER_ROW.captures(input.text)?;
        let amount = caps.get(1)?;
        let value = parse_amount(amount.as_str())?;
        Some(
            RuleMatch::new(value, self.name(), &caps[0])
                .with_position(amount.start(), amount.end()),
        )
    }
}

/// The n-th (zero-based) "Total (Rs.)" amount in document order.
///
/// On the TRACES Form 16A layout the second total is the tax deducted. This
/// is positional: templates that order their totals differently will be
/// misread.
pub struct NthTotalRule {
    index: usize,
}

impl NthTotalRule {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// The second total, as found on Form 16A.
    pub fn second() -> Self {
        Self::new(1)
    }
}

impl FieldRule for NthTotalRule {
    type Output = Decimal;

    fn name(&self) -> &'static str {
        "nth_total"
    }

    fn apply(&self, input: &RuleInput<'_>) -> Option<RuleMatch<Decimal>> {
        let caps = TOTAL_RS.captures_iter(input.text).nth(self.index)?;
        let amount = caps.get(1)?;
        let value = parse_amount(amount.as_str())?;
        Some(
            RuleMatch::new(value, self.name(), &caps[0])
                .with_position(amount.start(), amount.end()),
        )
    }
}

/// Extract the total tax deducted: quarter row first, then the second total.
pub fn extract_total_tax_deducted(text: &str) -> Option<Decimal> {
    let input = RuleInput::text(text);
    QuarterRowRule
        .apply(&input)
        .or_else(|| NthTotalRule::second().apply(&input))
        .map(|m| m.value)
}
