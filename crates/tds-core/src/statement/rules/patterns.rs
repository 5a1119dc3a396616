//! Common regex patterns for TDS statement extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // PAN (deductee tax ID): 5 letters, 4 digits, 1 letter
    pub static ref PAN: Regex = Regex::new(
        r"[A-Z]{5}[0-9]{4}[A-Z]"
    ).unwrap();

    pub static ref PAN_EXACT: Regex = Regex::new(
        r"^[A-Z]{5}[0-9]{4}[A-Z]$"
    ).unwrap();

    pub static ref PAN_LABELED: Regex = Regex::new(
        r"PAN of the deductee\s+([A-Z]{5}[0-9]{4}[A-Z])"
    ).unwrap();

    // First "Total (Rs.)" after the payment summary heading
    pub static ref PAYMENT_SUMMARY_TOTAL: Regex = Regex::new(
        r"(?s)Summary of payment.*?Total \(Rs\.\)\s+([0-9,]+\.[0-9]{2})"
    ).unwrap();

    // Quarterly summary row: Q1 <receipt no> <tax deducted> <tax deposited>
    pub static ref QUARTER_ROW: Regex = Regex::new(
        r"Q1\s+\w+\s+([0-9,]+\.[0-9]{2})\s+([0-9,]+\.[0-9]{2})"
    ).unwrap();

    pub static ref TOTAL_RS: Regex = Regex::new(
        r"Total \(Rs\.\)\s+([0-9,]+\.[0-9]{2})"
    ).unwrap();
}
