//! Page text normalization.

/// Concatenate per-page text into a single document string.
///
/// Every page that yields text is followed by a newline; pages with no text
/// are skipped.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for page in pages {
        let page = page.as_ref();
        if page.trim().is_empty() {
            continue;
        }
        text.push_str(page);
        text.push('\n');
    }
    text
}
