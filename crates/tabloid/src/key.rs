//! Column title normalization.

/// Turns a column title into an identifier usable inside filter expressions.
///
/// Letters and digits are kept and lowercased, every run of spaces and
/// hyphens becomes a single underscore, and anything else is dropped.
/// Dropped characters do not interrupt a separator run, so `"A % B"`
/// becomes `"a_b"`.
///
/// # Example
///
/// ```
/// use tabloid::normalize_key;
///
/// assert_eq!(normalize_key("AGE GAP"), "age_gap");
/// assert_eq!(normalize_key("NAME"), "name");
/// assert_eq!(normalize_key("%RESTART"), "restart");
/// ```
pub fn normalize_key(title: &str) -> String {
    let mut key = String::with_capacity(title.len());
    let mut in_separator = false;

    for c in title.chars() {
        if c.is_alphanumeric() {
            key.extend(c.to_lowercase());
            in_separator = false;
        } else if c == ' ' || c == '-' {
            if !in_separator {
                key.push('_');
                in_separator = true;
            }
        }
    }

    key
}
