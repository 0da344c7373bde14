//! SQL identifier helpers.

/// Whether `c` may appear in an unquoted identifier. Follows SQLite's rules:
/// letters, digits, '_', '$', and any non-ASCII character.
fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

/// Whether `s` is a valid SQL identifier.
///
/// Accepts dotted and starred forms ("t.id", "t.*") and '-' inside names.
/// A leading `"` or backtick starts a quoted identifier, which must end
/// with the same character. A string that parses entirely as a number is
/// not an identifier.
pub fn is_valid_identifier(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let quote = s.chars().next().filter(|c| *c == '"' || *c == '`');
    let body: Vec<char> = s.chars().skip(usize::from(quote.is_some())).collect();
    for (i, c) in body.iter().enumerate() {
        let last = i + 1 == body.len();
        let ok = is_id_char(*c)
            || *c == '*'
            || *c == '.'
            || *c == '-'
            || (last && (*c == '"' || *c == '`'));
        if !ok {
            return false;
        }
    }
    if let Some(q) = quote {
        return body.last() == Some(&q);
    }
    // Unquoted and made only of identifier characters; numbers are still
    // not identifiers.
    s.parse::<f64>().is_err()
}

/// Trims trailing whitespace, in place semantics for stored SQL text.
pub fn chomp(s: &str) -> &str {
    s.trim_end()
}

/// Splits a possibly qualified identifier at its last dot: "t.id" becomes
/// ("t", "id"), "id" becomes (None, "id"). Dots inside quotes do not split.
pub fn split_qualified(s: &str) -> (Option<&str>, &str) {
    let mut in_quote: Option<char> = None;
    let mut split_at = None;
    for (i, c) in s.char_indices() {
        match in_quote {
            Some(q) if c == q => in_quote = None,
            Some(_) => {}
            None if c == '"' || c == '`' => in_quote = Some(c),
            None if c == '.' => split_at = Some(i),
            None => {}
        }
    }
    match split_at {
        Some(i) => (Some(&s[..i]), &s[i + 1..]),
        None => (None, s),
    }
}

/// Strips surrounding `"` or backtick quotes for name comparison.
pub fn unquote(s: &str) -> &str {
    let mut chars = s.chars();
    match (chars.next(), s.chars().last()) {
        (Some(q @ ('"' | '`')), Some(last)) if last == q && s.len() >= 2 => &s[1..s.len() - 1],
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifiers() {
        assert!(is_valid_identifier("customers"));
        assert!(is_valid_identifier("order_items"));
        assert!(is_valid_identifier("t.id"));
        assert!(is_valid_identifier("t.*"));
        assert!(is_valid_identifier("*"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("a-b"));
    }

    #[test]
    fn rejects_numbers_and_junk() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("123"));
        assert!(!is_valid_identifier("12.5"));
        assert!(!is_valid_identifier("a b"));
        assert!(!is_valid_identifier("a;b"));
    }

    #[test]
    fn quoted_identifiers() {
        assert!(is_valid_identifier("\"order\""));
        assert!(is_valid_identifier("`order`"));
        assert!(!is_valid_identifier("\"order"));
        assert!(!is_valid_identifier("\"order`"));
    }

    #[test]
    fn numeric_body_is_fine_when_quoted() {
        assert!(is_valid_identifier("\"123\""));
    }

    #[test]
    fn splitting() {
        assert_eq!(split_qualified("t.id"), (Some("t"), "id"));
        assert_eq!(split_qualified("id"), (None, "id"));
        assert_eq!(split_qualified("\"a.b\".c"), (Some("\"a.b\""), "c"));
    }

    #[test]
    fn chomp_trims_trailing_only() {
        assert_eq!(chomp("SELECT 1  \n"), "SELECT 1");
        assert_eq!(chomp("  SELECT 1"), "  SELECT 1");
    }

    #[test]
    fn unquote_strips_matching_quotes() {
        assert_eq!(unquote("\"order\""), "order");
        assert_eq!(unquote("`order`"), "order");
        assert_eq!(unquote("order"), "order");
        assert_eq!(unquote("\"order`"), "\"order`");
    }
}
