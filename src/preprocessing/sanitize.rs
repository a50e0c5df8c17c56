/*!
 * Character sanitizer.
 *
 * Keeps ASCII letters, ASCII digits, whitespace and the punctuation
 * `. , ; : ! ? ' " -`. Everything else is dropped without replacement.
 */

/// Check whether a character survives sanitizing
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' | '-')
}

/// Remove every character outside the allowed set
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| is_allowed(*c)).collect()
}
