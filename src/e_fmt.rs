use std::borrow::Cow;

/// Whether `c` is a legal XML 1.0 `Char`.
///
/// Surrogates never occur in a Rust `char`, so only the C0 controls (other than
/// tab, newline and carriage return) and U+FFFE/U+FFFF need rejecting.
pub fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Replaces characters XML 1.0 cannot carry (ANSI escapes, BEL, ...) with U+FFFD.
///
/// # Example
/// ```
/// use buildlog_xml::e_fmt::xml_safe;
///
/// assert_eq!(xml_safe("\u{1b}[33mwarning\u{1b}[0m"), "\u{FFFD}[33mwarning\u{FFFD}[0m");
/// assert_eq!(xml_safe("plain"), "plain");
/// ```
pub fn xml_safe(s: &str) -> Cow<'_, str> {
    if s.chars().all(is_xml_char) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.chars()
            .map(|c| if is_xml_char(c) { c } else { '\u{FFFD}' })
            .collect(),
    )
}
