//! Sanitizing of untrusted display text
//!
//! Backend-originated strings (news titles, error messages, alert bodies)
//! are rendered into the terminal buffer verbatim. Terminal cells treat
//! text as text, so markup injection is not a concern the way it is in
//! HTML, but control characters are: an ESC sequence smuggled into an
//! article title could restyle or clear parts of the screen. Every dynamic
//! string therefore passes through [`sanitize`] at the view-model
//! boundary; string literals and app-constructed text skip it.

use std::borrow::Cow;

/// Strip terminal control characters from untrusted text.
///
/// Removes C0 controls (except `\t`, which ratatui renders as spacing),
/// DEL, and C1 controls. `\n` and `\r` are replaced by a single space so
/// multi-line backend text stays on its intended line.
///
/// Returns `Cow::Borrowed` when the input is already clean, which it
/// almost always is.
pub fn sanitize(input: &str) -> Cow<'_, str> {
    if input.chars().all(is_allowed) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c == '\n' || c == '\r' {
            if !out.ends_with(' ') {
                out.push(' ');
            }
        } else if is_allowed(c) {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn is_allowed(c: char) -> bool {
    if c == '\t' {
        return true;
    }
    let cp = c as u32;
    // C0 (incl. ESC), DEL, C1
    !(cp < 0x20 || cp == 0x7f || (0x80..=0x9f).contains(&cp))
}
