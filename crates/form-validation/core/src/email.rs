//! Email syntax patterns
//!
//! Two patterns are in play. [`EMAIL_PATTERN_ATTRIBUTE`] is written into the
//! `pattern` attribute of every email input so native validation enforces a
//! dotted domain with a real TLD. [`is_valid_email`] is the stricter check the
//! evaluator runs when the host reports a type mismatch.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern attribute source installed on `input[type=email]`
pub const EMAIL_PATTERN_ATTRIBUTE: &str = r"^([^\x00-\x20\x22\x28\x29\x2c\x2e\x3a-\x3c\x3e\x40\x5b-\x5d\x7f-\xff]+|\x22([^\x0d\x22\x5c\x80-\xff]|\x5c[\x00-\x7f])*\x22)(\x2e([^\x00-\x20\x22\x28\x29\x2c\x2e\x3a-\x3c\x3e\x40\x5b-\x5d\x7f-\xff]+|\x22([^\x0d\x22\x5c\x80-\xff]|\x5c[\x00-\x7f])*\x22))*\x40([^\x00-\x20\x22\x28\x29\x2c\x2e\x3a-\x3c\x3e\x40\x5b-\x5d\x7f-\xff]+|\x5b([^\x0d\x5b-\x5d\x80-\xff]|\x5c[\x00-\x7f])*\x5d)(\x2e([^\x00-\x20\x22\x28\x29\x2c\x2e\x3a-\x3c\x3e\x40\x5b-\x5d\x7f-\xff]+|\x5b([^\x0d\x5b-\x5d\x80-\xff]|\x5c[\x00-\x7f])*\x5d))*(\.\w{2,})+$";

// Non-ASCII code points allowed in atoms, quoted text and domain labels
const UNICODE_RANGE: &str = r"\u{00A0}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFEF}";

static STRICT_EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    let u = UNICODE_RANGE;

    let atom = format!(r"[a-zA-Z0-9!#$%&'*+\-/=?^_`{{|}}~{u}]");
    let folding_ws = r"(?:(?:[\x20\x09]*\x0d\x0a)?[\x20\x09]+)?";
    let quoted_char = format!(
        r"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x7f\x21\x23-\x5b\x5d-\x7e{u}]|\\[\x01-\x09\x0b\x0c\x0d-\x7f{u}])"
    );
    let quoted = format!(r"\x22(?:{folding_ws}{quoted_char})*{folding_ws}\x22");
    let local = format!(r"(?:{atom}+(?:\.{atom}+)*|{quoted})");

    let alnum = format!("[a-zA-Z0-9{u}]");
    let alpha = format!("[a-zA-Z{u}]");
    let inner = format!(r"[a-zA-Z0-9\-_~{u}]");
    let label = format!("(?:{alnum}|{alnum}{inner}*{alnum})");
    let tld = format!("{alpha}{inner}*{alpha}");

    Regex::new(&format!(r"^{local}@(?:{label}\.)+{tld}$")).unwrap()
});

/// Validates an address against the strict email syntax
///
/// Accepts dot-atom and quoted local parts and requires a dotted domain
/// whose last label is at least two letters long.
pub fn is_valid_email(email: &str) -> bool {
    STRICT_EMAIL_REGEX.is_match(email)
}
