//! Numeric literal classification.

use super::MacroType;

/// Guess the C type of a numeric literal from its spelling and suffix.
pub(super) fn classify_numeric(spelling: &str) -> MacroType {
    let text: String = spelling
        .chars()
        .filter(|c| *c != '\'')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if text.is_empty() {
        return MacroType::Invalid;
    }

    let (radix, digits) = if let Some(rest) = text.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = text.strip_prefix("0b") {
        (2, rest)
    } else {
        (10, text.as_str())
    };

    if is_float(radix, digits) {
        return classify_float(radix, digits);
    }

    let body_len = digits.trim_end_matches(['u', 'l', 'z']).len();
    let (body, suffix) = digits.split_at(body_len);
    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return MacroType::Invalid;
    }
    classify_int_suffix(suffix)
}

fn is_float(radix: u32, digits: &str) -> bool {
    match radix {
        16 => digits.contains('p') || digits.contains('.'),
        10 => digits.contains('.') || digits.contains('e'),
        _ => false,
    }
}

fn classify_float(radix: u32, digits: &str) -> MacroType {
    let body = digits.trim_end_matches(['f', 'l']);
    let suffix = &digits[body.len()..];
    if suffix.len() > 1 {
        return MacroType::Invalid;
    }
    let valid = body.chars().enumerate().all(|(i, c)| {
        let prev = i.checked_sub(1).and_then(|p| body.chars().nth(p));
        c.is_digit(radix)
            || c == '.'
            || (radix == 10 && c == 'e')
            || (radix == 16 && c == 'p')
            || ((c == '+' || c == '-') && matches!(prev, Some('e') | Some('p')))
    });
    if valid && body.chars().any(|c| c.is_ascii_digit()) {
        MacroType::Float
    } else {
        MacroType::Invalid
    }
}

fn classify_int_suffix(suffix: &str) -> MacroType {
    let unsigned = suffix.matches('u').count();
    let longs = suffix.matches('l').count();
    let sizes = suffix.matches('z').count();
    if unsigned > 1 || longs > 2 || sizes > 1 || (sizes == 1 && longs > 0) {
        return MacroType::Invalid;
    }
    if longs == 2 && !suffix.contains("ll") {
        return MacroType::Invalid;
    }
    match (unsigned == 1, longs == 2) {
        (true, true) => MacroType::UnsignedLongLong,
        (false, true) => MacroType::LongLong,
        (true, false) => MacroType::Unsigned,
        (false, false) => MacroType::Int,
    }
}
