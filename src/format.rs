// Display helpers for user-facing summaries (ru-RU conventions)
use rust_decimal::Decimal;

/// ru-RU digit grouping uses a non-breaking space
pub const GROUP_SEPARATOR: char = '\u{a0}';

/// Pick the Russian noun form agreeing with `number`: `one` for 1, 21, 31..., `few` for 2-4, 22-24..., `many` otherwise.
pub fn plural<'a>(number: i64, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    let n = number.unsigned_abs() % 100;
    if (5..=20).contains(&n) {
        return many;
    }
    match n % 10 {
        1 => one,
        2..=4 => few,
        _ => many,
    }
}

/// Format an amount the way the dashboard shows it: grouped thousands, comma as decimal separator
pub fn group_digits(value: &Decimal) -> String {
    let normalized = value.normalize();
    let text = normalized.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if normalized.is_sign_negative() && !normalized.is_zero() {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}
