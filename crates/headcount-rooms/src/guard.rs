/// Leading-integer parse: optional whitespace and sign, then digits up to
/// the first non-digit. `None` when no digit follows.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude = rest[..end].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Room-level filter for edits: non-numeric and negative input is dropped.
pub fn accept_room_edit(raw: &str) -> Option<i64> {
    parse_leading_int(raw).filter(|v| *v >= 0)
}
