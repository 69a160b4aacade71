/// Turns raw field text into a number, before clamping.
///
/// The text counts as negative when it starts or ends with `-`, unless it is
/// a lone `-` (the user is still typing). Every non-digit is dropped and the
/// digits that remain form the magnitude; no digits means 0. A negative
/// reading with no magnitude becomes `-1`, so the sign the user typed stays
/// visible. Without `allow_minus` the sign is ignored.
pub fn parse_input(raw: &str, allow_minus: bool) -> i64 {
    let negative = (raw.starts_with('-') || raw.ends_with('-')) && raw != "-";
    let magnitude = raw
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(d as i64));

    match (negative && allow_minus, magnitude) {
        (true, 0) => -1,
        (true, m) => -m,
        (false, m) => m,
    }
}
