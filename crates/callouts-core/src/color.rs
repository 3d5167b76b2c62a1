use ryu_js::Buffer;

/// Formats a number the way JavaScript's `Number.prototype.toString` does (`0.2`, `1`, `NaN`).
fn fmt_js_number(v: f64) -> String {
    let mut b = Buffer::new();
    b.format(v).to_string()
}

/// `parseInt(s, 16)`: skips leading whitespace, accepts a sign and an optional `0x` prefix, then
/// consumes the longest run of hex digits. `None` stands in for `NaN`.
fn parse_int_hex_like(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    let digits_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_hexdigit())
        .map_or(s.len(), |(i, _)| i);
    let digits = &s[..digits_end];
    if digits.is_empty() {
        return None;
    }

    let value = i64::from_str_radix(digits, 16).ok()?;
    Some(if negative { -value } else { value })
}

fn channel(hex: &[char], start: usize) -> String {
    let group: String = hex.iter().skip(start).take(2).collect();
    match parse_int_hex_like(&group) {
        Some(v) => v.to_string(),
        None => "NaN".to_string(),
    }
}

/// Converts `#rgb` / `#rrggbb` (the `#` is optional) into `rgba(r,g,b, opacity)`.
///
/// Malformed input is not rejected: unparseable channels come out as `NaN`, so the resulting CSS
/// declaration is simply ignored by the browser.
pub fn hex_to_rgba(hex_code: &str, opacity: f64) -> String {
    let hex = hex_code.strip_prefix('#').unwrap_or(hex_code);
    let mut hex: Vec<char> = hex.chars().collect();

    if hex.len() == 3 {
        hex = hex.iter().flat_map(|&c| [c, c]).collect();
    }

    let r = channel(&hex, 0);
    let g = channel(&hex, 2);
    let b = channel(&hex, 4);

    format!("rgba({r},{g},{b}, {})", fmt_js_number(opacity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_rgba_expands_shorthand() {
        assert_eq!(hex_to_rgba("#f00", 0.2), "rgba(255,0,0, 0.2)");
        assert_eq!(hex_to_rgba("abc", 0.5), "rgba(170,187,204, 0.5)");
    }

    #[test]
    fn hex_to_rgba_parses_six_digit_with_or_without_hash() {
        assert_eq!(hex_to_rgba("086ddd", 0.2), "rgba(8,109,221, 0.2)");
        assert_eq!(hex_to_rgba("#EC7500", 0.2), "rgba(236,117,0, 0.2)");
    }

    #[test]
    fn hex_to_rgba_formats_opacity_like_javascript() {
        assert_eq!(hex_to_rgba("#000", 1.0), "rgba(0,0,0, 1)");
        assert_eq!(hex_to_rgba("#000", 0.0), "rgba(0,0,0, 0)");
        assert_eq!(hex_to_rgba("#000", 35.0 / 100.0), "rgba(0,0,0, 0.35)");
    }

    #[test]
    fn hex_to_rgba_propagates_nan_for_malformed_colors() {
        assert_eq!(hex_to_rgba("#zzzzzz", 0.2), "rgba(NaN,NaN,NaN, 0.2)");
        assert_eq!(hex_to_rgba("#abcd", 0.2), "rgba(171,205,NaN, 0.2)");
        assert_eq!(hex_to_rgba("", 0.2), "rgba(NaN,NaN,NaN, 0.2)");
        // A leading run of hex digits still parses, like `parseInt("1z", 16)`.
        assert_eq!(hex_to_rgba("#1z2z3z", 0.2), "rgba(1,2,3, 0.2)");
        assert_eq!(hex_to_rgba("red", 0.2), "rgba(NaN,238,221, 0.2)");
    }

    #[test]
    fn parse_int_hex_like_follows_parse_int() {
        assert_eq!(parse_int_hex_like("ff"), Some(255));
        assert_eq!(parse_int_hex_like(" f"), Some(15));
        assert_eq!(parse_int_hex_like("-f"), Some(-15));
        assert_eq!(parse_int_hex_like("0x"), None);
        assert_eq!(parse_int_hex_like(""), None);
        assert_eq!(parse_int_hex_like("g1"), None);
    }
}
