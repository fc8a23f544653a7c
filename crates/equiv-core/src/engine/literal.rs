//! Literal values, so that `0x10` and `16` or `'a'` and `"a"` compare equal.

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Integer(i128),
    Float(f64),
    Str(String),
    /// A character literal, kept apart from strings of the same text.
    Char(String),
    Bool(bool),
    Null,
    /// Anything we could not interpret; compared by source text.
    Raw(String),
}

impl LiteralValue {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text {
            "true" => return LiteralValue::Bool(true),
            "false" => return LiteralValue::Bool(false),
            "null" => return LiteralValue::Null,
            _ => {}
        }

        if let Some(s) = unquote(text) {
            return LiteralValue::Str(s.to_string());
        }
        if let Some(n) = parse_integer(text) {
            return LiteralValue::Integer(n);
        }
        if let Some(f) = parse_float(text) {
            return LiteralValue::Float(f);
        }
        LiteralValue::Raw(text.to_string())
    }

    /// Parse a literal the grammar marks as a character, such as Java's `'a'`.
    pub fn parse_char(text: &str) -> Self {
        match unquote(text.trim()) {
            Some(c) => LiteralValue::Char(c.to_string()),
            None => LiteralValue::Raw(text.trim().to_string()),
        }
    }

    /// Values of different kinds never compare equal: `2` is not `2.0`.
    pub fn same_value(&self, other: &LiteralValue) -> bool {
        match (self, other) {
            (LiteralValue::Float(a), LiteralValue::Float(b)) => a.to_bits() == b.to_bits() || a == b,
            _ => self == other,
        }
    }
}

fn unquote(text: &str) -> Option<&str> {
    for quote in ["\"\"\"", "'''", "\"", "'", "/"] {
        if text.len() >= 2 * quote.len() && text.starts_with(quote) && text.ends_with(quote) {
            return Some(&text[quote.len()..text.len() - quote.len()]);
        }
    }
    None
}

fn parse_integer(text: &str) -> Option<i128> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let body = cleaned
        .strip_suffix(['l', 'L', 'g', 'G', 'i', 'I'])
        .unwrap_or(&cleaned);
    let (digits, radix) = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        (bin, 2)
    } else if body.len() > 1 && body.starts_with('0') && body.chars().all(|c| c.is_ascii_digit()) {
        (&body[1..], 8)
    } else {
        (body, 10)
    };
    if digits.is_empty() {
        return None;
    }
    i128::from_str_radix(digits, radix).ok()
}

fn parse_float(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let body = cleaned
        .strip_suffix(['f', 'F', 'd', 'D', 'g', 'G'])
        .unwrap_or(&cleaned);
    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    body.parse().ok()
}
