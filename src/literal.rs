//! Literal evaluation — turn host-language argument lists into isoltest values
//!
//! Legacy assertions spell their arguments as C++ expressions such as
//! `u256(5), "true", string("abc")`. The declarative format wants the bare
//! values: `5, true, "abc"`.
//!
//! Evaluation is a restricted literal parser, not an expression evaluator:
//! integers (any magnitude, optional sign, `0x`/`0o`/`0b` prefixes, `_`
//! separators), quoted strings and the two booleans. Anything else is
//! reported as unresolved and rendered as `?`.
//!
//! Integer formatting is a per-call decision: if the stripped argument text
//! contains `0x` anywhere, every integer of that call is rendered in hex.

use std::fmt;

/// Wrapper calls removed before splitting, in application order.
const WRAPPERS: &[&str] = &["u256(", ")", "string(", "encodeArgs("];

/// Placeholder emitted for a token that does not parse as a literal
pub const UNRESOLVED: &str = "?";

/// Evaluate a raw argument list
pub fn evaluate(raw: &str) -> Evaluation {
    let stripped = strip_wrappers(raw);
    if stripped.is_empty() {
        return Evaluation::default();
    }

    let radix = if stripped.contains("0x") {
        Radix::Hex
    } else {
        Radix::Decimal
    };

    let mut values = Vec::new();
    let mut unresolved = Vec::new();
    for token in stripped.split(',').map(str::trim) {
        match Literal::parse(token) {
            Some(literal) => values.push(literal.render(radix)),
            None => {
                unresolved.push(token.to_string());
                values.push(UNRESOLVED.to_string());
            }
        }
    }

    Evaluation {
        rendered: values.join(", "),
        unresolved,
    }
}

fn strip_wrappers(raw: &str) -> String {
    let mut out = raw.to_string();
    for wrapper in WRAPPERS {
        out = out.replace(wrapper, "");
    }
    out.replace("\"true\"", "true")
        .replace("\"false\"", "false")
        .trim()
        .to_string()
}

/// Result of evaluating one argument list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Normalized, comma separated values
    pub rendered: String,
    /// Tokens that could not be parsed (each rendered as `?`)
    pub unresolved: Vec<String>,
}

/// Integer output base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Decimal,
    Hex,
}

/// A single parsed literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Bool(bool),
    Int(Integer),
    /// String literal, kept exactly as written (quotes included)
    Str(String),
}

impl Literal {
    /// Parse one trimmed token
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "true" => return Some(Literal::Bool(true)),
            "false" => return Some(Literal::Bool(false)),
            _ => {}
        }
        if is_string_literal(token) {
            return Some(Literal::Str(token.to_string()));
        }
        Integer::parse(token).map(Literal::Int)
    }

    pub fn render(&self, radix: Radix) -> String {
        match self {
            Literal::Bool(b) => b.to_string(),
            Literal::Int(i) => match radix {
                Radix::Decimal => i.to_string(),
                Radix::Hex => i.to_hex(),
            },
            Literal::Str(s) => s.clone(),
        }
    }
}

/// A quoted string with no unescaped interior quote of the same kind and
/// only complete escape sequences
fn is_string_literal(token: &str) -> bool {
    let Some(quote) = token.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return false;
    };
    if token.len() < 2 || !token.ends_with(quote) {
        return false;
    }

    let mut chars = token[1..token.len() - 1].chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if !valid_escape(&mut chars) {
                    return false;
                }
            }
            '\n' => return false,
            c if c == quote => return false,
            _ => {}
        }
    }
    true
}

/// Consume one escape sequence after its backslash
///
/// Numeric escapes need their full digit count and `\N` needs a braced
/// name. Other single characters pass through as written.
fn valid_escape(chars: &mut std::str::Chars<'_>) -> bool {
    let width = match chars.next() {
        None => return false,
        Some('x') => 2,
        Some('u') => 4,
        Some('U') => 8,
        Some('N') => {
            if chars.next() != Some('{') {
                return false;
            }
            let mut name_len = 0;
            for c in chars.by_ref() {
                if c == '}' {
                    return name_len > 0;
                }
                name_len += 1;
            }
            return false;
        }
        Some(_) => return true,
    };
    (0..width).all(|_| chars.next().is_some_and(|c| c.is_ascii_hexdigit()))
}

/// Arbitrary precision signed integer, only as much as rendering needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integer {
    negative: bool,
    /// Little-endian base 2^32 limbs, no trailing zero limbs
    limbs: Vec<u32>,
}

impl Integer {
    /// Parse an integer literal with optional unary signs
    pub fn parse(token: &str) -> Option<Self> {
        let mut negative = false;
        let mut rest = token.trim_start();
        while let Some(c) = rest.chars().next().filter(|c| *c == '-' || *c == '+') {
            if c == '-' {
                negative = !negative;
            }
            rest = rest[1..].trim_start();
        }

        let lower = rest.get(..2).map(str::to_ascii_lowercase);
        let (radix, digits, prefixed) = match lower.as_deref() {
            Some("0x") => (16, &rest[2..], true),
            Some("0o") => (8, &rest[2..], true),
            Some("0b") => (2, &rest[2..], true),
            _ => (10, rest, false),
        };

        let values = parse_digits(digits, radix, prefixed)?;
        if radix == 10 && values.len() > 1 && values[0] == 0 && values.iter().any(|d| *d != 0) {
            // Leading zeros are not a decimal literal
            return None;
        }

        let mut limbs = Vec::new();
        for digit in values {
            mul_add(&mut limbs, radix, digit);
        }
        let negative = negative && !limbs.is_empty();
        Some(Integer { negative, limbs })
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Lowercase hex with `0x` prefix, sign in front
    pub fn to_hex(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        let Some((top, rest)) = self.limbs.split_last() else {
            return "0x0".to_string();
        };
        let mut out = format!("{}0x{:x}", sign, top);
        for limb in rest.iter().rev() {
            out.push_str(&format!("{:08x}", limb));
        }
        out
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        const CHUNK: u32 = 1_000_000_000;
        let mut limbs = self.limbs.clone();
        let mut chunks = Vec::new();
        while !limbs.is_empty() {
            chunks.push(div_rem(&mut limbs, CHUNK));
        }

        if self.negative {
            f.write_str("-")?;
        }
        let mut iter = chunks.iter().rev();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for chunk in iter {
            write!(f, "{:09}", chunk)?;
        }
        Ok(())
    }
}

/// Digits of `radix`, single `_` allowed between digits (and after a prefix)
fn parse_digits(digits: &str, radix: u32, prefixed: bool) -> Option<Vec<u32>> {
    let mut values = Vec::new();
    let mut last_underscore = false;
    for c in digits.chars() {
        if c == '_' {
            if last_underscore || (values.is_empty() && !prefixed) {
                return None;
            }
            last_underscore = true;
            continue;
        }
        values.push(c.to_digit(radix)?);
        last_underscore = false;
    }
    if values.is_empty() || last_underscore {
        return None;
    }
    Some(values)
}

fn mul_add(limbs: &mut Vec<u32>, mul: u32, add: u32) {
    let mut carry = add as u64;
    for limb in limbs.iter_mut() {
        let value = (*limb as u64) * (mul as u64) + carry;
        *limb = value as u32;
        carry = value >> 32;
    }
    if carry > 0 {
        limbs.push(carry as u32);
    }
}

/// Divide in place, returning the remainder and trimming zero limbs
fn div_rem(limbs: &mut Vec<u32>, divisor: u32) -> u32 {
    let mut rem = 0u64;
    for limb in limbs.iter_mut().rev() {
        let value = (rem << 32) | (*limb as u64);
        *limb = (value / divisor as u64) as u32;
        rem = value % divisor as u64;
    }
    while limbs.last() == Some(&0) {
        limbs.pop();
    }
    rem as u32
}
