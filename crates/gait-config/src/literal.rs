//! Literal-only value evaluator.
//!
//! A recursive-descent parser over the value grammar used in config files:
//! numbers, quoted strings, `True`/`False`, and `[...]`, `(...)`, `{...}`
//! containers nested to any depth up to [`MAX_DEPTH`]. Identifiers, calls,
//! attribute access and operators are rejected; nothing is ever evaluated.

use crate::value::Value;

/// Deepest container nesting accepted.
pub const MAX_DEPTH: usize = 128;

/// Why a piece of text is not a valid literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct LiteralError {
    /// Byte offset into the parsed text.
    pub offset: usize,
    pub message: String,
}

/// Parses `text` as a single literal value.
///
/// # Example
/// ```
/// use gait_config::literal::parse_literal;
/// use gait_config::Value;
///
/// let v = parse_literal("[1, -2.5e-3, 'x', (True,)]").unwrap();
/// assert_eq!(v.as_list().unwrap().len(), 4);
/// assert!(parse_literal("__import__('os')").is_err());
/// ```
pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    if parser.at_end() {
        return Err(parser.error("expected a value"));
    }
    let value = parser.parse_value(0)?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset,
            message: message.into(),
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth > MAX_DEPTH {
            return Err(self.error("containers nested too deeply"));
        }
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('[') => {
                self.bump();
                self.parse_seq(']', depth).map(Value::List)
            }
            Some('(') => {
                self.bump();
                self.parse_paren(depth)
            }
            Some('{') => {
                self.bump();
                self.parse_dict(depth)
            }
            Some('+') | Some('-') => self.parse_signed(),
            Some(c) if c.is_ascii_digit() => self.parse_number(false),
            Some('.') if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.parse_number(false)
            }
            Some(_) if self.at_string_start() => self.parse_strings(),
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_word(),
            Some(c) => Err(self.error(format!("unexpected character {c:?}"))),
        }
    }

    /// Elements separated by commas up to `close`; a trailing comma is fine.
    fn parse_seq(&mut self, close: char, depth: usize) -> Result<Vec<Value>, LiteralError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.parse_value(depth + 1)?);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            if self.eat(close) {
                return Ok(items);
            }
            return Err(self.expected_separator(close));
        }
    }

    /// `()` and `(x,)` are tuples, `(x)` is just `x`.
    fn parse_paren(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.skip_ws();
        if self.eat(')') {
            return Ok(Value::Tuple(Vec::new()));
        }
        let first = self.parse_value(depth + 1)?;
        self.skip_ws();
        if self.eat(')') {
            return Ok(first);
        }
        if !self.eat(',') {
            return Err(self.expected_separator(')'));
        }
        let mut items = vec![first];
        items.extend(self.parse_seq(')', depth)?);
        Ok(Value::Tuple(items))
    }

    fn parse_dict(&mut self, depth: usize) -> Result<Value, LiteralError> {
        let mut entries: Vec<(Value, Value)> = Vec::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                return Ok(Value::Dict(entries));
            }
            let key_pos = self.pos;
            let key = self.parse_value(depth + 1)?;
            if !matches!(
                key,
                Value::String(_) | Value::Int(_) | Value::Float(_) | Value::Bool(_)
            ) {
                return Err(self.error_at(
                    key_pos,
                    format!("{} is not a valid dict key", key.type_name()),
                ));
            }
            self.skip_ws();
            if !self.eat(':') {
                return Err(self.error_unless_end("expected ':' after dict key"));
            }
            let value = self.parse_value(depth + 1)?;
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                return Ok(Value::Dict(entries));
            }
            return Err(self.expected_separator('}'));
        }
    }

    fn expected_separator(&self, close: char) -> LiteralError {
        self.error_unless_end(format!("expected ',' or '{close}'"))
    }

    fn error_unless_end(&self, message: impl Into<String>) -> LiteralError {
        if self.at_end() {
            self.error("unexpected end of input")
        } else {
            self.error(message)
        }
    }

    fn parse_signed(&mut self) -> Result<Value, LiteralError> {
        let negative = self.bump() == Some('-');
        self.skip_ws();
        match self.peek() {
            Some(c) if c.is_ascii_digit() => self.parse_number(negative),
            Some('.') if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.parse_number(negative)
            }
            _ => Err(self.error("a sign must be followed by a number")),
        }
    }

    fn parse_number(&mut self, negative: bool) -> Result<Value, LiteralError> {
        let start = self.pos;
        if self.peek() == Some('0') {
            let radix = match self.peek_nth(1) {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.pos += 2;
                let digits = self.take_digits(|c| c.is_digit(radix))?;
                self.reject_trailing_word(start)?;
                return self.int_from(&digits, radix, negative, start);
            }
        }

        let mut is_float = false;
        let mut text = if self.peek() == Some('.') {
            String::new()
        } else {
            self.take_digits(|c| c.is_ascii_digit())?
        };
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            text.push('.');
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                text.push_str(&self.take_digits(|c| c.is_ascii_digit())?);
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = self.peek_nth(1);
            let digit_at = if matches!(sign, Some('+' | '-')) { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.bump();
                text.push('e');
                if digit_at == 2 {
                    text.push(self.bump().unwrap_or('+'));
                }
                text.push_str(&self.take_digits(|c| c.is_ascii_digit())?);
            }
        }
        self.reject_trailing_word(start)?;

        if is_float {
            let magnitude: f64 = text
                .parse()
                .map_err(|_| self.error_at(start, "invalid float literal"))?;
            return Ok(Value::Float(if negative { -magnitude } else { magnitude }));
        }
        if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c != '0') {
            return Err(self.error_at(
                start,
                "leading zeros in decimal integer literals are not permitted",
            ));
        }
        self.int_from(&text, 10, negative, start)
    }

    /// Digits with single `_` separators between them; underscores are dropped.
    fn take_digits(&mut self, is_digit: impl Fn(char) -> bool) -> Result<String, LiteralError> {
        let mut digits = String::new();
        loop {
            match self.peek() {
                Some(c) if is_digit(c) => {
                    digits.push(c);
                    self.bump();
                }
                Some('_') if !digits.is_empty() && self.peek_nth(1).is_some_and(&is_digit) => {
                    self.bump();
                }
                _ => break,
            }
        }
        if digits.is_empty() {
            return Err(self.error("expected digits"));
        }
        Ok(digits)
    }

    fn reject_trailing_word(&self, start: usize) -> Result<(), LiteralError> {
        match self.peek() {
            Some(c) if c.is_alphanumeric() || c == '_' || c == '.' => {
                Err(self.error_at(start, "invalid numeric literal"))
            }
            _ => Ok(()),
        }
    }

    fn int_from(
        &self,
        digits: &str,
        radix: u32,
        negative: bool,
        start: usize,
    ) -> Result<Value, LiteralError> {
        let out_of_range = || self.error_at(start, "integer literal out of range");
        let magnitude = u64::from_str_radix(digits, radix).map_err(|_| out_of_range())?;
        let value = if negative {
            0i64.checked_sub_unsigned(magnitude).ok_or_else(out_of_range)?
        } else {
            i64::try_from(magnitude).map_err(|_| out_of_range())?
        };
        Ok(Value::Int(value))
    }

    /// Optional `r`/`u` prefix followed by a quote.
    fn at_string_start(&self) -> bool {
        match self.peek() {
            Some('\'' | '"') => true,
            Some('r' | 'R' | 'u' | 'U') => matches!(self.peek_nth(1), Some('\'' | '"')),
            _ => false,
        }
    }

    /// One or more adjacent string literals, concatenated.
    fn parse_strings(&mut self) -> Result<Value, LiteralError> {
        let mut out = self.parse_string()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            if self.at_string_start() {
                out.push_str(&self.parse_string()?);
            } else {
                self.pos = save;
                return Ok(Value::String(out));
            }
        }
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let mut raw = false;
        match self.peek() {
            Some('r' | 'R') => {
                raw = true;
                self.bump();
            }
            Some('u' | 'U') => {
                self.bump();
            }
            _ => {}
        }
        let quote = self.bump().unwrap_or('\'');
        let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.pos += 2 * quote.len_utf8();
        }

        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error_at(start, "unterminated string literal"));
            };
            if c == quote {
                if !triple {
                    return Ok(out);
                }
                if self.peek() == Some(quote) && self.peek_nth(1) == Some(quote) {
                    self.pos += 2 * quote.len_utf8();
                    return Ok(out);
                }
                out.push(c);
            } else if c == '\\' {
                if raw {
                    out.push('\\');
                    if let Some(next) = self.bump() {
                        out.push(next);
                    }
                } else {
                    self.parse_escape(&mut out)?;
                }
            } else {
                out.push(c);
            }
        }
    }

    /// Handles the text after a backslash. Unknown escapes are kept as-is.
    fn parse_escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let escape_pos = self.pos - 1;
        let Some(c) = self.bump() else {
            return Err(self.error_at(escape_pos, "unterminated string literal"));
        };
        match c {
            '\\' | '\'' | '"' => out.push(c),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                out.push(self.char_from(code, escape_pos)?);
            }
            'x' => out.push(self.hex_escape(2, escape_pos)?),
            'u' => out.push(self.hex_escape(4, escape_pos)?),
            'U' => out.push(self.hex_escape(8, escape_pos)?),
            'N' => return Err(self.error_at(escape_pos, "named unicode escapes are not supported")),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, len: usize, escape_pos: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..len {
            let digit = self
                .peek()
                .and_then(|d| d.to_digit(16))
                .ok_or_else(|| self.error_at(escape_pos, "truncated escape sequence"))?;
            code = code * 16 + digit;
            self.bump();
        }
        self.char_from(code, escape_pos)
    }

    fn char_from(&self, code: u32, escape_pos: usize) -> Result<char, LiteralError> {
        char::from_u32(code)
            .ok_or_else(|| self.error_at(escape_pos, "escape is not a valid character"))
    }

    /// `True`, `False`, or a rejected identifier.
    fn parse_word(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let word = &self.src[start..self.pos];
        match word {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            _ if matches!(self.peek(), Some('\'' | '"')) => Err(self.error_at(
                start,
                format!("string prefix '{word}' is not supported"),
            )),
            _ => Err(self.error_at(
                start,
                format!("identifiers are not allowed in literals: '{word}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(text: &str) -> Value {
        parse_literal(text).unwrap_or_else(|e| panic!("{text:?} failed: {e}"))
    }

    fn err(text: &str) -> LiteralError {
        parse_literal(text).expect_err(text)
    }

    #[test]
    fn test_integers() {
        assert_eq!(ok("45"), Value::Int(45));
        assert_eq!(ok("-7"), Value::Int(-7));
        assert_eq!(ok("+7"), Value::Int(7));
        assert_eq!(ok("- 7"), Value::Int(-7));
        assert_eq!(ok("0"), Value::Int(0));
        assert_eq!(ok("000"), Value::Int(0));
        assert_eq!(ok("1_000"), Value::Int(1000));
        assert_eq!(ok("0x1F"), Value::Int(31));
        assert_eq!(ok("0o17"), Value::Int(15));
        assert_eq!(ok("-0b101"), Value::Int(-5));
        assert_eq!(ok("-9223372036854775808"), Value::Int(i64::MIN));
    }

    #[test]
    fn test_integer_errors() {
        assert_eq!(err("9223372036854775808").message, "integer literal out of range");
        assert!(err("012").message.contains("leading zeros"));
        assert_eq!(err("1j").message, "invalid numeric literal");
        assert_eq!(err("1__0").message, "invalid numeric literal");
        assert_eq!(err("-").message, "a sign must be followed by a number");
    }

    #[test]
    fn test_floats() {
        assert_eq!(ok("1.5"), Value::Float(1.5));
        assert_eq!(ok("1."), Value::Float(1.0));
        assert_eq!(ok(".5"), Value::Float(0.5));
        assert_eq!(ok("-.5e-3"), Value::Float(-0.0005));
        assert_eq!(ok("1e3"), Value::Float(1000.0));
        assert_eq!(ok("2E+2"), Value::Float(200.0));
        assert_eq!(ok("1e999"), Value::Float(f64::INFINITY));
        assert!(err("1.2.3").message.contains("numeric"));
    }

    #[test]
    fn test_strings() {
        assert_eq!(ok("'abc'"), Value::from("abc"));
        assert_eq!(ok("\"C:/Vicon\""), Value::from("C:/Vicon"));
        assert_eq!(ok(r"'a\'b'"), Value::from("a'b"));
        assert_eq!(ok(r"'tab\there'"), Value::from("tab\there"));
        assert_eq!(ok(r"'\x41\u00e4\101'"), Value::from("Aä\u{41}"));
        assert_eq!(ok(r"'C:\Vicon'"), Value::from("C:\\Vicon"));
        assert_eq!(ok(r"r'C:\new'"), Value::from("C:\\new"));
        assert_eq!(ok("u'x'"), Value::from("x"));
        assert_eq!(ok("'''it's'''"), Value::from("it's"));
        assert_eq!(ok("'abc' \"def\""), Value::from("abcdef"));
        assert_eq!(ok("('long '\n 'string')"), Value::from("long string"));
    }

    #[test]
    fn test_string_errors() {
        assert_eq!(err("'abc").message, "unterminated string literal");
        assert!(err("b'abc'").message.contains("prefix"));
        assert!(err(r"'\N{DASH}'").message.contains("named"));
        assert!(err(r"'\x4'").message.contains("truncated"));
    }

    #[test]
    fn test_bools_and_identifiers() {
        assert_eq!(ok("True"), Value::Bool(true));
        assert_eq!(ok("False"), Value::Bool(false));
        assert!(err("None").message.contains("identifiers"));
        assert!(err("true").message.contains("identifiers"));
        assert!(err("os.system('ls')").message.contains("identifiers"));
    }

    #[test]
    fn test_containers() {
        assert_eq!(ok("[]"), Value::List(vec![]));
        assert_eq!(ok("[1, 2,]"), Value::from(vec![1, 2]));
        assert_eq!(ok("()"), Value::Tuple(vec![]));
        assert_eq!(ok("(1,)"), Value::Tuple(vec![Value::Int(1)]));
        assert_eq!(ok("(1)"), Value::Int(1));
        assert_eq!(
            ok("(-.5e-3, .5e-3)"),
            Value::Tuple(vec![Value::Float(-0.0005), Value::Float(0.0005)])
        );
        assert_eq!(
            ok("{'RGas': [[16, 50]], 2: 'x'}"),
            Value::Dict(vec![
                (
                    Value::from("RGas"),
                    Value::List(vec![Value::from(vec![16, 50])])
                ),
                (Value::Int(2), Value::from("x")),
            ])
        );
        assert_eq!(ok("{}"), Value::Dict(vec![]));
    }

    #[test]
    fn test_duplicate_dict_key_keeps_last_value_in_place() {
        assert_eq!(
            ok("{'a': 1, 'b': 2, 'a': 3}"),
            Value::Dict(vec![
                (Value::from("a"), Value::Int(3)),
                (Value::from("b"), Value::Int(2)),
            ])
        );
    }

    #[test]
    fn test_container_errors() {
        assert_eq!(err("{1,2").message, "expected ':' after dict key");
        assert_eq!(err("{1: 2").message, "unexpected end of input");
        assert_eq!(err("[1 2]").message, "expected ',' or ']'");
        assert!(err("{[1]: 2}").message.contains("not a valid dict key"));
        assert_eq!(err("[1] [2]").message, "unexpected trailing input");
        assert_eq!(err("1 + 2").message, "unexpected trailing input");
        assert_eq!(err("").message, "expected a value");
        assert_eq!(err("[,]").message, "unexpected character ','");
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 2), "]".repeat(MAX_DEPTH + 2));
        assert!(err(&deep).message.contains("nested too deeply"));
        let ok_depth = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse_literal(&ok_depth).is_ok());
    }
}
