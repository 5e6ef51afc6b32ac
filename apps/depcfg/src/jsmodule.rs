//! Reader for configuration written as a JavaScript module.
//!
//! Accepts a single object literal exported via `module.exports = ...` or
//! `export default ...` (a bare literal is accepted too) and converts it to
//! JSON. Supported syntax covers what hand-written bot configs use:
//! single/double/backtick strings without interpolation, unquoted keys,
//! `//` and `/* */` comments, trailing commas, `true|false|null|undefined`,
//! and decimal numbers. Anything executable (calls, spreads, identifiers
//! used as values) is rejected.

use serde_json::{Map, Number, Value as Json};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct JsParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Parse a JavaScript module exporting one object literal.
pub fn parse_module(src: &str) -> Result<Json, JsParseError> {
    let mut p = Parser::new(src);
    p.skip_trivia()?;
    if p.eat_word("module.exports") {
        p.skip_trivia()?;
        p.expect('=')?;
    } else if p.eat_word("export") {
        p.skip_trivia()?;
        if !p.eat_word("default") {
            return Err(p.error("expected `default` after `export`"));
        }
    }
    p.skip_trivia()?;
    let value = p.value()?;
    p.skip_trivia()?;
    if p.peek() == Some(';') {
        p.bump();
        p.skip_trivia()?;
    }
    if p.peek().is_some() {
        return Err(p.error("unexpected trailing content"));
    }
    Ok(value)
}

/// Render a JSON value as a module that `parse_module` reads back.
pub fn render_module(value: &Json) -> Result<String, serde_json::Error> {
    Ok(format!(
        "module.exports = {};\n",
        serde_json::to_string_pretty(value)?
    ))
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    src: &'a str,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            src,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> JsParseError {
        let mut line = 1;
        let mut column = 1;
        for c in self.chars.iter().take(self.pos) {
            if *c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        JsParseError {
            line,
            column,
            message: message.into(),
        }
    }

    fn expect(&mut self, want: char) -> Result<(), JsParseError> {
        match self.peek() {
            Some(c) if c == want => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected `{want}`, found `{c}`"))),
            None => Err(self.error(format!("expected `{want}`, found end of input"))),
        }
    }

    /// Consume `word` when it is next and not followed by an identifier char.
    fn eat_word(&mut self, word: &str) -> bool {
        let n = word.chars().count();
        let matches = word
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c));
        if matches && !self.peek_at(n).is_some_and(is_ident_continue) {
            self.pos += n;
            true
        } else {
            false
        }
    }

    fn skip_trivia(&mut self) -> Result<(), JsParseError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.pos += 1;
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                (Some('/'), Some('*')) => {
                    self.pos += 2;
                    loop {
                        match (self.peek(), self.peek_at(1)) {
                            (Some('*'), Some('/')) => {
                                self.pos += 2;
                                break;
                            }
                            (Some(_), _) => self.pos += 1,
                            (None, _) => return Err(self.error("unterminated block comment")),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn value(&mut self) -> Result<Json, JsParseError> {
        match self.peek() {
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some(q @ ('\'' | '"' | '`')) => self.string(q).map(Json::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if is_ident_start(c) => {
                let start = self.pos;
                let word = self.identifier();
                match word.as_str() {
                    "true" => Ok(Json::Bool(true)),
                    "false" => Ok(Json::Bool(false)),
                    "null" | "undefined" => Ok(Json::Null),
                    _ => {
                        self.pos = start;
                        Err(self.error(format!("unsupported expression `{word}`")))
                    }
                }
            }
            Some(c) => Err(self.error(format!("unexpected character `{c}`"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn object(&mut self) -> Result<Json, JsParseError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Json::Object(map));
            }
            let key = match self.peek() {
                Some(q @ ('\'' | '"' | '`')) => self.string(q)?,
                Some(c) if is_ident_start(c) => self.identifier(),
                Some(c) if c.is_ascii_digit() => self.number()?.to_string(),
                Some('.') if self.peek_at(1) == Some('.') => {
                    return Err(self.error("spread syntax is not supported"))
                }
                Some(c) => return Err(self.error(format!("expected object key, found `{c}`"))),
                None => return Err(self.error("unterminated object")),
            };
            self.skip_trivia()?;
            self.expect(':')?;
            self.skip_trivia()?;
            let value = self.value()?;
            map.insert(key, value);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {}
                Some(c) => return Err(self.error(format!("expected `,` or `}}`, found `{c}`"))),
                None => return Err(self.error("unterminated object")),
            }
        }
    }

    fn array(&mut self) -> Result<Json, JsParseError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(Json::Array(items));
            }
            items.push(self.value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {}
                Some(c) => return Err(self.error(format!("expected `,` or `]`, found `{c}`"))),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn identifier(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if out.is_empty() && !is_ident_start(c) || !out.is_empty() && !is_ident_continue(c) {
                break;
            }
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn string(&mut self, quote: char) -> Result<String, JsParseError> {
        self.expect(quote)?;
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error("unterminated string"));
            };
            match c {
                c if c == quote => return Ok(out),
                '$' if quote == '`' && self.peek() == Some('{') => {
                    self.pos -= 1;
                    return Err(self.error("template interpolation is not supported"));
                }
                '\n' if quote != '`' => {
                    return Err(self.error("unterminated string"));
                }
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), JsParseError> {
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated escape sequence"));
        };
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // line continuation
            '\n' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.pos += 1;
                }
            }
            'x' => {
                let code = self.hex_digits(2)?;
                out.push(self.char_from(code)?);
            }
            'u' => {
                let code = if self.peek() == Some('{') {
                    self.pos += 1;
                    let mut code: u32 = 0;
                    let mut digits = 0;
                    while let Some(d) = self.peek().and_then(|c| c.to_digit(16)) {
                        code = code.saturating_mul(16).saturating_add(d);
                        digits += 1;
                        self.pos += 1;
                    }
                    self.expect('}')?;
                    if digits == 0 {
                        return Err(self.error("empty unicode escape"));
                    }
                    code
                } else {
                    let high = self.hex_digits(4)?;
                    if (0xD800..0xDC00).contains(&high)
                        && self.peek() == Some('\\')
                        && self.peek_at(1) == Some('u')
                    {
                        self.pos += 2;
                        let low = self.hex_digits(4)?;
                        if !(0xDC00..0xE000).contains(&low) {
                            return Err(self.error("unpaired surrogate in unicode escape"));
                        }
                        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                    } else {
                        high
                    }
                };
                out.push(self.char_from(code)?);
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn hex_digits(&mut self, n: usize) -> Result<u32, JsParseError> {
        let mut code = 0;
        for _ in 0..n {
            let Some(d) = self.peek().and_then(|c| c.to_digit(16)) else {
                return Err(self.error("invalid hexadecimal escape"));
            };
            code = code * 16 + d;
            self.pos += 1;
        }
        Ok(code)
    }

    fn char_from(&self, code: u32) -> Result<char, JsParseError> {
        char::from_u32(code).ok_or_else(|| self.error(format!("invalid code point {code:#x}")))
    }

    fn number(&mut self) -> Result<Json, JsParseError> {
        let start = self.pos;
        let mut text = String::new();
        if let Some(sign @ ('-' | '+')) = self.peek() {
            if sign == '-' {
                text.push(sign);
            }
            self.pos += 1;
        }
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '-' || c == '+') && matches!(text.chars().last(), Some('e' | 'E'));
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '_' || exponent_sign {
                if c != '_' {
                    text.push(c);
                }
                self.pos += 1;
            } else {
                break;
            }
        }
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Json::Number(i.into()));
        }
        match text.parse::<f64>().ok().and_then(Number::from_f64) {
            Some(n) => Ok(Json::Number(n)),
            None => {
                self.pos = start;
                Err(self.error(format!("invalid number `{}`", self.slice(start, text.len()))))
            }
        }
    }

    fn slice(&self, start: usize, len: usize) -> String {
        self.src.chars().skip(start).take(len.max(1)).collect()
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
