//! Value grammars for header fields.
//!
//! number := [+-]? digit* ('.' digit*)?   (at least one digit)
//! scalar := <anything> number <anything>        first number wins
//! slit   := <anything> '(' number ',' number ')' number ('x' | 'X') number <anything>

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldParseError {
    #[error("no numeric value in '{text}'")]
    MissingNumber { text: String },
    #[error("expected {expected} at column {column} of '{text}'")]
    SlitShape {
        text: String,
        expected: &'static str,
        column: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlitGeometry {
    pub centre_x: f64,
    pub centre_y: f64,
    pub width: f64,
    pub height: f64,
}

impl SlitGeometry {
    /// Values in sub-field order: centre_x, centre_y, width, height.
    pub const fn values(&self) -> [f64; 4] {
        [self.centre_x, self.centre_y, self.width, self.height]
    }
}

/// Lexes a number starting exactly at byte `start`, returning it and the end offset.
pub fn lex_number(text: &str, start: usize) -> Option<(f64, usize)> {
    let bytes = text.as_bytes();
    let mut end = start;
    if matches!(bytes.get(end), Some(b'+' | b'-')) {
        end += 1;
    }

    let integer_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digit_count = end - integer_start;

    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }
        let fraction_digits = fraction_end - fraction_start;
        if digit_count + fraction_digits > 0 {
            digit_count += fraction_digits;
            end = fraction_end;
        }
    }

    if digit_count == 0 {
        return None;
    }

    text[start..end].parse::<f64>().ok().map(|value| (value, end))
}

/// Finds the first number at or after byte `from`.
pub fn find_number(text: &str, from: usize) -> Option<(f64, usize, usize)> {
    (from..text.len())
        .filter(|offset| text.is_char_boundary(*offset))
        .find_map(|offset| lex_number(text, offset).map(|(value, end)| (value, offset, end)))
}

pub fn parse_scalar(text: &str) -> Result<f64, FieldParseError> {
    find_number(text, 0)
        .map(|(value, _, _)| value)
        .ok_or_else(|| FieldParseError::MissingNumber {
            text: text.to_string(),
        })
}

pub fn parse_slit(text: &str) -> Result<SlitGeometry, FieldParseError> {
    let open = text.find('(').ok_or_else(|| FieldParseError::SlitShape {
        text: text.to_string(),
        expected: "'('",
        column: 0,
    })?;

    let mut cursor = Cursor {
        text,
        position: open + 1,
    };
    let centre_x = cursor.number("centre x")?;
    cursor.literal(b',', "','")?;
    let centre_y = cursor.number("centre y")?;
    cursor.literal(b')', "')'")?;
    let width = cursor.number("width")?;
    cursor.literal(b'x', "'x'")?;
    let height = cursor.number("height")?;

    Ok(SlitGeometry {
        centre_x,
        centre_y,
        width,
        height,
    })
}

struct Cursor<'a> {
    text: &'a str,
    position: usize,
}

impl Cursor<'_> {
    fn skip_whitespace(&mut self) {
        let bytes = self.text.as_bytes();
        while bytes
            .get(self.position)
            .is_some_and(u8::is_ascii_whitespace)
        {
            self.position += 1;
        }
    }

    fn number(&mut self, expected: &'static str) -> Result<f64, FieldParseError> {
        self.skip_whitespace();
        let (value, end) = lex_number(self.text, self.position).ok_or_else(|| self.error(expected))?;
        self.position = end;
        Ok(value)
    }

    fn literal(&mut self, byte: u8, expected: &'static str) -> Result<(), FieldParseError> {
        self.skip_whitespace();
        match self.text.as_bytes().get(self.position) {
            Some(found) if found.eq_ignore_ascii_case(&byte) => {
                self.position += 1;
                Ok(())
            }
            _ => Err(self.error(expected)),
        }
    }

    fn error(&self, expected: &'static str) -> FieldParseError {
        FieldParseError::SlitShape {
            text: self.text.to_string(),
            expected,
            column: self.position,
        }
    }
}
