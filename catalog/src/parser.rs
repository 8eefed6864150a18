//! Delimited line splitting.

/// Splits a single line of a delimited text file into fields.
///
/// Delimiters inside a quoted span are not split points. The quote
/// characters themselves are dropped, and a doubled quote inside a quoted
/// span yields one literal quote. An unterminated span runs to the end of
/// the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParser {
    delimiter: char,
    quote: char,
}

impl LineParser {
    /// Create a parser for the given delimiter and quote character.
    pub fn new(delimiter: char, quote: char) -> Self {
        Self { delimiter, quote }
    }

    /// The field delimiter.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Split `line` into its fields.
    ///
    /// The last field is always present, so an empty line yields one empty
    /// field and a trailing delimiter yields a trailing empty field.
    pub fn split(&self, line: &str) -> Vec<String> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        let mut fields = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if c == self.quote {
                if quoted && chars.peek() == Some(&self.quote) {
                    current.push(self.quote);
                    chars.next();
                } else {
                    quoted = !quoted;
                }
            } else if c == self.delimiter && !quoted {
                fields.push(std::mem::take(&mut current));
            } else {
                current.push(c);
            }
        }

        fields.push(current);
        fields
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new(',', '"')
    }
}
