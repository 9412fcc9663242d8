//! Signature file tokenizer
//!
//! Splits the text form of a platform API file into tokens on demand.
//! Tokens borrow from the input.

use r_droid_apigen_core::ParseError;

/// How `(` and `)` are treated while reading a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParenMode {
    /// Parentheses are single-character separators
    Separator,
    /// Parentheses are part of the token; used for field values
    Identifier,
}

/// On-demand tokenizer over one file
pub struct Tokenizer<'a> {
    file: &'a str,
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(file: &'a str, text: &'a str) -> Self {
        Self {
            file,
            text,
            pos: 0,
            line: 1,
        }
    }

    /// Current 1-based line
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn file(&self) -> &'a str {
        self.file
    }

    /// An error at the current line
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.line).in_file(self.file)
    }

    pub fn next_token(&mut self) -> Result<Option<&'a str>, ParseError> {
        self.next_token_with(ParenMode::Separator)
    }

    pub fn require_token(&mut self) -> Result<&'a str, ParseError> {
        self.require_token_with(ParenMode::Separator)
    }

    pub fn require_token_with(&mut self, mode: ParenMode) -> Result<&'a str, ParseError> {
        match self.next_token_with(mode)? {
            Some(token) => Ok(token),
            None => Err(ParseError::unexpected_eof(self.line).in_file(self.file)),
        }
    }

    /// Next token, or `None` at end of input
    pub fn next_token_with(&mut self, mode: ParenMode) -> Result<Option<&'a str>, ParseError> {
        self.eat_whitespace_and_comments();

        let bytes = self.text.as_bytes();
        if self.pos >= bytes.len() {
            return Ok(None);
        }

        let start = self.pos;
        let c = bytes[self.pos];
        self.pos += 1;

        if c == b'"' {
            return self.read_string(start).map(Some);
        }
        if is_separator(c, mode) {
            return Ok(Some(&self.text[start..self.pos]));
        }
        self.read_identifier(start, mode).map(Some)
    }

    /// Read a string literal whose opening quote is at `start`
    fn read_string(&mut self, start: usize) -> Result<&'a str, ParseError> {
        let bytes = self.text.as_bytes();
        let start_line = self.line;
        let mut escaped = false;

        loop {
            let Some(&k) = bytes.get(self.pos) else {
                return Err(ParseError::new(
                    format!("Unexpected end of file for \" starting at {}", start_line),
                    start_line,
                )
                .in_file(self.file));
            };
            if k == b'\n' || k == b'\r' {
                return Err(ParseError::new(
                    format!("Unexpected newline for \" starting at {}", start_line),
                    start_line,
                )
                .in_file(self.file));
            }
            self.pos += 1;

            if escaped {
                escaped = false;
            } else if k == b'\\' {
                escaped = true;
            } else if k == b'"' {
                return Ok(&self.text[start..self.pos]);
            }
        }
    }

    /// Read an identifier starting at `start`. A `<` opens a generic span
    /// in which whitespace and commas do not end the token.
    fn read_identifier(&mut self, start: usize, mode: ParenMode) -> Result<&'a str, ParseError> {
        let bytes = self.text.as_bytes();
        let start_line = self.line;
        let mut depth = 0usize;

        loop {
            while self.pos < bytes.len()
                && !is_space(bytes[self.pos])
                && !is_separator(bytes[self.pos], mode)
            {
                self.pos += 1;
            }

            let Some(&c) = bytes.get(self.pos) else {
                break;
            };

            if c == b'<' {
                depth += 1;
                self.pos += 1;
            } else if c == b'>' && depth > 0 {
                depth -= 1;
                self.pos += 1;
            } else if depth > 0 {
                if c == b'\n' {
                    self.line += 1;
                }
                self.pos += 1;
            } else {
                break;
            }
        }

        if self.pos >= bytes.len() {
            return Err(ParseError::new(
                format!("Unexpected end of file for token starting at {}", start_line),
                self.line,
            )
            .in_file(self.file));
        }

        Ok(&self.text[start..self.pos])
    }

    fn eat_whitespace_and_comments(&mut self) {
        while self.eat_whitespace() || self.eat_comment() {}
    }

    fn eat_whitespace(&mut self) -> bool {
        let bytes = self.text.as_bytes();
        let mut ate = false;
        while self.pos < bytes.len() && is_space(bytes[self.pos]) {
            if bytes[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
            ate = true;
        }
        ate
    }

    fn eat_comment(&mut self) -> bool {
        let bytes = self.text.as_bytes();
        if bytes[self.pos..].starts_with(b"//") {
            self.pos += 2;
            while self.pos < bytes.len() && !is_newline(bytes[self.pos]) {
                self.pos += 1;
            }
            return true;
        }
        false
    }
}

/// Whether a token can be an identifier or type name
pub fn is_identifier(token: &str) -> bool {
    match token.as_bytes().first() {
        Some(&c) => c != b'"' && !is_separator(c, ParenMode::Separator),
        None => false,
    }
}

fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_newline(c: u8) -> bool {
    matches!(c, b'\n' | b'\r')
}

fn is_separator(c: u8, mode: ParenMode) -> bool {
    match c {
        b'{' | b'}' | b',' | b';' | b'<' | b'>' => true,
        b'(' | b')' => mode == ParenMode::Separator,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<&str> {
        let mut tokenizer = Tokenizer::new("test.txt", text);
        let mut result = Vec::new();
        while let Some(token) = tokenizer.next_token().unwrap() {
            result.push(token);
        }
        result
    }

    #[test]
    fn test_separators_and_identifiers() {
        assert_eq!(
            tokens("method public void draw(android.graphics.Canvas);\n"),
            vec!["method", "public", "void", "draw", "(", "android.graphics.Canvas", ")", ";"]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let text = "// header\npackage android.view { // trailing\n}\n";
        assert_eq!(tokens(text), vec!["package", "android.view", "{", "}"]);
    }

    #[test]
    fn test_generic_identifier_is_one_token() {
        assert_eq!(
            tokens("java.util.Map<java.lang.String, java.util.List<java.lang.Integer>> m;"),
            vec!["java.util.Map<java.lang.String, java.util.List<java.lang.Integer>>", "m", ";"]
        );
    }

    #[test]
    fn test_string_literal_keeps_quotes_and_escapes() {
        assert_eq!(
            tokens(r#"field public static final java.lang.String A = "a \"b\" c";"#),
            vec!["field", "public", "static", "final", "java.lang.String", "A", "=", r#""a \"b\" c""#, ";"]
        );
    }

    #[test]
    fn test_paren_identifier_mode() {
        let mut tokenizer = Tokenizer::new("test.txt", "(1 << 2); x(");
        assert_eq!(tokenizer.require_token_with(ParenMode::Identifier).unwrap(), "(1");
        assert_eq!(tokenizer.require_token().unwrap(), "<");

        let mut tokenizer = Tokenizer::new("test.txt", "foo(bar) ;");
        assert_eq!(tokenizer.require_token_with(ParenMode::Identifier).unwrap(), "foo(bar)");
        assert_eq!(tokenizer.require_token().unwrap(), ";");
    }

    #[test]
    fn test_line_numbers() {
        let mut tokenizer = Tokenizer::new("test.txt", "a\n\nb\n// c\nd;");
        tokenizer.require_token().unwrap();
        assert_eq!(tokenizer.line(), 1);
        tokenizer.require_token().unwrap();
        assert_eq!(tokenizer.line(), 3);
        tokenizer.require_token().unwrap();
        assert_eq!(tokenizer.line(), 5);
    }

    #[test]
    fn test_unterminated_string() {
        let mut tokenizer = Tokenizer::new("test.txt", "\n\"abc");
        let err = tokenizer.next_token().unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.file.as_deref(), Some("test.txt"));

        let mut tokenizer = Tokenizer::new("test.txt", "\"abc\ndef\";");
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn test_token_running_into_end_of_file() {
        let mut tokenizer = Tokenizer::new("test.txt", "package");
        assert!(tokenizer.next_token().is_err());

        let mut tokenizer = Tokenizer::new("test.txt", "java.util.List<java.lang.String ;");
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn test_require_token_at_end() {
        let mut tokenizer = Tokenizer::new("test.txt", "  \n");
        let err = tokenizer.require_token().unwrap_err();
        assert_eq!(err.message, "Unexpected end of file");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("android.view.View"));
        assert!(!is_identifier(")"));
        assert!(!is_identifier("\"x\""));
        assert!(!is_identifier(""));
    }
}
