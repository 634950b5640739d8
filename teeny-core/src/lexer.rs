//! Scanner for Teeny source text.
//!
//! The scanner is pulled one token at a time by the parser; it never
//! materializes the whole token stream itself. Line terminators are
//! significant (they separate statements), all other whitespace is not.

use core::fmt;

use crate::error::CoreError;

/// Kind of a token produced by the scanner.
///
/// Keywords share their lexical form with identifiers and are told
/// apart only by an exact-text lookup, see [`TokenKind::keyword`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural
    Eof,
    Newline,

    // Literals and identifiers
    Number,
    Ident,
    String,

    // Keywords
    Label,
    Goto,
    Print,
    Input,
    Let,
    If,
    Then,
    EndIf,
    While,
    Repeat,
    EndWhile,

    // Operators
    Eq,       // =
    Plus,     // +
    Minus,    // -
    Asterisk, // *
    Slash,    // /
    EqEq,     // ==
    NotEq,    // !=
    Lt,       // <
    LtEq,     // <=
    Gt,       // >
    GtEq,     // >=
}

impl TokenKind {
    /// Look up a reserved word. Matching is exact and case-sensitive.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "LABEL" => TokenKind::Label,
            "GOTO" => TokenKind::Goto,
            "PRINT" => TokenKind::Print,
            "INPUT" => TokenKind::Input,
            "LET" => TokenKind::Let,
            "IF" => TokenKind::If,
            "THEN" => TokenKind::Then,
            "ENDIF" => TokenKind::EndIf,
            "WHILE" => TokenKind::While,
            "REPEAT" => TokenKind::Repeat,
            "ENDWHILE" => TokenKind::EndWhile,
            _ => return None,
        };
        Some(kind)
    }

    /// Operators accepted between the operands of a comparison.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Gt
                | TokenKind::GtEq
        )
    }

    /// Upper-case name used in diagnostics and token dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Number => "NUMBER",
            TokenKind::Ident => "IDENT",
            TokenKind::String => "STRING",
            TokenKind::Label => "LABEL",
            TokenKind::Goto => "GOTO",
            TokenKind::Print => "PRINT",
            TokenKind::Input => "INPUT",
            TokenKind::Let => "LET",
            TokenKind::If => "IF",
            TokenKind::Then => "THEN",
            TokenKind::EndIf => "ENDIF",
            TokenKind::While => "WHILE",
            TokenKind::Repeat => "REPEAT",
            TokenKind::EndWhile => "ENDWHILE",
            TokenKind::Eq => "EQ",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::Slash => "SLASH",
            TokenKind::EqEq => "EQEQ",
            TokenKind::NotEq => "NOTEQ",
            TokenKind::Lt => "LT",
            TokenKind::LtEq => "LTEQ",
            TokenKind::Gt => "GT",
            TokenKind::GtEq => "GTEQ",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token: the exact lexeme and its kind.
///
/// For string literals `text` holds the contents without the quotes.
/// `line` is the 1-based line the token starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub line: usize,
}

/// Pull-based scanner over one source text.
pub struct Scanner {
    source: String,
    index: usize,
    line: usize,
}

impl Scanner {
    /// Create a scanner. A line terminator is appended so the final
    /// statement is always newline-terminated.
    pub fn new(source: &str) -> Self {
        let mut text = String::with_capacity(source.len() + 1);
        text.push_str(source);
        text.push('\n');
        Scanner {
            source: text,
            index: 0,
            line: 1,
        }
    }

    /// Classify and return the next token.
    ///
    /// Once the input is exhausted every call returns an `Eof` token.
    pub fn next_token(&mut self) -> Result<Token, CoreError> {
        self.skip_whitespace();
        self.skip_comment();

        let line = self.line;
        let Some(ch) = self.current() else {
            return Ok(Token {
                text: String::new(),
                kind: TokenKind::Eof,
                line,
            });
        };

        let start = self.index;
        let kind = match ch {
            b'+' => self.single(TokenKind::Plus),
            b'-' => self.single(TokenKind::Minus),
            b'*' => self.single(TokenKind::Asterisk),
            b'/' => self.single(TokenKind::Slash),
            b'=' => self.with_optional_eq(TokenKind::Eq, TokenKind::EqEq),
            b'<' => self.with_optional_eq(TokenKind::Lt, TokenKind::LtEq),
            b'>' => self.with_optional_eq(TokenKind::Gt, TokenKind::GtEq),
            b'!' => {
                if self.peek() != Some(b'=') {
                    let got = self.char_at(self.index + 1);
                    return Err(self.error(format!("expected !=, got !{}", got.escape_debug())));
                }
                self.advance();
                self.advance();
                TokenKind::NotEq
            }
            b'\n' => {
                self.advance();
                self.line += 1;
                TokenKind::Newline
            }
            b'"' => return self.lex_string(),
            b'0'..=b'9' => return self.lex_number(),
            c if c.is_ascii_alphabetic() => return Ok(self.lex_ident_or_keyword()),
            _ => {
                let unknown = self.char_at(self.index);
                return Err(self.error(format!("unknown token: {}", unknown.escape_debug())));
            }
        };

        Ok(Token {
            text: self.source[start..self.index].to_string(),
            kind,
            line,
        })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn with_optional_eq(&mut self, single: TokenKind, double: TokenKind) -> TokenKind {
        self.advance();
        if self.current() == Some(b'=') {
            self.advance();
            double
        } else {
            single
        }
    }

    fn lex_string(&mut self) -> Result<Token, CoreError> {
        let line = self.line;
        // opening quote
        self.advance();

        let start = self.index;
        loop {
            match self.current() {
                Some(b'"') => break,
                // printf treats these specially, so they never reach the output.
                Some(c) if c.is_ascii_control() || c == b'\\' || c == b'%' => {
                    return Err(self.error("illegal character in string".to_string()));
                }
                Some(_) => self.advance(),
                None => return Err(self.error("unterminated string literal".to_string())),
            }
        }
        let text = self.source[start..self.index].to_string();
        // closing quote
        self.advance();

        Ok(Token {
            text,
            kind: TokenKind::String,
            line,
        })
    }

    fn lex_number(&mut self) -> Result<Token, CoreError> {
        let start = self.index;
        self.eat_digits();

        if self.current() == Some(b'.') {
            self.advance();
            if !self.current().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error("illegal character in number".to_string()));
            }
            self.eat_digits();
        }

        Ok(Token {
            text: self.source[start..self.index].to_string(),
            kind: TokenKind::Number,
            line: self.line,
        })
    }

    fn lex_ident_or_keyword(&mut self) -> Token {
        let start = self.index;
        while self.current().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.advance();
        }

        let text = &self.source[start..self.index];
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Ident);
        Token {
            text: text.to_string(),
            kind,
            line: self.line,
        }
    }

    fn eat_digits(&mut self) {
        while self.current().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current(), Some(b' ' | b'\t' | b'\r')) {
            self.advance();
        }
    }

    fn skip_comment(&mut self) {
        if self.current() != Some(b'#') {
            return;
        }
        while !matches!(self.current(), Some(b'\n') | None) {
            self.advance();
        }
    }

    fn current(&self) -> Option<u8> {
        self.source.as_bytes().get(self.index).copied()
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.index + 1).copied()
    }

    fn advance(&mut self) {
        if self.index < self.source.len() {
            self.index += 1;
        }
    }

    /// Decode the full character starting at `index`, for diagnostics.
    fn char_at(&self, index: usize) -> char {
        self.source
            .get(index..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('\0')
    }

    fn error(&self, message: String) -> CoreError {
        CoreError::LexError {
            line: self.line,
            message,
        }
    }
}

/// Drain a fresh scanner over `source`, up to and including `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CoreError> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("tokenize")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn scans_operators_with_lookahead() {
        assert_eq!(
            kinds("+ - * / = == != < <= > >="),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Asterisk,
                TokenKind::Slash,
                TokenKind::Eq,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn adjacent_operators_split_greedily() {
        let tokens = tokenize("a<=b==c").expect("tokenize");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "<=", "b", "==", "c", "\n", ""]);
    }

    #[test]
    fn keywords_need_exact_match() {
        assert_eq!(
            kinds("LET letter LETX print WHILE"),
            vec![
                TokenKind::Let,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::While,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn identifiers_are_alphanumeric() {
        let tokens = tokenize("x1y2").expect("tokenize");
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text, "x1y2");
    }

    #[test]
    fn scans_numeric_literals() {
        for text in ["123", "1.5", "007", "0.25"] {
            let tokens = tokenize(text).expect("tokenize");
            assert_eq!(tokens[0].kind, TokenKind::Number);
            assert_eq!(tokens[0].text, text);
        }
    }

    #[test]
    fn rejects_trailing_decimal_point() {
        let err = tokenize("1.").unwrap_err();
        assert!(matches!(err, CoreError::LexError { .. }));

        let err = tokenize("LET x = 2.y").unwrap_err();
        assert!(err.to_string().contains("illegal character in number"));
    }

    #[test]
    fn scans_string_contents_without_quotes() {
        let tokens = tokenize("PRINT \"hello, world!\"").expect("tokenize");
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].text, "hello, world!");
    }

    #[test]
    fn rejects_printf_sensitive_string_characters() {
        for source in ["\"100%\"", "\"a\\n\"", "\"tab\there\"", "\"open"] {
            let err = tokenize(source).unwrap_err();
            assert!(matches!(err, CoreError::LexError { .. }), "{source:?}");
        }
    }

    #[test]
    fn bare_bang_is_an_error() {
        let err = tokenize("a ! b").unwrap_err();
        assert_eq!(
            err,
            CoreError::LexError {
                line: 1,
                message: "expected !=, got ! ".to_string(),
            }
        );
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = tokenize("LET a = 1\nLET b = a @ 2").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.to_string().contains("unknown token: @"));

        let err = tokenize("é").unwrap_err();
        assert!(err.to_string().contains('é'));
    }

    #[test]
    fn skips_comments_up_to_line_end() {
        assert_eq!(
            kinds("# a comment\nPRINT 1 # trailing"),
            vec![
                TokenKind::Newline,
                TokenKind::Print,
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn carriage_returns_are_whitespace() {
        assert_eq!(
            kinds("LET a = 1\r\nPRINT a\r\n"),
            kinds("LET a = 1\nPRINT a\n")
        );
    }

    #[test]
    fn tracks_line_numbers() {
        let tokens = tokenize("PRINT 1\n\nPRINT 2").expect("tokenize");
        let print_lines: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Print)
            .map(|t| t.line)
            .collect();
        assert_eq!(print_lines, vec![1, 3]);
    }

    #[test]
    fn eof_repeats_after_end_of_input() {
        let mut scanner = Scanner::new("");
        assert_eq!(scanner.next_token().expect("newline").kind, TokenKind::Newline);
        for _ in 0..3 {
            assert_eq!(scanner.next_token().expect("eof").kind, TokenKind::Eof);
        }
    }

    #[test]
    fn display_uses_upper_case_names() {
        assert_eq!(TokenKind::EndIf.to_string(), "ENDIF");
        assert_eq!(TokenKind::GtEq.to_string(), "GTEQ");
    }
}
