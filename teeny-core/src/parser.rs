//! Recursive-descent recognizer for Teeny.
//!
//! There is no syntax tree: every production writes its C translation
//! into the [`Emitter`] as soon as it is matched. The grammar is
//!
//! ```text
//! program    ::= {statement}
//! statement  ::= "PRINT" (string | expression) nl
//!              | "IF" comparison "THEN" nl {statement} "ENDIF" nl
//!              | "WHILE" comparison "REPEAT" nl {statement} "ENDWHILE" nl
//!              | "LABEL" ident nl
//!              | "GOTO" ident nl
//!              | "LET" ident "=" expression nl
//!              | "INPUT" ident nl
//! comparison ::= expression (("==" | "!=" | ">" | ">=" | "<" | "<=") expression)+
//! expression ::= term {( "-" | "+" ) term}
//! term       ::= unary {( "/" | "*" ) unary}
//! unary      ::= ["+" | "-"] primary
//! primary    ::= number | ident
//! nl         ::= '\n'+
//! ```

use std::collections::{BTreeMap, HashSet};
use std::mem;

use tracing::{debug, trace};

use crate::emitter::{Emitter, is_reserved_name};
use crate::error::CoreError;
use crate::lexer::{Scanner, Token, TokenKind};

/// Names declared by a successfully recognized program.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProgramSummary {
    /// Variables in first-use order.
    pub variables: Vec<String>,
    /// Labels in declaration order.
    pub labels: Vec<String>,
}

/// One compilation's worth of recognizer state.
///
/// `current` and `peek` form the lookahead pair; both are refilled from
/// the scanner on every [`Parser::advance`].
pub struct Parser<'e> {
    scanner: Scanner,
    emitter: &'e mut Emitter,
    current: Token,
    peek: Token,
    symbols: HashSet<String>,
    labels_declared: HashSet<String>,
    /// Label name to the line of its first `GOTO`.
    labels_gotoed: BTreeMap<String, usize>,
    summary: ProgramSummary,
}

impl<'e> Parser<'e> {
    /// Prime the lookahead pair from `scanner`.
    pub fn new(mut scanner: Scanner, emitter: &'e mut Emitter) -> Result<Self, CoreError> {
        let current = scanner.next_token()?;
        let peek = scanner.next_token()?;
        Ok(Parser {
            scanner,
            emitter,
            current,
            peek,
            symbols: HashSet::new(),
            labels_declared: HashSet::new(),
            labels_gotoed: BTreeMap::new(),
            summary: ProgramSummary::default(),
        })
    }

    /// Recognize the whole token stream, then check that every `GOTO`
    /// target was declared somewhere in the program.
    pub fn program(mut self) -> Result<ProgramSummary, CoreError> {
        debug!("recognizing program");

        while self.check_token(TokenKind::Newline) {
            self.advance()?;
        }
        while !self.check_token(TokenKind::Eof) {
            self.statement()?;
        }

        // Targets may be declared after the jump, so this waits for the end.
        if let Some((name, line)) = self
            .labels_gotoed
            .iter()
            .find(|(name, _)| !self.labels_declared.contains(*name))
        {
            return Err(CoreError::UndeclaredLabel {
                line: *line,
                name: name.clone(),
            });
        }

        debug!(
            variables = self.summary.variables.len(),
            labels = self.summary.labels.len(),
            "program recognized"
        );
        Ok(self.summary)
    }

    fn statement(&mut self) -> Result<(), CoreError> {
        let line = self.current.line;
        match self.current.kind {
            TokenKind::Print => {
                trace!(line, "statement PRINT");
                self.advance()?;
                if self.check_token(TokenKind::String) {
                    let text = self.advance()?.text;
                    self.emitter.emit_line(&format!("printf(\"{text}\\n\");"));
                } else {
                    self.emitter.emit("printf(\"%.2f\\n\", (float)(");
                    self.expression()?;
                    self.emitter.emit_line("));");
                }
            }
            TokenKind::If => {
                trace!(line, "statement IF");
                self.advance()?;
                self.emitter.emit("if(");
                self.comparison()?;
                self.match_token(TokenKind::Then)?;
                self.nl()?;
                self.emitter.emit_line("){");
                self.block(TokenKind::EndIf)?;
                self.emitter.emit_line("}");
            }
            TokenKind::While => {
                trace!(line, "statement WHILE");
                self.advance()?;
                self.emitter.emit("while(");
                self.comparison()?;
                self.match_token(TokenKind::Repeat)?;
                self.nl()?;
                self.emitter.emit_line("){");
                self.block(TokenKind::EndWhile)?;
                self.emitter.emit_line("}");
            }
            TokenKind::Label => {
                trace!(line, "statement LABEL");
                self.advance()?;
                let name = self.match_token(TokenKind::Ident)?.text;
                self.check_not_reserved(&name, line)?;
                if !self.labels_declared.insert(name.clone()) {
                    return Err(CoreError::DuplicateLabel { line, name });
                }
                debug!(%name, line, "declared label");
                // The empty statement keeps a label legal right before `}`.
                self.emitter.emit_line(&format!("{name}:;"));
                self.summary.labels.push(name);
            }
            TokenKind::Goto => {
                trace!(line, "statement GOTO");
                self.advance()?;
                let name = self.match_token(TokenKind::Ident)?.text;
                self.emitter.emit_line(&format!("goto {name};"));
                self.labels_gotoed.entry(name).or_insert(line);
            }
            TokenKind::Let => {
                trace!(line, "statement LET");
                self.advance()?;
                let name = self.match_token(TokenKind::Ident)?.text;
                self.declare_variable(&name, line)?;
                self.emitter.emit(&format!("{name} = "));
                self.match_token(TokenKind::Eq)?;
                self.expression()?;
                self.emitter.emit_line(";");
            }
            TokenKind::Input => {
                trace!(line, "statement INPUT");
                self.advance()?;
                let name = self.match_token(TokenKind::Ident)?.text;
                self.declare_variable(&name, line)?;
                // A failed read zeroes the variable and discards the bad word.
                self.emitter
                    .emit_line(&format!("if(0 == scanf(\"%f\", &{name})) {{"));
                self.emitter.emit_line(&format!("{name} = 0;"));
                self.emitter.emit_line("scanf(\"%*s\");");
                self.emitter.emit_line("}");
            }
            TokenKind::Ident if self.check_peek(TokenKind::Eq) => {
                return Err(self.syntax_error(format!(
                    "assignment to {} requires LET",
                    self.current.text
                )));
            }
            kind => {
                return Err(self.syntax_error(format!(
                    "invalid statement at {:?} ({kind})",
                    self.current.text
                )));
            }
        }

        self.nl()
    }

    /// Statements up to and including the closing `end` keyword.
    fn block(&mut self, end: TokenKind) -> Result<(), CoreError> {
        while !self.check_token(end) {
            if self.check_token(TokenKind::Eof) {
                return Err(self.expected(end));
            }
            self.statement()?;
        }
        self.match_token(end)?;
        Ok(())
    }

    fn comparison(&mut self) -> Result<(), CoreError> {
        self.expression()?;
        if !self.current.kind.is_comparison() {
            return Err(self.syntax_error(format!(
                "expected comparison operator at: {:?}",
                self.current.text
            )));
        }
        while self.current.kind.is_comparison() {
            let op = self.advance()?;
            self.emitter.emit(&op.text);
            self.expression()?;
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<(), CoreError> {
        self.term()?;
        while self.check_token(TokenKind::Plus) || self.check_token(TokenKind::Minus) {
            let op = self.advance()?;
            self.emitter.emit(&op.text);
            self.term()?;
        }
        Ok(())
    }

    fn term(&mut self) -> Result<(), CoreError> {
        self.unary()?;
        while self.check_token(TokenKind::Asterisk) || self.check_token(TokenKind::Slash) {
            let op = self.advance()?;
            self.emitter.emit(&op.text);
            self.unary()?;
        }
        Ok(())
    }

    fn unary(&mut self) -> Result<(), CoreError> {
        if self.check_token(TokenKind::Plus) || self.check_token(TokenKind::Minus) {
            // Parenthesized so `5 - -3` cannot come out as `5--3`.
            let sign = self.advance()?;
            self.emitter.emit("(");
            self.emitter.emit(&sign.text);
            self.primary()?;
            self.emitter.emit(")");
            return Ok(());
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<(), CoreError> {
        match self.current.kind {
            TokenKind::Number => {}
            TokenKind::Ident => {
                if !self.symbols.contains(&self.current.text) {
                    return Err(CoreError::UndeclaredVariable {
                        line: self.current.line,
                        name: self.current.text.clone(),
                    });
                }
            }
            kind => {
                return Err(self.syntax_error(format!(
                    "unexpected token {:?} ({kind}) in expression",
                    self.current.text
                )));
            }
        }
        let token = self.advance()?;
        if token.kind == TokenKind::Number {
            self.emitter.emit(&float_literal(&token.text));
        } else {
            self.emitter.emit(&token.text);
        }
        Ok(())
    }

    fn nl(&mut self) -> Result<(), CoreError> {
        self.match_token(TokenKind::Newline)?;
        while self.check_token(TokenKind::Newline) {
            self.advance()?;
        }
        Ok(())
    }

    fn declare_variable(&mut self, name: &str, line: usize) -> Result<(), CoreError> {
        if self.symbols.contains(name) {
            return Ok(());
        }
        self.check_not_reserved(name, line)?;
        self.symbols.insert(name.to_string());
        debug!(name, "declared variable");
        self.emitter.preamble_line(&format!("float {name};"));
        self.summary.variables.push(name.to_string());
        Ok(())
    }

    fn check_not_reserved(&self, name: &str, line: usize) -> Result<(), CoreError> {
        if is_reserved_name(name) {
            return Err(CoreError::ReservedName {
                line,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn check_token(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn check_peek(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Consume the current token if it has `kind`, otherwise fail.
    fn match_token(&mut self, kind: TokenKind) -> Result<Token, CoreError> {
        if !self.check_token(kind) {
            return Err(self.expected(kind));
        }
        self.advance()
    }

    /// Shift the lookahead pair by one, returning the old current token.
    fn advance(&mut self) -> Result<Token, CoreError> {
        let next = self.scanner.next_token()?;
        let peek = mem::replace(&mut self.peek, next);
        Ok(mem::replace(&mut self.current, peek))
    }

    fn expected(&self, kind: TokenKind) -> CoreError {
        self.syntax_error(format!("expected {kind}, got {}", self.current.kind))
    }

    fn syntax_error(&self, message: String) -> CoreError {
        CoreError::ParseError {
            line: self.current.line,
            message,
        }
    }
}

/// Rewrite a numeric lexeme as a C floating constant.
///
/// Leading zeros are dropped so C never reads the literal as octal, and a
/// fraction is always present so `/` between literals is not integer division.
fn float_literal(text: &str) -> String {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, "0"));
    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };
    format!("{whole}.{fraction}")
}
