use thiserror::Error;

/// Every way a compilation can fail.
///
/// Compilation stops at the first error, so a run produces at most one
/// of these. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("lex error on line {line}: {message}")]
    LexError { line: usize, message: String },
    #[error("parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },
    #[error("semantic error on line {line}: referencing variable before assignment: {name}")]
    UndeclaredVariable { line: usize, name: String },
    #[error("semantic error on line {line}: name is reserved in generated C: {name}")]
    ReservedName { line: usize, name: String },
    #[error("semantic error on line {line}: label already exists: {name}")]
    DuplicateLabel { line: usize, name: String },
    #[error("semantic error on line {line}: attempting to GOTO to undeclared label: {name}")]
    UndeclaredLabel { line: usize, name: String },
}

impl CoreError {
    /// Source line the error was reported against.
    pub fn line(&self) -> usize {
        match self {
            CoreError::LexError { line, .. }
            | CoreError::ParseError { line, .. }
            | CoreError::UndeclaredVariable { line, .. }
            | CoreError::ReservedName { line, .. }
            | CoreError::DuplicateLabel { line, .. }
            | CoreError::UndeclaredLabel { line, .. } => *line,
        }
    }
}
