//! Core of the Teeny to C compiler.
//!
//! Compilation is a single pass:
//!
//!   source .teeny
//!     -> lexer    (tokens, pulled on demand)
//!     -> parser   (grammar + variable/label checks, drives the emitter)
//!     -> emitter  (preamble + body buffers, rendered to C)
//!
//! Front-ends such as the CLI should call [`compile_c`] rather than
//! wiring the stages together themselves.

// ---------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------

pub mod error;

// ---------------------------------------------------------------------
// Front-end: scanning and recognition
// ---------------------------------------------------------------------

pub mod lexer;
pub mod parser;

// ---------------------------------------------------------------------
// Back-end: C text emission and orchestration
// ---------------------------------------------------------------------

pub mod emitter;
pub mod compiler;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use compiler::{CompilationArtifact, compile_c};
pub use error::CoreError;
pub use lexer::{Token, TokenKind, tokenize};
