use tracing::debug;

use crate::emitter::Emitter;
use crate::error::CoreError;
use crate::lexer::Scanner;
use crate::parser::Parser;

/// Output of a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationArtifact {
    /// The complete C translation unit.
    pub c_source: String,
    /// Declared variables in first-use order.
    pub variables: Vec<String>,
    /// Declared labels in declaration order.
    pub labels: Vec<String>,
}

/// Translate a Teeny program into C.
///
/// Scanning, recognition and emission run interleaved in one pass; the
/// first error aborts the whole compilation and no partial output is
/// returned.
pub fn compile_c(source: &str) -> Result<CompilationArtifact, CoreError> {
    debug!(bytes = source.len(), "compiling");

    let mut emitter = Emitter::new();
    let parser = Parser::new(Scanner::new(source), &mut emitter)?;
    let summary = parser.program()?;
    let c_source = emitter.render();

    debug!(bytes = c_source.len(), "compilation finished");
    Ok(CompilationArtifact {
        c_source,
        variables: summary.variables,
        labels: summary.labels,
    })
}
