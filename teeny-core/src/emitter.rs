//! Text accumulator for the generated C translation unit.
//!
//! The emitter keeps two buffers: the preamble holds variable
//! declarations, the body holds translated statements. Declarations are
//! discovered mid-parse but must precede the body, hence the split.
//! Nothing here validates what it is given.

const PROLOGUE: &str = "#include <stdio.h>\nint main(void){\n";
const EPILOGUE: &str = "return 0;\n}\n";

/// C keywords plus the functions the generated code calls itself.
///
/// Source identifiers are alphanumeric, so underscore keywords like
/// `_Bool` can never collide and are left out.
const RESERVED_NAMES: &[&str] = &[
    "alignas", "alignof", "auto", "bool", "break", "case", "char", "const", "constexpr",
    "continue", "default", "do", "double", "else", "enum", "extern", "false", "float", "for",
    "goto", "if", "inline", "int", "long", "main", "nullptr", "printf", "register", "restrict",
    "return", "scanf", "short", "signed", "sizeof", "static", "struct", "switch", "true",
    "typedef", "typeof", "union", "unsigned", "void", "volatile", "while",
];

/// Whether `name` would clash with the C the emitter produces.
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Emitter {
    preamble: String,
    body: String,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a full line to the preamble.
    pub fn preamble_line(&mut self, text: &str) {
        self.preamble.push_str(text);
        self.preamble.push('\n');
    }

    /// Append a fragment to the body without terminating the line.
    pub fn emit(&mut self, text: &str) {
        self.body.push_str(text);
    }

    /// Append a fragment to the body and terminate the line.
    pub fn emit_line(&mut self, text: &str) {
        self.body.push_str(text);
        self.body.push('\n');
    }

    /// Produce the finished document: prologue, preamble, body, epilogue.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            PROLOGUE.len() + self.preamble.len() + self.body.len() + EPILOGUE.len(),
        );
        out.push_str(PROLOGUE);
        out.push_str(&self.preamble);
        out.push_str(&self.body);
        out.push_str(EPILOGUE);
        out
    }
}
