use std::collections::BTreeMap;

use crate::foundation::core::Rgba8;

/// A 1-based line/column position in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LineCol {
    /// Line number, 1-based.
    pub line: u32,
    /// Column number, 1-based.
    pub column: u32,
}

/// One lexical token of the source file, as emitted by the external tokenizer.
///
/// `kind` is the tokenizer's leaf node type (e.g. `identifier`, `comment`,
/// or the keyword text itself for keyword leaves).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TokenDescriptor {
    /// Stable token identifier (`{file_id}:{start}-{end}` span form).
    pub id: String,
    /// Lexical class reported by the tokenizer.
    pub kind: String,
    /// Literal token text.
    pub text: String,
    /// Span start (inclusive).
    pub start: LineCol,
    /// Span end (exclusive).
    pub end: LineCol,
}

/// Ordered `token_id -> descriptor` lookup for one source file.
///
/// Iteration order is the `BTreeMap` key order, keeping backdrop compilation
/// deterministic. Consumed for backdrop rendering and dwell statistics only;
/// the clock/heatmap core never touches it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenMap {
    tokens: BTreeMap<String, TokenDescriptor>,
}

impl TokenMap {
    /// Build a map from tokenizer output. Later duplicates of an id replace
    /// earlier ones, matching the extraction service's own index behavior.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = TokenDescriptor>) -> Self {
        let mut tokens = BTreeMap::new();
        for descriptor in descriptors {
            tokens.insert(descriptor.id.clone(), descriptor);
        }
        Self { tokens }
    }

    /// Look up a descriptor by token id.
    pub fn get(&self, id: &str) -> Option<&TokenDescriptor> {
        self.tokens.get(id)
    }

    /// Iterate descriptors in deterministic (id) order.
    pub fn iter(&self) -> impl Iterator<Item = &TokenDescriptor> {
        self.tokens.values()
    }

    /// Number of tokens in the map.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the map holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Keyword leaf kinds across the grammars the extraction service ships.
///
/// Tree-sitter reports keyword leaves as their literal text, so the class is
/// a membership test rather than a single kind string.
const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "case", "catch", "class", "const",
    "continue", "def", "default", "del", "do", "elif", "else", "except", "export", "extends",
    "finally", "fn", "for", "from", "function", "global", "if", "import", "in", "is", "lambda",
    "let", "match", "new", "nonlocal", "not", "or", "pass", "raise", "return", "static",
    "struct", "super", "switch", "this", "throw", "try", "typeof", "var", "while", "with",
    "yield",
];

/// Syntax color for a token kind, dark-editor palette.
pub fn token_color(kind: &str) -> Rgba8 {
    match kind {
        "comment" => Rgba8::rgb(0x6a, 0x99, 0x55),
        "identifier" | "name" | "property_identifier" => Rgba8::rgb(0x9c, 0xdc, 0xfe),
        "function" | "builtin" | "call" => Rgba8::rgb(0xdc, 0xdc, 0xaa),
        k if KEYWORDS.contains(&k) => Rgba8::rgb(0xc5, 0x86, 0xc0),
        _ => Rgba8::rgb(0xd4, 0xd4, 0xd4),
    }
}
