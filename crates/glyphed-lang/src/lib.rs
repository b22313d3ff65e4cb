#![warn(missing_docs)]
//! `glyphed-lang` - data-driven language grammar descriptors for `glyphed`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any
//! regex or parsing machinery. A [`LanguageDefinition`] is a read-only bundle
//! of keyword sets, comment delimiters, a preprocessor marker, an optional
//! native tokenizer callback, and a table of fallback token *pattern strings*.
//! The editor kernel compiles the pattern strings once per language switch;
//! nothing in this crate is ever mutated after construction.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Color class assigned to a glyph by the colorizer.
///
/// Mapping classes to concrete colors is the renderer's business; the kernel
/// only ever deals in these identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteIndex {
    /// Unclassified text.
    #[default]
    Default,
    /// Language keyword (`if`, `while`, ...).
    Keyword,
    /// Numeric literal.
    Number,
    /// String literal.
    String,
    /// Character literal.
    CharLiteral,
    /// Operator or punctuation.
    Punctuation,
    /// Preprocessor directive text.
    Preprocessor,
    /// Plain identifier.
    Identifier,
    /// Identifier found in the language's known-identifier set.
    KnownIdentifier,
    /// Identifier found in the language's preprocessor-identifier set.
    PreprocIdentifier,
    /// Single-line comment.
    Comment,
    /// Multi-line comment.
    MultiLineComment,
}

/// Native tokenizer callback.
///
/// Receives the not-yet-classified tail of a line and, when it recognizes a
/// token at the very start of the input, returns the token's byte length and
/// its color class. Returning `None` sends the colorizer to the language's
/// fallback pattern table instead.
pub type TokenizeFn = fn(&str) -> Option<(usize, PaletteIndex)>;

/// Identifies a built-in language grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    /// ISO C.
    C,
    /// C++.
    Cpp,
    /// Python.
    Python,
    /// Lua.
    Lua,
    /// JSON.
    Json,
    /// SQL (case-insensitive keywords).
    Sql,
}

/// Read-only grammar descriptor consumed by the editor kernel.
///
/// Instances are shared statics: [`LanguageDefinition::get`] hands out
/// `&'static` references, so switching the active language is a pointer swap.
#[derive(Debug)]
pub struct LanguageDefinition {
    /// Display name of the language.
    pub name: &'static str,
    /// Keyword set. Stored upper-cased for case-insensitive languages.
    pub keywords: HashSet<&'static str>,
    /// Known identifiers (builtin functions/types) highlighted specially.
    pub identifiers: HashSet<&'static str>,
    /// Identifiers recognized inside preprocessor regions.
    pub preproc_identifiers: HashSet<&'static str>,
    /// Multi-line comment opening token, empty when unsupported.
    pub comment_start: &'static str,
    /// Multi-line comment closing token, empty when unsupported.
    pub comment_end: &'static str,
    /// Single-line comment token, empty when unsupported.
    pub single_line_comment: &'static str,
    /// Character that opens a preprocessor line when it is the first
    /// non-whitespace character, if the language has a preprocessor.
    pub preproc_char: Option<char>,
    /// Native tokenizer; tried before the fallback pattern table.
    pub tokenize: Option<TokenizeFn>,
    /// Ordered fallback token patterns (regex source strings). The kernel
    /// anchors and compiles these once per language switch; the first
    /// pattern matching at the scan position wins.
    pub token_patterns: &'static [(&'static str, PaletteIndex)],
    /// Whether identifier/keyword comparison is case-sensitive.
    pub case_sensitive: bool,
}

impl LanguageDefinition {
    /// Look up the shared definition for `id`.
    pub fn get(id: LanguageId) -> &'static LanguageDefinition {
        match id {
            LanguageId::C => Self::c(),
            LanguageId::Cpp => Self::cpp(),
            LanguageId::Python => Self::python(),
            LanguageId::Lua => Self::lua(),
            LanguageId::Json => Self::json(),
            LanguageId::Sql => Self::sql(),
        }
    }

    /// ISO C grammar.
    pub fn c() -> &'static LanguageDefinition {
        static DEF: OnceLock<LanguageDefinition> = OnceLock::new();
        DEF.get_or_init(|| LanguageDefinition {
            name: "C",
            keywords: C_KEYWORDS.iter().copied().collect(),
            identifiers: C_IDENTIFIERS.iter().copied().collect(),
            preproc_identifiers: C_PREPROC_IDENTIFIERS.iter().copied().collect(),
            comment_start: "/*",
            comment_end: "*/",
            single_line_comment: "//",
            preproc_char: Some('#'),
            tokenize: Some(tokenize_c_style),
            token_patterns: &[],
            case_sensitive: true,
        })
    }

    /// C++ grammar.
    pub fn cpp() -> &'static LanguageDefinition {
        static DEF: OnceLock<LanguageDefinition> = OnceLock::new();
        DEF.get_or_init(|| LanguageDefinition {
            name: "C++",
            keywords: C_KEYWORDS
                .iter()
                .chain(CPP_EXTRA_KEYWORDS.iter())
                .copied()
                .collect(),
            identifiers: C_IDENTIFIERS.iter().copied().collect(),
            preproc_identifiers: C_PREPROC_IDENTIFIERS.iter().copied().collect(),
            comment_start: "/*",
            comment_end: "*/",
            single_line_comment: "//",
            preproc_char: Some('#'),
            tokenize: Some(tokenize_c_style),
            token_patterns: &[],
            case_sensitive: true,
        })
    }

    /// Python grammar (regex-pattern fallback only).
    pub fn python() -> &'static LanguageDefinition {
        static DEF: OnceLock<LanguageDefinition> = OnceLock::new();
        DEF.get_or_init(|| LanguageDefinition {
            name: "Python",
            keywords: PYTHON_KEYWORDS.iter().copied().collect(),
            identifiers: PYTHON_IDENTIFIERS.iter().copied().collect(),
            preproc_identifiers: HashSet::new(),
            comment_start: "\"\"\"",
            comment_end: "\"\"\"",
            single_line_comment: "#",
            preproc_char: None,
            tokenize: None,
            token_patterns: &[
                (r#""(\\.|[^"\\])*""#, PaletteIndex::String),
                (r"'[^']*'", PaletteIndex::String),
                (
                    r"0[xX][0-9a-fA-F]+|[0-9]+\.?[0-9]*([eE][+-]?[0-9]+)?[jJ]?",
                    PaletteIndex::Number,
                ),
                (r"[a-zA-Z_][a-zA-Z0-9_]*", PaletteIndex::Identifier),
                (
                    r"[\[\]\{\}\!\%\^\&\*\(\)\-\+\=\~\|<>\?/;,\.:@]",
                    PaletteIndex::Punctuation,
                ),
            ],
            case_sensitive: true,
        })
    }

    /// Lua grammar (regex-pattern fallback only).
    pub fn lua() -> &'static LanguageDefinition {
        static DEF: OnceLock<LanguageDefinition> = OnceLock::new();
        DEF.get_or_init(|| LanguageDefinition {
            name: "Lua",
            keywords: LUA_KEYWORDS.iter().copied().collect(),
            identifiers: LUA_IDENTIFIERS.iter().copied().collect(),
            preproc_identifiers: HashSet::new(),
            comment_start: "--[[",
            comment_end: "]]",
            single_line_comment: "--",
            preproc_char: None,
            tokenize: None,
            token_patterns: &[
                (r#""(\\.|[^"\\])*""#, PaletteIndex::String),
                (r"'[^']*'", PaletteIndex::String),
                (
                    r"0[xX][0-9a-fA-F]+|[0-9]+\.?[0-9]*([eE][+-]?[0-9]+)?",
                    PaletteIndex::Number,
                ),
                (r"[a-zA-Z_][a-zA-Z0-9_]*", PaletteIndex::Identifier),
                (
                    r"[\[\]\{\}\!\%\#\^\&\*\(\)\-\+\=\~\|<>\?/;,\.:]",
                    PaletteIndex::Punctuation,
                ),
            ],
            case_sensitive: true,
        })
    }

    /// JSON grammar (regex-pattern fallback only).
    pub fn json() -> &'static LanguageDefinition {
        static DEF: OnceLock<LanguageDefinition> = OnceLock::new();
        DEF.get_or_init(|| LanguageDefinition {
            name: "JSON",
            keywords: ["true", "false", "null"].into_iter().collect(),
            identifiers: HashSet::new(),
            preproc_identifiers: HashSet::new(),
            comment_start: "",
            comment_end: "",
            single_line_comment: "",
            preproc_char: None,
            tokenize: None,
            token_patterns: &[
                (r#""(\\.|[^"\\])*""#, PaletteIndex::String),
                (
                    r"-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?",
                    PaletteIndex::Number,
                ),
                (r"[a-zA-Z_][a-zA-Z0-9_]*", PaletteIndex::Identifier),
                (r"[\[\]\{\},:]", PaletteIndex::Punctuation),
            ],
            case_sensitive: true,
        })
    }

    /// SQL grammar: keywords compare case-insensitively, so the sets hold
    /// upper-cased entries.
    pub fn sql() -> &'static LanguageDefinition {
        static DEF: OnceLock<LanguageDefinition> = OnceLock::new();
        DEF.get_or_init(|| LanguageDefinition {
            name: "SQL",
            keywords: SQL_KEYWORDS.iter().copied().collect(),
            identifiers: SQL_IDENTIFIERS.iter().copied().collect(),
            preproc_identifiers: HashSet::new(),
            comment_start: "/*",
            comment_end: "*/",
            single_line_comment: "--",
            preproc_char: None,
            tokenize: None,
            token_patterns: &[
                (r#""(\\.|[^"\\])*""#, PaletteIndex::String),
                (r"'[^']*'", PaletteIndex::String),
                (
                    r"0[xX][0-9a-fA-F]+|[0-9]+\.?[0-9]*([eE][+-]?[0-9]+)?",
                    PaletteIndex::Number,
                ),
                (r"[a-zA-Z_][a-zA-Z0-9_]*", PaletteIndex::Identifier),
                (
                    r"[\[\]\{\}\!\%\^\&\*\(\)\-\+\=\~\|<>\?/;,\.]",
                    PaletteIndex::Punctuation,
                ),
            ],
            case_sensitive: false,
        })
    }

    /// Returns `true` if the language has a single-line comment token.
    pub fn has_single_line_comment(&self) -> bool {
        !self.single_line_comment.is_empty()
    }

    /// Returns `true` if the language has multi-line comment delimiters.
    pub fn has_multiline_comment(&self) -> bool {
        !self.comment_start.is_empty() && !self.comment_end.is_empty()
    }
}

/// Tokenizer for C-family languages: recognizes string literals, character
/// literals, identifiers, numbers, and punctuation at the start of `input`.
pub fn tokenize_c_style(input: &str) -> Option<(usize, PaletteIndex)> {
    let mut chars = input.char_indices();
    let (_, first) = chars.next()?;

    if first == ' ' || first == '\t' {
        let end = input
            .char_indices()
            .find(|&(_, c)| c != ' ' && c != '\t')
            .map(|(i, _)| i)
            .unwrap_or(input.len());
        return Some((end, PaletteIndex::Default));
    }
    if first == '"' {
        return tokenize_c_string(input).map(|len| (len, PaletteIndex::String));
    }
    if first == '\'' {
        return tokenize_c_char_literal(input).map(|len| (len, PaletteIndex::CharLiteral));
    }
    if first.is_ascii_alphabetic() || first == '_' {
        let end = input
            .char_indices()
            .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_'))
            .map(|(i, _)| i)
            .unwrap_or(input.len());
        return Some((end, PaletteIndex::Identifier));
    }
    if first.is_ascii_digit()
        || (first == '.' && input[1..].chars().next().is_some_and(|c| c.is_ascii_digit()))
    {
        return tokenize_c_number(input).map(|len| (len, PaletteIndex::Number));
    }
    if is_c_punctuation(first) {
        return Some((first.len_utf8(), PaletteIndex::Punctuation));
    }

    None
}

fn tokenize_c_string(input: &str) -> Option<usize> {
    debug_assert!(input.starts_with('"'));
    let mut iter = input.char_indices().skip(1);
    while let Some((i, c)) = iter.next() {
        match c {
            '"' => return Some(i + 1),
            '\\' => {
                // escape consumes the next character
                iter.next();
            }
            _ => {}
        }
    }
    None
}

fn tokenize_c_char_literal(input: &str) -> Option<usize> {
    debug_assert!(input.starts_with('\''));
    let mut iter = input.char_indices().skip(1);
    let (_, c) = iter.next()?;
    if c == '\\' {
        iter.next()?;
    }
    match iter.next() {
        Some((i, '\'')) => Some(i + 1),
        _ => None,
    }
}

fn tokenize_c_number(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut i = 0;

    if input.starts_with("0x") || input.starts_with("0X") {
        i = 2;
        while i < bytes.len() && (bytes[i].is_ascii_hexdigit() || bytes[i] == b'u' || bytes[i] == b'U' || bytes[i] == b'l' || bytes[i] == b'L') {
            i += 1;
        }
        return if i > 2 { Some(i) } else { None };
    }

    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i == 0 || (i == 1 && bytes[0] == b'.') {
        return None;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    while i < bytes.len() && matches!(bytes[i], b'f' | b'F' | b'u' | b'U' | b'l' | b'L') {
        i += 1;
    }
    Some(i)
}

fn is_c_punctuation(c: char) -> bool {
    matches!(
        c,
        '[' | ']'
            | '{'
            | '}'
            | '('
            | ')'
            | '!'
            | '%'
            | '^'
            | '&'
            | '*'
            | '-'
            | '+'
            | '='
            | '~'
            | '|'
            | '<'
            | '>'
            | '?'
            | ':'
            | '/'
            | ';'
            | ','
            | '.'
            | '#'
    )
}

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic",
    "_Bool", "_Complex", "_Generic", "_Noreturn", "_Static_assert", "_Thread_local",
];

const CPP_EXTRA_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "bitand", "bitor", "bool", "catch",
    "char16_t", "char32_t", "class", "compl", "concept", "constexpr", "const_cast", "decltype",
    "delete", "dynamic_cast", "explicit", "export", "false", "friend", "import", "module",
    "mutable", "namespace", "new", "noexcept", "not", "not_eq", "nullptr", "operator", "or",
    "or_eq", "private", "protected", "public", "reinterpret_cast", "requires", "static_assert",
    "static_cast", "template", "this", "thread_local", "throw", "true", "try", "typeid",
    "typename", "using", "virtual", "wchar_t", "xor", "xor_eq",
];

const C_IDENTIFIERS: &[&str] = &[
    "abort", "abs", "acos", "asin", "atan", "atexit", "atof", "atoi", "atol", "ceil", "clock",
    "cosh", "ctime", "div", "exit", "fabs", "floor", "fmod", "getchar", "getenv", "isalnum",
    "isalpha", "isdigit", "isgraph", "ispunct", "isspace", "isupper", "kbhit", "log10",
    "log2", "log", "malloc", "memcmp", "memcpy", "memset", "modf", "pow", "printf", "putchar",
    "putenv", "puts", "rand", "remove", "rename", "sinh", "sqrt", "srand", "strcat", "strcmp",
    "strerror", "strlen", "time", "tolower", "toupper",
];

const C_PREPROC_IDENTIFIERS: &[&str] = &[
    "define", "defined", "elif", "else", "endif", "error", "if", "ifdef", "ifndef", "include",
    "line", "pragma", "undef",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

const PYTHON_IDENTIFIERS: &[&str] = &[
    "abs", "all", "any", "bool", "bytes", "dict", "enumerate", "filter", "float", "format",
    "frozenset", "getattr", "hasattr", "hash", "int", "isinstance", "len", "list", "map",
    "max", "min", "next", "object", "open", "print", "range", "repr", "reversed", "round",
    "set", "setattr", "sorted", "str", "sum", "super", "tuple", "type", "zip",
];

const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if",
    "in", "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

const LUA_IDENTIFIERS: &[&str] = &[
    "assert", "collectgarbage", "coroutine", "dofile", "error", "getmetatable", "io", "ipairs",
    "load", "loadstring", "math", "next", "os", "pairs", "pcall", "print", "rawequal",
    "rawget", "rawlen", "rawset", "require", "select", "setmetatable", "string", "table",
    "tonumber", "tostring", "type", "unpack", "xpcall",
];

const SQL_KEYWORDS: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK",
    "COLUMN", "CONSTRAINT", "CREATE", "CROSS", "DEFAULT", "DELETE", "DESC", "DISTINCT",
    "DROP", "ELSE", "END", "EXISTS", "FOREIGN", "FROM", "FULL", "GROUP", "HAVING", "IN",
    "INDEX", "INNER", "INSERT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NOT",
    "NULL", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RIGHT", "SELECT", "SET",
    "TABLE", "THEN", "UNION", "UNIQUE", "UPDATE", "VALUES", "WHEN", "WHERE",
];

const SQL_IDENTIFIERS: &[&str] = &[
    "ABS", "AVG", "CAST", "CEIL", "COALESCE", "CONCAT", "COUNT", "FLOOR", "IFNULL", "LENGTH",
    "LOWER", "LTRIM", "MAX", "MIN", "NOW", "NULLIF", "ROUND", "RTRIM", "SUBSTR", "SUM",
    "TRIM", "UPPER",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_c_style_basic_tokens() {
        assert_eq!(
            tokenize_c_style("\"hi\\\"there\" rest"),
            Some((11, PaletteIndex::String))
        );
        assert_eq!(
            tokenize_c_style("'a' rest"),
            Some((3, PaletteIndex::CharLiteral))
        );
        assert_eq!(
            tokenize_c_style("foo_bar42 rest"),
            Some((9, PaletteIndex::Identifier))
        );
        assert_eq!(tokenize_c_style("0x1fUL;"), Some((6, PaletteIndex::Number)));
        assert_eq!(tokenize_c_style("3.14e-2f;"), Some((8, PaletteIndex::Number)));
        assert_eq!(tokenize_c_style("+x"), Some((1, PaletteIndex::Punctuation)));
        assert_eq!(
            tokenize_c_style("  \tleading"),
            Some((3, PaletteIndex::Default))
        );
        assert_eq!(tokenize_c_style("@"), None);
    }

    #[test]
    fn test_tokenize_c_style_unterminated_string() {
        assert_eq!(tokenize_c_style("\"never ends"), None);
        assert_eq!(tokenize_c_style("'x"), None);
    }

    #[test]
    fn test_builtin_definitions_resolve() {
        for id in [
            LanguageId::C,
            LanguageId::Cpp,
            LanguageId::Python,
            LanguageId::Lua,
            LanguageId::Json,
            LanguageId::Sql,
        ] {
            let def = LanguageDefinition::get(id);
            assert!(!def.name.is_empty());
            // The same id must hand out the same shared instance.
            assert!(std::ptr::eq(def, LanguageDefinition::get(id)));
        }
    }

    #[test]
    fn test_sql_keywords_are_uppercase() {
        let sql = LanguageDefinition::sql();
        assert!(!sql.case_sensitive);
        assert!(sql.keywords.contains("SELECT"));
        assert!(!sql.keywords.contains("select"));
    }
}
