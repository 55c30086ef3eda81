//! Per-language rule tables.
//!
//! Tables are declared as static pattern lists and compiled once, on first
//! use, into a table indexed by [`Language`].

use crate::ColorClass::{
    Bracket, Comment, Function, Keyword, Number, Operator, Preprocessor, String as Str, Type,
};
use crate::{ColorClass, Language};
use regex::Regex;
use std::sync::LazyLock;
use tracing::error;

/// A compiled highlight rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub regex: Regex,
    pub class: ColorClass,
    pub priority: u8,
    /// Capture group to color; 0 colors the whole match.
    pub group: usize,
}

struct RuleSpec {
    pattern: &'static str,
    class: ColorClass,
    priority: u8,
    group: usize,
}

const fn rule(pattern: &'static str, class: ColorClass, priority: u8) -> RuleSpec {
    RuleSpec {
        pattern,
        class,
        priority,
        group: 0,
    }
}

const fn group(pattern: &'static str, class: ColorClass, priority: u8, group: usize) -> RuleSpec {
    RuleSpec {
        pattern,
        class,
        priority,
        group,
    }
}

const LINE_COMMENT_SLASH: RuleSpec = rule(r"//.*$", Comment, 10);
const BLOCK_COMMENT: RuleSpec = rule(r"/\*.*?\*/", Comment, 10);
const DQ_STRING: RuleSpec = rule(r#""(?:[^"\\]|\\.)*""#, Str, 8);
const SQ_STRING: RuleSpec = rule(r"'(?:[^'\\]|\\.)*'", Str, 8);
const CHAR_LITERAL: RuleSpec = rule(r"'(?:[^'\\]|\\.)'", Str, 8);
const C_OPERATORS: RuleSpec = rule(r"[+\-*/%=<>!&|^~]", Operator, 5);

const PYTHON: &[RuleSpec] = &[
    rule(r"#.*$", Comment, 10),
    rule(r#""""[\s\S]*?""""#, Str, 9),
    rule(r"'''[\s\S]*?'''", Str, 9),
    rule(r#"[fFrRbBuU]?"(?:[^"\\]|\\.)*""#, Str, 8),
    rule(r"[fFrRbBuU]?'(?:[^'\\]|\\.)*'", Str, 8),
    rule(r"\bdef\s+([a-zA-Z_][a-zA-Z0-9_]*)", Function, 8),
    rule(r"\bclass\s+([a-zA-Z_][a-zA-Z0-9_]*)", Type, 8),
    rule(r"@[a-zA-Z_][a-zA-Z0-9_.]*", Preprocessor, 8),
    rule(
        r"\b(def|class|if|elif|else|for|while|try|except|finally|with|as|import|from|return|yield|break|continue|pass|lambda|and|or|not|in|is|async|await|global|nonlocal|assert|del|raise)\b",
        Keyword,
        7,
    ),
    rule(
        r"\b(True|False|None|__name__|__file__|__doc__|__package__|__version__)\b",
        Number,
        7,
    ),
    rule(
        r"\b(print|len|range|enumerate|zip|map|filter|sum|max|min|abs|round|type|isinstance|hasattr|getattr|setattr|delattr|dir|vars|globals|locals|eval|exec|compile|open|input|int|float|str|bool|list|tuple|dict|set|frozenset)\b",
        Function,
        6,
    ),
    rule(r"\b0[xX][0-9a-fA-F]+[lL]?\b", Number, 6),
    rule(r"\b0[oO][0-7]+[lL]?\b", Number, 6),
    rule(r"\b0[bB][01]+[lL]?\b", Number, 6),
    rule(r"\b\d+\.?\d*([eE][+-]?\d+)?[jJ]?\b", Number, 6),
    rule(
        r"[+\-*/%=<>!&|^~@]|//|\*\*|<<|>>|<=|>=|==|!=|\+=|-=|\*=|/=|%=|&=|\|=|\^=|<<=|>>=|\*\*=|//=",
        Operator,
        5,
    ),
    rule(r"[(){}\[\],:.;]", Bracket, 4),
];

const JAVASCRIPT: &[RuleSpec] = &[
    LINE_COMMENT_SLASH,
    BLOCK_COMMENT,
    DQ_STRING,
    SQ_STRING,
    rule(r"`(?:[^`\\]|\\.)*`", Str, 8),
    rule(
        r"\b(function|var|let|const|if|else|for|while|do|switch|case|break|continue|return|try|catch|finally|throw|new|this|typeof|instanceof|class|extends|constructor|async|await|true|false|null|undefined)\b",
        Keyword,
        7,
    ),
    rule(r"\b\d+\.?\d*\b", Number, 6),
    C_OPERATORS,
];

const HTML: &[RuleSpec] = &[
    rule(r"<!--.*?-->", Comment, 10),
    rule(r"</?[a-zA-Z][a-zA-Z0-9]*\b[^>]*>", Keyword, 8),
    rule(r"\b[a-zA-Z-]+\s*=", Operator, 7),
    rule(r#""[^"]*""#, Str, 8),
    rule(r"'[^']*'", Str, 8),
];

const CSS: &[RuleSpec] = &[
    BLOCK_COMMENT,
    group(r"([.#]?[a-zA-Z][a-zA-Z0-9_-]*)\s*\{", Keyword, 8, 1),
    group(r"([a-zA-Z-]+\s*):", Operator, 7, 1),
    rule(r#""[^"]*""#, Str, 8),
    rule(r"'[^']*'", Str, 8),
    rule(
        r"\b\d+\.?\d*(px|em|rem|%|pt|pc|in|mm|cm|ex|ch|vw|vh|vmin|vmax|deg|rad|turn|s|ms|Hz|kHz)?\b",
        Number,
        6,
    ),
];

const JSON: &[RuleSpec] = &[
    DQ_STRING,
    rule(r"-?\b\d+\.?\d*([eE][+-]?\d+)?\b", Number, 7),
    rule(r"\b(true|false|null)\b", Keyword, 7),
    rule(r"[{}\[\]:,]", Operator, 6),
];

const XML: &[RuleSpec] = &[
    rule(r"<!--.*?-->", Comment, 10),
    rule(r"<!\[CDATA\[.*?\]\]>", Str, 9),
    rule(r"</?[a-zA-Z][a-zA-Z0-9:_-]*\b[^>]*>", Keyword, 8),
    rule(r"\b[a-zA-Z:_-]+\s*=", Operator, 7),
    rule(r#""[^"]*""#, Str, 8),
    rule(r"'[^']*'", Str, 8),
];

const MARKDOWN: &[RuleSpec] = &[
    rule(r"^#{1,6}\s+.*$", Keyword, 8),
    rule(r"\*\*[^*]+\*\*", Operator, 7),
    rule(r"__[^_]+__", Operator, 7),
    rule(r"\*[^*]+\*", Number, 6),
    rule(r"_[^_]+_", Number, 6),
    rule(r"`[^`]+`", Str, 8),
    rule(r"```.*?```", Str, 9),
    rule(r"\[([^\]]+)\]\([^)]+\)", Keyword, 7),
];

const SHELL: &[RuleSpec] = &[
    rule(r"#.*$", Comment, 10),
    DQ_STRING,
    SQ_STRING,
    rule(
        r"\b(if|then|else|elif|fi|case|esac|for|while|until|do|done|function|select|time|in)\b",
        Keyword,
        7,
    ),
    rule(r"\$[a-zA-Z_][a-zA-Z0-9_]*", Number, 6),
    rule(r"\$\{[^}]+\}", Number, 6),
    rule(r"[|&;<>(){}\[\]]", Operator, 5),
];

const C_KEYWORDS: RuleSpec = rule(
    r"\b(auto|break|case|char|const|continue|default|do|double|else|enum|extern|float|for|goto|if|int|long|register|return|short|signed|sizeof|static|struct|switch|typedef|union|unsigned|void|volatile|while)\b",
    Keyword,
    7,
);
const C_PREPROCESSOR: RuleSpec = rule(r"#\s*[a-zA-Z_][a-zA-Z0-9_]*", Preprocessor, 9);
const C_NUMBERS: RuleSpec = rule(r"\b\d+\.?\d*[fFlL]?\b", Number, 6);

const C: &[RuleSpec] = &[
    LINE_COMMENT_SLASH,
    BLOCK_COMMENT,
    C_PREPROCESSOR,
    DQ_STRING,
    CHAR_LITERAL,
    C_KEYWORDS,
    C_NUMBERS,
    C_OPERATORS,
];

const CPP: &[RuleSpec] = &[
    LINE_COMMENT_SLASH,
    BLOCK_COMMENT,
    C_PREPROCESSOR,
    DQ_STRING,
    CHAR_LITERAL,
    C_KEYWORDS,
    C_NUMBERS,
    C_OPERATORS,
    rule(
        r"\b(and|and_eq|asm|bitand|bitor|bool|catch|class|compl|const_cast|delete|dynamic_cast|explicit|export|false|friend|inline|mutable|namespace|new|not|not_eq|operator|or|or_eq|private|protected|public|reinterpret_cast|static_cast|template|this|throw|true|try|typeid|typename|using|virtual|wchar_t|xor|xor_eq)\b",
        Keyword,
        7,
    ),
];

const JAVA: &[RuleSpec] = &[
    LINE_COMMENT_SLASH,
    BLOCK_COMMENT,
    DQ_STRING,
    CHAR_LITERAL,
    rule(
        r"\b(abstract|assert|boolean|break|byte|case|catch|char|class|const|continue|default|do|double|else|enum|extends|final|finally|float|for|goto|if|implements|import|instanceof|int|interface|long|native|new|package|private|protected|public|return|short|static|strictfp|super|switch|synchronized|this|throw|throws|transient|try|void|volatile|while|true|false|null)\b",
        Keyword,
        7,
    ),
    rule(r"\b\d+\.?\d*[fFdDlL]?\b", Number, 6),
    C_OPERATORS,
];

const RUST: &[RuleSpec] = &[
    LINE_COMMENT_SLASH,
    BLOCK_COMMENT,
    DQ_STRING,
    CHAR_LITERAL,
    rule(
        r"\b(as|async|await|break|const|continue|crate|dyn|else|enum|extern|false|fn|for|if|impl|in|let|loop|match|mod|move|mut|pub|ref|return|self|Self|static|struct|super|trait|true|type|unsafe|use|where|while)\b",
        Keyword,
        7,
    ),
    rule(
        r"\b(bool|char|str|i8|i16|i32|i64|i128|isize|u8|u16|u32|u64|u128|usize|f32|f64)\b",
        Type,
        6,
    ),
    rule(r"\b[a-z_][a-z0-9_]*!", Preprocessor, 6),
    rule(
        r"\b\d[\d_]*(\.\d[\d_]*)?([iu](8|16|32|64|128|size)|f32|f64)?\b",
        Number,
        6,
    ),
    C_OPERATORS,
];

const GO: &[RuleSpec] = &[
    LINE_COMMENT_SLASH,
    BLOCK_COMMENT,
    DQ_STRING,
    CHAR_LITERAL,
    rule(r"`[^`]*`", Str, 8),
    rule(
        r"\b(break|case|chan|const|continue|default|defer|else|fallthrough|for|func|go|goto|if|import|interface|map|package|range|return|select|struct|switch|type|var)\b",
        Keyword,
        7,
    ),
    rule(
        r"\b(bool|byte|complex64|complex128|error|float32|float64|int|int8|int16|int32|int64|rune|string|uint|uint8|uint16|uint32|uint64|uintptr)\b",
        Type,
        6,
    ),
    rule(r"\b(true|false|iota|nil)\b", Keyword, 7),
    C_OPERATORS,
];

fn specs(lang: Language) -> &'static [RuleSpec] {
    match lang {
        Language::Python => PYTHON,
        Language::JavaScript => JAVASCRIPT,
        Language::Html => HTML,
        Language::Css => CSS,
        Language::Json => JSON,
        Language::Xml => XML,
        Language::Markdown => MARKDOWN,
        Language::Shell => SHELL,
        Language::C => C,
        Language::Cpp => CPP,
        Language::Java => JAVA,
        Language::Rust => RUST,
        Language::Go => GO,
    }
}

fn compile(lang: Language) -> Vec<Rule> {
    specs(lang)
        .iter()
        .filter_map(|s| match Regex::new(s.pattern) {
            Ok(regex) => Some(Rule {
                regex,
                class: s.class,
                priority: s.priority,
                group: s.group,
            }),
            Err(e) => {
                error!(target: "syntax", language = %lang, pattern = s.pattern, %e, "rule_compile_failed");
                None
            }
        })
        .collect()
}

static TABLES: LazyLock<Vec<Vec<Rule>>> =
    LazyLock::new(|| Language::ALL.into_iter().map(compile).collect());

/// Compiled rules for `lang`, in declaration order.
pub fn rules_for(lang: Language) -> &'static [Rule] {
    TABLES
        .get(lang.index())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
