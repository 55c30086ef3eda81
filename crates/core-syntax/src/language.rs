use std::path::Path;

/// Languages with a built-in rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    Html,
    Css,
    Json,
    Xml,
    Markdown,
    Shell,
    C,
    Cpp,
    Java,
    Rust,
    Go,
}

const EXTENSIONS: &[(&str, Language)] = &[
    ("py", Language::Python),
    ("pyw", Language::Python),
    ("js", Language::JavaScript),
    ("jsx", Language::JavaScript),
    ("ts", Language::JavaScript),
    ("tsx", Language::JavaScript),
    ("html", Language::Html),
    ("htm", Language::Html),
    ("xhtml", Language::Html),
    ("css", Language::Css),
    ("scss", Language::Css),
    ("sass", Language::Css),
    ("less", Language::Css),
    ("json", Language::Json),
    ("xml", Language::Xml),
    ("xsl", Language::Xml),
    ("xsd", Language::Xml),
    ("md", Language::Markdown),
    ("markdown", Language::Markdown),
    ("sh", Language::Shell),
    ("bash", Language::Shell),
    ("zsh", Language::Shell),
    ("fish", Language::Shell),
    ("c", Language::C),
    ("h", Language::C),
    ("cpp", Language::Cpp),
    ("cxx", Language::Cpp),
    ("cc", Language::Cpp),
    ("hpp", Language::Cpp),
    ("hxx", Language::Cpp),
    ("java", Language::Java),
    ("rs", Language::Rust),
    ("go", Language::Go),
];

impl Language {
    pub const ALL: [Language; 13] = [
        Language::Python,
        Language::JavaScript,
        Language::Html,
        Language::Css,
        Language::Json,
        Language::Xml,
        Language::Markdown,
        Language::Shell,
        Language::C,
        Language::Cpp,
        Language::Java,
        Language::Rust,
        Language::Go,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Html => "html",
            Language::Css => "css",
            Language::Json => "json",
            Language::Xml => "xml",
            Language::Markdown => "markdown",
            Language::Shell => "sh",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Rust => "rust",
            Language::Go => "go",
        }
    }

    /// Resolve a language by name (`bash` and `shell` are accepted for `sh`).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "bash" | "shell" => Some(Language::Shell),
            _ => Self::ALL.into_iter().find(|l| l.name() == name),
        }
    }

    /// Resolve a language from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, lang)| *lang)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
