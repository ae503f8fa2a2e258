//! Snippet language identifiers.

use std::fmt;

/// Language of a snippet.
///
/// Known languages carry their sandbox runtime name and source filename.
/// Anything else is passed through to the sandbox unchanged as
/// [`Language::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Language {
    Python,
    Java,
    JavaScript,
    C,
    Cpp,
    Rust,
    Other(String),
}

impl Language {
    /// Parse a language tag, as written on a code fence or on the command line.
    ///
    /// Matching is case-insensitive and accepts common aliases
    /// (`py`, `python3`, `js`, `node`, `c++`, `rs`, ...).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let tag = s.trim().to_ascii_lowercase();

        match tag.as_str() {
            "python" | "python3" | "py" => Self::Python,
            "java" => Self::Java,
            "javascript" | "js" | "node" | "nodejs" => Self::JavaScript,
            "c" => Self::C,
            "cpp" | "c++" | "cxx" => Self::Cpp,
            "rust" | "rs" => Self::Rust,
            _ => Self::Other(tag),
        }
    }

    /// Runtime name understood by the sandbox.
    #[must_use]
    pub fn runtime(&self) -> &str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
            Self::JavaScript => "javascript",
            Self::C => "c",
            Self::Cpp => "c++",
            Self::Rust => "rust",
            Self::Other(name) => name,
        }
    }

    /// Filename the snippet is submitted under.
    ///
    /// Java needs the file to match the public class, hence `Main.java`.
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Python => "main.py",
            Self::Java => "Main.java",
            Self::JavaScript => "main.js",
            Self::C => "main.c",
            Self::Cpp => "main.cpp",
            Self::Rust => "main.rs",
            Self::Other(_) => "main",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.runtime())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        let cases = [
            ("python", Language::Python),
            ("Python3", Language::Python),
            ("py", Language::Python),
            ("java", Language::Java),
            ("JS", Language::JavaScript),
            ("node", Language::JavaScript),
            ("c", Language::C),
            ("c++", Language::Cpp),
            ("cpp", Language::Cpp),
            ("rs", Language::Rust),
            (" rust ", Language::Rust),
        ];

        for (tag, expected) in cases {
            assert_eq!(Language::parse(tag), expected, "Failed to parse: {tag}");
        }
    }

    #[test]
    fn test_parse_unknown_passes_through() {
        assert_eq!(
            Language::parse("Kotlin"),
            Language::Other("kotlin".to_owned())
        );
        assert_eq!(Language::parse("kotlin").runtime(), "kotlin");
        assert_eq!(Language::parse("kotlin").file_name(), "main");
    }

    #[test]
    fn test_runtime_and_file_names() {
        assert_eq!(Language::Cpp.runtime(), "c++");
        assert_eq!(Language::Java.file_name(), "Main.java");
        assert_eq!(Language::Python.file_name(), "main.py");
    }

    #[test]
    fn test_display_uses_runtime() {
        assert_eq!(Language::JavaScript.to_string(), "javascript");
    }
}
