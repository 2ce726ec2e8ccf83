// src/filetype.rs

use std::collections::HashSet;
use std::path::Path;

const DEFAULT_CODE_EXTENSIONS: &[&str] = &[
    "c", "cc", "cpp", "cxx", "h", "hh", "hpp", "hxx", "m", "mm", "rs", "go", "java", "kt", "scala",
    "py", "rb", "php", "pl", "pm", "js", "jsx", "ts", "tsx", "cs", "swift", "lua", "sh", "s", "asm",
];

/// Decides whether a path names source code, by extension only.
#[derive(Debug, Clone)]
pub struct CodeFilter {
    extensions: HashSet<String>,
    match_all: bool,
}

impl Default for CodeFilter {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_CODE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            match_all: false,
        }
    }
}

impl CodeFilter {
    /// A filter that accepts every path
    pub fn all() -> Self {
        Self { extensions: HashSet::new(), match_all: true }
    }

    /// Adds extensions, with or without the leading dot
    pub fn with_extensions<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extra {
            let ext = ext.as_ref().trim_start_matches('.').to_ascii_lowercase();
            if !ext.is_empty() {
                self.extensions.insert(ext);
            }
        }
        self
    }

    pub fn is_code_file(&self, path: &str) -> bool {
        if self.match_all {
            return true;
        }
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}
