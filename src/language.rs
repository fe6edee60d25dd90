//! Extension and language tables.
//!
//! Two fixed mappings, intentionally not symmetric: the filter table says
//! which extensions a requested language pulls in (cpp and c both claim
//! `.h`), while the detect table tags an indexed file with a single language
//! (`.h` and `.hpp` stay "unknown" rather than guessing between the two).

use std::path::Path;

/// Map language names to the file extensions they cover. Unknown names
/// contribute nothing. Returns None when no languages are given, meaning
/// "no filter": process every file.
pub fn extensions_for_languages(languages: Option<&[String]>) -> Option<Vec<&'static str>> {
    let languages = languages?;
    if languages.is_empty() {
        return None;
    }

    let mut exts = Vec::new();
    for lang in languages {
        let mapped: &[&'static str] = match lang.to_lowercase().as_str() {
            "python" => &[".py"],
            "javascript" => &[".js", ".jsx"],
            "typescript" => &[".ts", ".tsx"],
            "go" => &[".go"],
            "java" => &[".java"],
            "cpp" => &[".cpp", ".h", ".hpp"],
            "c" => &[".c", ".h"],
            "rust" => &[".rs"],
            _ => &[],
        };
        exts.extend_from_slice(mapped);
    }
    Some(exts)
}

/// Detect the language of a file from its extension, "unknown" if unmapped.
pub fn detect_language(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "py" => "python",
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "go" => "go",
        "java" => "java",
        "cpp" => "cpp",
        "c" => "c",
        "rs" => "rust",
        _ => "unknown",
    }
    .to_string()
}

/// The dot-prefixed extension of a path ("" when there is none).
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
