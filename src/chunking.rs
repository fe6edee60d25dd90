//! Blank-line chunker.
//!
//! Splits file text at double newlines, a cheap proxy for "logical block"
//! that works across languages without a parser. Line accounting is the
//! load-bearing part: the `+2`/`+1` offsets below account for the delimiter
//! characters consumed by the split, so reported line numbers stay aligned
//! with the original file. Downstream consumers rely on the exact numbering,
//! so this must not be "improved" casually.

/// A contiguous slice of a source file, the atomic unit of embedding and
/// retrieval. Produced without an embedding; the indexer attaches one later.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Deterministic id: `"{file_path}:{start_line}"`. Re-chunking unchanged
    /// content yields the same ids, so re-indexing overwrites rather than
    /// duplicates.
    pub id: String,
    /// Segment text, verbatim (not trimmed)
    pub text: String,
    /// 1-based line of the first segment line
    pub start_line: usize,
    /// start_line + number of lines in the segment
    pub end_line: usize,
}

/// Split `file_text` into chunks at blank-line boundaries.
///
/// Whitespace-only segments emit nothing but still advance the line counter.
pub fn chunk(file_text: &str, file_path: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current_line = 1usize;

    for segment in file_text.split("\n\n") {
        let newlines = segment.matches('\n').count();

        if segment.trim().is_empty() {
            // +2 for the delimiter characters consumed by the split
            current_line += newlines + 2;
            continue;
        }

        let chunk_lines = newlines + 1;
        chunks.push(Chunk {
            id: format!("{file_path}:{current_line}"),
            text: segment.to_string(),
            start_line: current_line,
            end_line: current_line + chunk_lines,
        });

        // +1 for the gap left by the delimiter
        current_line += chunk_lines + 1;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunk("", "a.py").is_empty());
        assert!(chunk("   \n\n  \n", "a.py").is_empty());
    }

    #[test]
    fn test_single_block() {
        let chunks = chunk("fn main() {\n    run();\n}", "src/main.rs");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "src/main.rs:1");
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].end_line, 4);
        assert_eq!(chunks[0].text, "fn main() {\n    run();\n}");
    }

    #[test]
    fn test_two_python_functions() {
        let content = "def f():\n    return 1\n\ndef g():\n    return 2";
        let chunks = chunk(content, "app.py");

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "def f():\n    return 1");
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].end_line, 3);
        assert_eq!(chunks[1].text, "def g():\n    return 2");
        assert_eq!(chunks[1].start_line, 4);
        assert_eq!(chunks[1].end_line, 6);
    }

    #[test]
    fn test_trailing_newline_counts_toward_last_chunk() {
        let content = "def f():\n    return 1\n\ndef g():\n    return 2\n";
        let chunks = chunk(content, "app.py");

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].id, "app.py:4");
        assert_eq!(chunks[1].start_line, 4);
        // The trailing newline is part of the segment, so it adds a line.
        assert_eq!(chunks[1].text, "def g():\n    return 2\n");
        assert_eq!(chunks[1].end_line, 7);
    }

    #[test]
    fn test_adjacent_chunks_have_contiguous_line_ranges() {
        let content = "a\nb\n\nc\n\nd\ne\nf";
        let chunks = chunk(content, "f.txt");
        assert_eq!(chunks.len(), 3);
        for pair in chunks.windows(2) {
            assert_eq!(pair[1].start_line, pair[0].end_line + 1);
        }
    }

    #[test]
    fn test_whitespace_only_segment_advances_lines() {
        // Lines: 1 "a", 2 "", 3 "  ", 4 "", 5 "b"
        let content = "a\n\n  \n\nb";
        let chunks = chunk(content, "f.txt");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[1].start_line, 5);
    }

    #[test]
    fn test_ids_are_path_and_start_line() {
        let content = "x = 1\n\ny = 2";
        let chunks = chunk(content, "pkg/mod.py");
        assert_eq!(chunks[0].id, "pkg/mod.py:1");
        assert_eq!(chunks[1].id, "pkg/mod.py:3");
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let content = "def a():\n    pass\n\n\ndef b():\n    pass\n";
        let first = chunk(content, "m.py");
        let second = chunk(content, "m.py");
        assert_eq!(first, second);
    }

    #[test]
    fn test_text_kept_verbatim() {
        let content = "  indented\n\ttabbed  ";
        let chunks = chunk(content, "f.txt");
        assert_eq!(chunks[0].text, "  indented\n\ttabbed  ");
    }
}
