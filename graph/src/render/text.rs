use unicode_segmentation::UnicodeSegmentation;

/// Longest subject shown on an unlabeled node, in grapheme clusters
pub const SUBJECT_WIDTH: usize = 30;

/// Truncate text to `max` grapheme clusters, preserving grapheme boundaries.
/// When text is cut, the last kept cluster is replaced by an ellipsis.
pub fn truncate_graphemes(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }

    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        return text.to_string();
    }

    let mut result: String = graphemes[..max - 1].concat();
    result.push('…');
    result
}

/// Escape a string for use inside a double-quoted dot ID
pub fn escape_label(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
