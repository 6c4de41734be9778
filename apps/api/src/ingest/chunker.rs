//! Passage splitting for retrieval.
//!
//! A sliding window over character offsets that prefers to break on
//! paragraph, sentence, line, clause and finally word boundaries.

/// Maximum characters per passage.
pub const MAX_CHUNK_CHARS: usize = 4000;

/// Characters shared between neighbouring passages.
pub const OVERLAP_CHARS: usize = 200;

/// Splits text into passages using the default window.
pub fn chunk_text(text: &str) -> Vec<String> {
    sliding_window(text, MAX_CHUNK_CHARS, OVERLAP_CHARS)
        .into_iter()
        .map(|(content, _, _)| content)
        .collect()
}

/// Splits text into overlapping windows of at most `max_chars` characters,
/// sharing `overlap` characters between neighbours.
/// Returns tuples of (chunk_text, start_offset, end_offset) in byte offsets of
/// the trimmed input. Offsets always land on char boundaries.
pub fn sliding_window(
    text: &str,
    max_chars: usize,
    overlap: usize,
) -> Vec<(String, usize, usize)> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if text.chars().count() <= max_chars {
        return vec![(text.to_string(), 0, text.len())];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        // At least one char per window
        let end = advance_chars(text, start, max_chars.max(1));

        let chunk_end = if end < text.len() {
            find_break_point(&text[start..end])
                .map(|offset| start + offset)
                .unwrap_or(end)
        } else {
            end
        };

        let chunk_text = text[start..chunk_end].trim();
        if !chunk_text.is_empty() {
            chunks.push((chunk_text.to_string(), start, chunk_end));
        }

        if chunk_end >= text.len() {
            break;
        }

        let step = text[start..chunk_end].chars().count();
        start = if step <= overlap {
            chunk_end
        } else {
            retreat_chars(text, chunk_end, overlap).max(advance_chars(text, start, 1))
        };
    }

    chunks
}

/// Finds a good break offset within `window`.
fn find_break_point(window: &str) -> Option<usize> {
    let len = window.len();

    if let Some(pos) = window.rfind("\n\n") {
        if pos > len / 3 {
            return Some(pos + 2);
        }
    }

    for pattern in &[". ", "! ", "? ", ".\n", "!\n", "?\n"] {
        if let Some(pos) = window.rfind(pattern) {
            if pos > len / 3 {
                return Some(pos + pattern.len());
            }
        }
    }

    if let Some(pos) = window.rfind('\n') {
        if pos > len / 3 {
            return Some(pos + 1);
        }
    }

    for pattern in &[", ", "; "] {
        if let Some(pos) = window.rfind(pattern) {
            if pos > len / 2 {
                return Some(pos + pattern.len());
            }
        }
    }

    window.rfind(' ').filter(|&pos| pos > 0).map(|pos| pos + 1)
}

/// Byte offset `n` chars after `from`, clamped to the end of `text`.
fn advance_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| from + i)
        .unwrap_or(text.len())
}

/// Byte offset `n` chars before `to`, clamped to the start of `text`.
fn retreat_chars(text: &str, to: usize, n: usize) -> usize {
    if n == 0 {
        return to;
    }
    text[..to]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_text_single_chunk() {
        let chunks = sliding_window("  Jane Doe, backend developer  ", 1000, 100);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].0, "Jane Doe, backend developer");
    }

    #[test]
    fn test_empty_text_no_chunks() {
        assert!(chunk_text(" \n\t ").is_empty());
    }

    #[test]
    fn test_large_text_overlaps() {
        let text = "Shipped a billing service in Python. ".repeat(100);
        let chunks = sliding_window(&text, 300, 60);
        assert!(chunks.len() > 1);

        for pair in chunks.windows(2) {
            let (_, _, prev_end) = pair[0];
            let (_, next_start, _) = pair[1];
            assert!(next_start < prev_end, "chunks should overlap");
        }
        for (content, _, _) in &chunks {
            assert!(content.len() <= 300);
        }
    }

    #[test]
    fn test_prefers_sentence_boundary() {
        let text = format!("{} Second sentence here. {}", "a".repeat(150), "b".repeat(200));
        let chunks = sliding_window(&text, 220, 20);
        assert!(chunks[0].0.ends_with("Second sentence here."));
    }

    #[test]
    fn test_multibyte_text_never_splits_chars() {
        let text = "Développeur à Zürich — équipe données. ".repeat(80);
        let chunks = sliding_window(&text, 97, 13);
        assert!(chunks.len() > 1);
        // Every chunk is a valid &str slice; reaching here means no panic.
        assert!(chunks.iter().all(|(c, _, _)| !c.is_empty()));
    }

    #[test]
    fn test_window_is_measured_in_chars() {
        // 40 chars, 80 bytes
        let text = "é".repeat(40);
        assert_eq!(sliding_window(&text, 40, 5).len(), 1);

        let chunks = sliding_window(&"ü".repeat(100), 30, 10);
        assert_eq!(chunks[0].0.chars().count(), 30);
        assert!(chunks.iter().all(|(c, _, _)| c.chars().count() <= 30));
        let (_, _, first_end) = chunks[0];
        let (_, second_start, _) = chunks[1];
        assert_eq!(text_chars_between(&"ü".repeat(100), second_start, first_end), 10);
    }

    fn text_chars_between(text: &str, from: usize, to: usize) -> usize {
        text[from..to].chars().count()
    }

    #[test]
    fn test_unbroken_text_falls_back_to_hard_split() {
        let text = "x".repeat(1000);
        let chunks = sliding_window(&text, 400, 50);
        assert_eq!(chunks[0].0.len(), 400);
        assert_eq!(chunks.last().unwrap().2, 1000);
    }
}
