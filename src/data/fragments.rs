//! Text fragmenting: normalized lines sliced into fixed-width token windows.
//!
//! Each line of the source text is lower-cased, lightly normalized (common
//! punctuation separated by inserted spaces) and tokenized on whitespace.
//! Every contiguous `window`-token run of a line is emitted as one fragment,
//! in original line order; overlapping windows share tokens.

/// An ordered run of exactly `window` tokens from one line of text.
pub type Fragment = Vec<String>;

/// Lower-case a line and separate trailing punctuation with inserted spaces.
///
/// Hyphens followed by whitespace are dropped so that dash-broken words
/// rejoin as a single token on the next split.
fn normalize_line(line: &str) -> String {
    line.to_lowercase()
        .replace('.', " .")
        .replace(';', " ;")
        .replace(',', " ,")
        .replace(':', " :")
        .replace("- ", "")
        .replace('"', " \"")
}

/// Split raw text into fragments of `window` tokens.
///
/// Lines yielding fewer than `window` tokens contribute no fragments and are
/// silently skipped. The result preserves line order and, within a line,
/// window order.
pub fn fragments(text: &str, window: usize) -> Vec<Fragment> {
    let mut result = Vec::new();
    for line in text.lines() {
        let normalized = normalize_line(line);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        if tokens.len() < window {
            continue;
        }
        for slice in tokens.windows(window) {
            result.push(slice.iter().map(|t| t.to_string()).collect());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sliding_windows() {
        let frags = fragments("the quick brown fox", 3);
        assert_eq!(
            frags,
            vec![
                vec!["the", "quick", "brown"],
                vec!["quick", "brown", "fox"]
            ]
        );
    }

    #[test]
    fn test_short_line_skipped() {
        let frags = fragments("one two\nalpha beta gamma delta", 3);
        assert_eq!(frags.len(), 2);
        assert_eq!(frags[0], vec!["alpha", "beta", "gamma"]);
        assert_eq!(frags[1], vec!["beta", "gamma", "delta"]);
    }

    #[test]
    fn test_lowercased() {
        let frags = fragments("The Quick BROWN fox", 4);
        assert_eq!(frags[0], vec!["the", "quick", "brown", "fox"]);
    }

    #[test]
    fn test_punctuation_separated() {
        let frags = fragments("hello, world. again", 2);
        // "hello , world . again" -> 4 windows of 2
        assert_eq!(frags.len(), 4);
        assert_eq!(frags[0], vec!["hello", ","]);
        assert_eq!(frags[2], vec!["world", "."]);
    }

    #[test]
    fn test_line_order_preserved() {
        let frags = fragments("a b c\nd e f", 3);
        assert_eq!(frags[0], vec!["a", "b", "c"]);
        assert_eq!(frags[1], vec!["d", "e", "f"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(fragments("", 3).is_empty());
        assert!(fragments("\n\n\n", 3).is_empty());
    }

    #[test]
    fn test_extra_whitespace_dropped() {
        let frags = fragments("one   two\tthree", 3);
        assert_eq!(frags, vec![vec!["one", "two", "three"]]);
    }
}
