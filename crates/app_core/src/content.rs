//! Text transforms applied to file content (`tail`, `rev`)

/// Number of lines `tail` prints by default
pub const DEFAULT_TAIL_LINES: usize = 10;

/// Last `n` lines of `text`, line terminators preserved
///
/// Text with fewer than `n` lines is returned whole.
pub fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let skip = lines.len().saturating_sub(n);
    lines[skip..].concat()
}

/// Reverse the characters of every line, keeping line order
///
/// Terminators (`\n`, `\r\n`) are dropped and the lines are rejoined with a
/// single `\n`. Reversal works on Unicode scalar values, so multi-byte text
/// stays valid.
pub fn reverse_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.chars().rev().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Hello, World!\nThis is a test file.\nSecond line.\n";

    #[test]
    fn test_tail_fewer_lines_than_requested() {
        assert_eq!(tail(SAMPLE, DEFAULT_TAIL_LINES), SAMPLE);
    }

    #[test]
    fn test_tail_last_lines() {
        assert_eq!(tail(SAMPLE, 2), "This is a test file.\nSecond line.\n");
        assert_eq!(tail(SAMPLE, 0), "");
    }

    #[test]
    fn test_tail_keeps_terminators() {
        let text = "a\r\nb\r\nc";
        assert_eq!(tail(text, 2), "b\r\nc");
    }

    #[test]
    fn test_tail_many_lines() {
        let text: String = (1..=25).map(|i| format!("line {}\n", i)).collect();
        let result = tail(&text, DEFAULT_TAIL_LINES);
        assert_eq!(result.lines().count(), 10);
        assert!(result.starts_with("line 16\n"));
        assert!(result.ends_with("line 25\n"));
    }

    #[test]
    fn test_tail_empty() {
        assert_eq!(tail("", 10), "");
    }

    #[test]
    fn test_reverse_lines() {
        assert_eq!(
            reverse_lines(SAMPLE),
            "!dlroW ,olleH\n.elif tset a si sihT\n.enil dnoceS"
        );
    }

    #[test]
    fn test_reverse_multibyte() {
        assert_eq!(reverse_lines("Привет\nмир"), "тевирП\nрим");
    }

    #[test]
    fn test_reverse_crlf() {
        assert_eq!(reverse_lines("ab\r\ncd\r\n"), "ba\ndc");
    }

    #[test]
    fn test_reverse_involution() {
        let once = reverse_lines(SAMPLE);
        let twice = reverse_lines(&once);
        assert_eq!(twice, SAMPLE.trim_end_matches('\n'));
        assert_eq!(twice.lines().collect::<Vec<_>>(), SAMPLE.lines().collect::<Vec<_>>());
    }
}
