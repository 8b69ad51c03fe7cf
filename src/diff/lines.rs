/// Splits text into lines, keeping each line's terminator.
///
/// Recognises the same boundaries as Python's `str.splitlines`: `\n`,
/// `\r\n`, `\r`, vertical tab, form feed, the file/group/record separators,
/// NEL and the Unicode line and paragraph separators. Concatenating the
/// result reproduces the input exactly.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let end = match ch {
            '\r' => match chars.peek() {
                Some(&(next_idx, '\n')) => {
                    chars.next();
                    next_idx + 1
                }
                _ => idx + 1,
            },
            '\n' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
            | '\u{2028}' | '\u{2029}' => idx + ch.len_utf8(),
            _ => continue,
        };
        lines.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_keeps_terminators() {
        assert_eq!(split_lines("a\nb\n"), vec!["a\n", "b\n"]);
        assert_eq!(split_lines("a\nb"), vec!["a\n", "b"]);
    }

    #[test]
    fn test_mixed_terminators() {
        let text = "one\r\ntwo\rthree\u{2028}four";
        let lines = split_lines(text);
        assert_eq!(lines, vec!["one\r\n", "two\r", "three\u{2028}", "four"]);
        assert_eq!(lines.concat(), text);
    }

    #[test]
    fn test_control_and_unicode_boundaries() {
        let text = "a\x0bb\x0cc\x1cd\x1de\x1ef\u{85}g\u{2029}h";
        let lines = split_lines(text);
        assert_eq!(
            lines,
            vec![
                "a\x0b", "b\x0c", "c\x1c", "d\x1d", "e\x1e", "f\u{85}", "g\u{2029}", "h"
            ]
        );
        assert_eq!(lines.concat(), text);
    }

    #[test]
    fn test_tab_and_unit_separator_do_not_split() {
        assert_eq!(split_lines("a\tb\x1fc\n"), vec!["a\tb\x1fc\n"]);
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(split_lines("\n\n"), vec!["\n", "\n"]);
    }
}
