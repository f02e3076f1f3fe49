//! Filter list source handling.
//!
//! A filter list is split into lines while preserving the original line
//! terminators, so that a fix rewrite can reconstruct byte-identical output
//! for unchanged lines.

/// One line of a filter list: the content without its terminator, the
/// terminator itself (`"\n"`, `"\r\n"`, or `""` for the final line), and
/// the byte offset of the line start within the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLine<'a> {
    pub text: &'a str,
    pub terminator: &'a str,
    pub offset: usize,
}

/// Split filter list content into lines. Every `\n` or `\r\n` terminator
/// produces a following line, so content ending with a newline yields a
/// final empty line with an empty terminator. Concatenating
/// `text + terminator` over all lines reproduces the input exactly.
pub fn split_lines(content: &str) -> Vec<InputLine<'_>> {
    let bytes = content.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' {
            let text_end = if i > start && bytes[i - 1] == b'\r' {
                i - 1
            } else {
                i
            };
            lines.push(InputLine {
                text: &content[start..text_end],
                terminator: &content[text_end..=i],
                offset: start,
            });
            start = i + 1;
        }
        i += 1;
    }
    lines.push(InputLine {
        text: &content[start..],
        terminator: "",
        offset: start,
    });
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(content: &str) -> Vec<(&str, &str)> {
        split_lines(content)
            .into_iter()
            .map(|l| (l.text, l.terminator))
            .collect()
    }

    #[test]
    fn empty_content_is_one_empty_line() {
        assert_eq!(texts(""), vec![("", "")]);
    }

    #[test]
    fn single_line_without_terminator() {
        assert_eq!(texts("abc"), vec![("abc", "")]);
    }

    #[test]
    fn trailing_newline_yields_empty_final_line() {
        assert_eq!(texts("abc\n"), vec![("abc", "\n"), ("", "")]);
    }

    #[test]
    fn crlf_terminators_preserved() {
        assert_eq!(
            texts("a\r\nb\nc"),
            vec![("a", "\r\n"), ("b", "\n"), ("c", "")]
        );
    }

    #[test]
    fn blank_lines_kept() {
        assert_eq!(texts("a\n\nb"), vec![("a", "\n"), ("", "\n"), ("b", "")]);
    }

    #[test]
    fn bare_cr_is_line_content() {
        // A `\r` not followed by `\n` is ordinary content.
        assert_eq!(texts("a\rb\nc"), vec![("a\rb", "\n"), ("c", "")]);
    }

    #[test]
    fn offsets_point_at_line_starts() {
        let lines = split_lines("ab\r\ncd\ne");
        assert_eq!(lines[0].offset, 0);
        assert_eq!(lines[1].offset, 4);
        assert_eq!(lines[2].offset, 7);
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn concat_is_identity(content in "[a-z\r\n]{0,200}") {
                let rebuilt: String = split_lines(&content)
                    .iter()
                    .map(|l| format!("{}{}", l.text, l.terminator))
                    .collect();
                prop_assert_eq!(rebuilt, content);
            }

            #[test]
            fn no_line_text_contains_newline(content in "[a-z\r\n]{0,200}") {
                for line in split_lines(&content) {
                    prop_assert!(!line.text.contains('\n'));
                }
            }

            #[test]
            fn offsets_slice_back(content in "[a-z\r\n]{0,200}") {
                for line in split_lines(&content) {
                    prop_assert_eq!(
                        &content[line.offset..line.offset + line.text.len()],
                        line.text
                    );
                }
            }
        }
    }
}
