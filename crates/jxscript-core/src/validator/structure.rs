//! Delimiter balance and loop shape, over stripped code.

use jxscript_types::{FindingType, ValidationFinding};

/// Check that `{}`, `()` and `[]` pair up. Reports the first problem only;
/// anything after a mismatch is noise.
pub fn check_delimiters(code: &str) -> Option<ValidationFinding> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut line = 1;

    for ch in code.chars() {
        match ch {
            '\n' => line += 1,
            '{' | '(' | '[' => stack.push((ch, line)),
            '}' | ')' | ']' => {
                let expected = opening_for(ch);
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, open_line)) => {
                        return Some(
                            ValidationFinding::error(
                                FindingType::Syntax,
                                format!(
                                    "Mismatched '{}': '{}' opened on line {} is still open",
                                    ch, open, open_line
                                ),
                            )
                            .at_line(line),
                        );
                    }
                    None => {
                        return Some(
                            ValidationFinding::error(
                                FindingType::Syntax,
                                format!("Unexpected '{}' with nothing open", ch),
                            )
                            .at_line(line),
                        );
                    }
                }
            }
            _ => {}
        }
    }

    stack.pop().map(|(open, open_line)| {
        ValidationFinding::error(
            FindingType::Syntax,
            format!("Unclosed '{}' opened on line {}", open, open_line),
        )
        .at_line(open_line)
    })
}

fn opening_for(close: char) -> char {
    match close {
        '}' => '{',
        ')' => '(',
        _ => '[',
    }
}

/// What the loop walk found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopShape {
    /// Deepest nesting of loop bodies.
    pub max_depth: usize,
    /// Line where `max_depth` was first reached.
    pub deepest_line: Option<usize>,
    /// Line of the first `+= "..."` inside a loop body.
    pub concat_in_loop: Option<usize>,
}

/// Walk braces, marking those that open `for`/`while`/`do` bodies.
///
/// Loops without braces do not count; that shape is rare in generated code.
pub fn loop_shape(code: &str) -> LoopShape {
    let chars: Vec<char> = code.chars().collect();
    let mut shape = LoopShape::default();

    // One entry per open brace: does it open a loop body?
    let mut braces: Vec<bool> = Vec::new();
    let mut depth = 0usize;
    let mut paren_depth = 0usize;
    let mut header_at: Option<usize> = None;
    let mut awaiting_header = false;
    let mut awaiting_body = false;
    let mut line = 1;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch.is_alphabetic() || ch == '_' || ch == '$' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let member = start > 0 && chars[start - 1] == '.';
            awaiting_body = false;
            if !member {
                match word.as_str() {
                    "for" | "while" => awaiting_header = true,
                    "do" => awaiting_body = true,
                    _ => {}
                }
            }
            continue;
        }

        match ch {
            '\n' => line += 1,
            '(' => {
                if awaiting_header && header_at.is_none() {
                    header_at = Some(paren_depth);
                    awaiting_header = false;
                }
                paren_depth += 1;
            }
            ')' => {
                paren_depth = paren_depth.saturating_sub(1);
                if header_at == Some(paren_depth) {
                    header_at = None;
                    awaiting_body = true;
                    i += 1;
                    continue;
                }
            }
            '{' => {
                let is_loop = awaiting_body;
                awaiting_body = false;
                braces.push(is_loop);
                if is_loop {
                    depth += 1;
                    if depth > shape.max_depth {
                        shape.max_depth = depth;
                        shape.deepest_line = Some(line);
                    }
                }
            }
            '}' => {
                if braces.pop() == Some(true) {
                    depth = depth.saturating_sub(1);
                }
            }
            '+' if depth > 0 && chars.get(i + 1) == Some(&'=') && shape.concat_in_loop.is_none() => {
                let next = chars[i + 2..].iter().find(|c| !c.is_whitespace());
                if matches!(next, Some(&'"') | Some(&'\'')) {
                    shape.concat_in_loop = Some(line);
                }
            }
            _ => {}
        }

        if !ch.is_whitespace() && ch != '{' && ch != ')' && header_at.is_none() {
            awaiting_body = false;
        }
        i += 1;
    }

    shape
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_is_clean() {
        assert!(check_delimiters("(function () { var a = [1, (2)]; })();").is_none());
    }

    #[test]
    fn unclosed_brace() {
        let finding = check_delimiters("function f() {\n  return 1;\n").unwrap();
        assert_eq!(finding.finding_type, FindingType::Syntax);
        assert!(finding.message.contains("Unclosed '{'"));
        assert_eq!(finding.line, Some(1));
    }

    #[test]
    fn stray_close() {
        let finding = check_delimiters("a();\n}").unwrap();
        assert!(finding.message.contains("Unexpected '}'"));
        assert_eq!(finding.line, Some(2));
    }

    #[test]
    fn mismatch() {
        let finding = check_delimiters("f(a]").unwrap();
        assert!(finding.message.contains("Mismatched ']'"));
    }

    #[test]
    fn counts_nested_loops() {
        let code = "for (var i = 0; i < n; i++) {\n  while (x) {\n    for (k in o) {\n    }\n  }\n}";
        let shape = loop_shape(code);
        assert_eq!(shape.max_depth, 3);
        assert_eq!(shape.deepest_line, Some(3));
    }

    #[test]
    fn plain_blocks_are_not_loops() {
        let code = "if (a) { if (b) { function f() { } } }";
        assert_eq!(loop_shape(code).max_depth, 0);
    }

    #[test]
    fn do_while_counts() {
        let code = "do { for (;;) { } } while (x);";
        assert_eq!(loop_shape(code).max_depth, 2);
    }

    #[test]
    fn loop_header_with_call_in_condition() {
        let code = "while (next(it)) { go(); }\nif (x) { }";
        assert_eq!(loop_shape(code).max_depth, 1);
    }

    #[test]
    fn concat_inside_loop_only() {
        let looped = "for (var i = 0; i < 3; i++) {\n  s += \" \";\n}";
        assert_eq!(loop_shape(looped).concat_in_loop, Some(2));

        let flat = "s += \" \";";
        assert_eq!(loop_shape(flat).concat_in_loop, None);

        let numeric = "for (;;) { n += 1; }";
        assert_eq!(loop_shape(numeric).concat_in_loop, None);
    }

    #[test]
    fn member_named_for_is_not_a_loop() {
        let code = "obj.while(x) { }";
        assert_eq!(loop_shape(code).max_depth, 0);
    }
}
