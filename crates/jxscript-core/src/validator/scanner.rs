//! Literal and comment stripping.
//!
//! Most validator rules are regexes over source text. Run over raw text they
//! would trip on words inside strings (`"call foo()"` is not a call to
//! `foo`). This scanner blanks the contents of string, template and regex
//! literals and of comments, keeping delimiters and every newline so line
//! numbers in the stripped text match the original.
//!
//! It also records each literal it passes so the escaping heuristics can ask
//! about them without rescanning.

/// What delimited a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    SingleQuoted,
    DoubleQuoted,
    Template,
    Regex,
}

/// One literal found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    /// 1-based line of the opening delimiter.
    pub line: usize,
    /// Source text between the delimiters, escapes left as written.
    pub content: String,
    /// A bare newline appeared inside a quoted string.
    pub raw_newline: bool,
    /// The closing delimiter was found.
    pub terminated: bool,
}

impl Literal {
    /// Contains a `${` marker.
    pub fn has_interpolation_marker(&self) -> bool {
        self.content.contains("${")
    }

    pub fn is_quoted_string(&self) -> bool {
        matches!(self.kind, LiteralKind::SingleQuoted | LiteralKind::DoubleQuoted)
    }
}

/// Source with literal contents and comments blanked out.
#[derive(Debug, Clone, Default)]
pub struct Stripped {
    pub code: String,
    pub literals: Vec<Literal>,
}

/// Tokens after which a `/` starts a regex literal rather than a division.
const REGEX_PRECEDERS: &str = "(,=:[!&|?{};+-*%<>~^";

/// Keywords after which a `/` starts a regex literal.
const REGEX_KEYWORDS: &[&str] = &["return", "typeof", "case", "in", "of", "void", "delete", "throw"];

/// Blank literals and comments in `source`.
pub fn strip(source: &str) -> Stripped {
    let mut scanner = Scanner {
        chars: source.chars().collect(),
        pos: 0,
        line: 1,
        code: String::with_capacity(source.len()),
        literals: Vec::new(),
    };
    scanner.run();
    Stripped {
        code: scanner.code,
        literals: scanner.literals,
    }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    code: String,
    literals: Vec<Literal>,
}

impl Scanner {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn run(&mut self) {
        while let Some(ch) = self.peek(0) {
            match ch {
                '"' => self.quoted('"', LiteralKind::DoubleQuoted),
                '\'' => self.quoted('\'', LiteralKind::SingleQuoted),
                '`' => self.template(),
                '/' if self.peek(1) == Some('/') => self.line_comment(),
                '/' if self.peek(1) == Some('*') => self.block_comment(),
                '/' if self.regex_allowed() => self.regex(),
                '\n' => {
                    self.line += 1;
                    self.code.push('\n');
                    self.pos += 1;
                }
                other => {
                    self.code.push(other);
                    self.pos += 1;
                }
            }
        }
    }

    /// Emit a blank for a consumed character, keeping newlines.
    fn blank(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.code.push('\n');
        } else {
            self.code.push(' ');
        }
    }

    fn quoted(&mut self, quote: char, kind: LiteralKind) {
        let line = self.line;
        let mut content = String::new();
        let mut raw_newline = false;
        let mut terminated = false;

        self.code.push(quote);
        self.pos += 1;

        while let Some(ch) = self.peek(0) {
            if ch == '\\' {
                content.push(ch);
                self.blank(ch);
                self.pos += 1;
                if let Some(escaped) = self.peek(0) {
                    // A backslash-newline is a line continuation, not a raw newline.
                    content.push(escaped);
                    self.blank(escaped);
                    self.pos += 1;
                }
                continue;
            }
            if ch == quote {
                self.code.push(quote);
                self.pos += 1;
                terminated = true;
                break;
            }
            if ch == '\n' {
                // The string cannot continue past a bare newline; leave it to
                // the main loop so the next line scans as code.
                raw_newline = true;
                break;
            }
            content.push(ch);
            self.blank(ch);
            self.pos += 1;
        }

        self.literals.push(Literal {
            kind,
            line,
            content,
            raw_newline,
            terminated,
        });
    }

    fn template(&mut self) {
        let line = self.line;
        let mut content = String::new();
        let mut terminated = false;

        self.code.push('`');
        self.pos += 1;

        while let Some(ch) = self.peek(0) {
            if ch == '\\' {
                content.push(ch);
                self.blank(ch);
                self.pos += 1;
                if let Some(escaped) = self.peek(0) {
                    content.push(escaped);
                    self.blank(escaped);
                    self.pos += 1;
                }
                continue;
            }
            if ch == '`' {
                self.code.push('`');
                self.pos += 1;
                terminated = true;
                break;
            }
            content.push(ch);
            self.blank(ch);
            self.pos += 1;
        }

        self.literals.push(Literal {
            kind: LiteralKind::Template,
            line,
            content,
            raw_newline: false,
            terminated,
        });
    }

    fn regex(&mut self) {
        let line = self.line;
        let mut content = String::new();
        let mut in_class = false;
        let mut terminated = false;

        self.code.push('/');
        self.pos += 1;

        while let Some(ch) = self.peek(0) {
            match ch {
                '\n' => break,
                '\\' => {
                    content.push(ch);
                    self.blank(ch);
                    self.pos += 1;
                    if let Some(escaped) = self.peek(0).filter(|c| *c != '\n') {
                        content.push(escaped);
                        self.blank(escaped);
                        self.pos += 1;
                    }
                    continue;
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    self.code.push('/');
                    self.pos += 1;
                    terminated = true;
                    break;
                }
                _ => {}
            }
            content.push(ch);
            self.blank(ch);
            self.pos += 1;
        }

        self.literals.push(Literal {
            kind: LiteralKind::Regex,
            line,
            content,
            raw_newline: false,
            terminated,
        });
    }

    fn line_comment(&mut self) {
        while let Some(ch) = self.peek(0) {
            if ch == '\n' {
                break;
            }
            self.code.push(' ');
            self.pos += 1;
        }
    }

    fn block_comment(&mut self) {
        // Blank the opening `/*`.
        self.code.push_str("  ");
        self.pos += 2;
        while let Some(ch) = self.peek(0) {
            if ch == '*' && self.peek(1) == Some('/') {
                self.code.push_str("  ");
                self.pos += 2;
                return;
            }
            self.blank(ch);
            self.pos += 1;
        }
    }

    /// Decide whether a `/` here opens a regex literal.
    fn regex_allowed(&self) -> bool {
        let trimmed = self.code.trim_end();
        let mut rev = trimmed.chars().rev();
        let Some(last) = rev.next() else {
            return true;
        };
        // Postfix `++`/`--` ends an operand.
        if last == '+' || last == '-' {
            return rev.next() != Some(last);
        }
        if REGEX_PRECEDERS.contains(last) {
            return true;
        }
        if is_ident_char(last) {
            let word_start = trimmed
                .char_indices()
                .rev()
                .take_while(|(_, c)| is_ident_char(*c))
                .last()
                .map_or(0, |(i, _)| i);
            return REGEX_KEYWORDS.contains(&&trimmed[word_start..]);
        }
        false
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// 1-based line number of a byte offset in `text`.
pub fn line_at(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blanks_string_contents() {
        let stripped = strip(r#"var s = "call foo()"; bar();"#);
        assert_eq!(stripped.code, r#"var s = "          "; bar();"#);
        assert_eq!(stripped.literals.len(), 1);
        assert_eq!(stripped.literals[0].content, "call foo()");
        assert!(stripped.literals[0].terminated);
    }

    #[test]
    fn escaped_quotes_stay_inside() {
        let stripped = strip(r#"x = "a\"b(c)"; y = 'it\'s';"#);
        assert!(!stripped.code.contains('('));
        assert_eq!(stripped.literals.len(), 2);
        assert_eq!(stripped.literals[0].content, r#"a\"b(c)"#);
        assert_eq!(stripped.literals[1].kind, LiteralKind::SingleQuoted);
    }

    #[test]
    fn other_quote_inside_string() {
        let stripped = strip(r#"a("it's"); b('say "x"');"#);
        assert_eq!(stripped.literals.len(), 2);
        assert!(stripped.code.contains("b("));
    }

    #[test]
    fn comments_are_blanked() {
        let stripped = strip("a(); // foo()\n/* bar()\n */ baz();");
        assert!(!stripped.code.contains("foo"));
        assert!(!stripped.code.contains("bar"));
        assert!(stripped.code.contains("baz();"));
        assert_eq!(stripped.code.lines().count(), 3);
    }

    #[test]
    fn newlines_preserved_for_line_numbers() {
        let source = "var a = `one\ntwo`;\nfoo();";
        let stripped = strip(source);
        let offset = stripped.code.find("foo").unwrap();
        assert_eq!(line_at(&stripped.code, offset), 3);
    }

    #[test]
    fn raw_newline_in_string_is_recorded() {
        let stripped = strip("var s = \"broken\nnext();");
        assert!(stripped.literals[0].raw_newline);
        assert!(!stripped.literals[0].terminated);
        assert!(stripped.code.contains("next();"));
    }

    #[test]
    fn line_continuation_is_not_raw_newline() {
        let stripped = strip("var s = \"a\\\nb\";");
        assert!(!stripped.literals[0].raw_newline);
        assert!(stripped.literals[0].terminated);
    }

    #[test]
    fn regex_literal_vs_division() {
        let stripped = strip("var r = text.replace(/\"(x)/g, \"\"); var d = a / b / c;");
        assert_eq!(stripped.literals[0].kind, LiteralKind::Regex);
        assert_eq!(stripped.literals[0].content, "\"(x)");
        assert!(stripped.code.contains("a / b / c"));
        assert_eq!(stripped.literals.len(), 2);
    }

    #[test]
    fn division_after_non_ascii_identifier() {
        let stripped = strip("var half = naïveCount / 2; var r = /x/;");
        assert!(stripped.code.contains("naïveCount / 2"));
        assert_eq!(stripped.literals.len(), 1);
        assert_eq!(stripped.literals[0].kind, LiteralKind::Regex);
    }

    #[test]
    fn division_after_postfix_update() {
        let stripped = strip("var h = i++ / 2; var k = n-- / 4;");
        assert!(stripped.literals.is_empty());
        assert!(stripped.code.contains("i++ / 2"));
        assert!(stripped.code.contains("n-- / 4"));

        let stripped = strip("var s = a + /x/.source;");
        assert_eq!(stripped.literals[0].kind, LiteralKind::Regex);
    }

    #[test]
    fn regex_after_return() {
        let stripped = strip("return /[/]x/.test(s);");
        assert_eq!(stripped.literals[0].kind, LiteralKind::Regex);
        assert_eq!(stripped.literals[0].content, "[/]x");
    }

    #[test]
    fn template_records_interpolation() {
        let stripped = strip("var t = `hi ${name}`;");
        assert_eq!(stripped.literals[0].kind, LiteralKind::Template);
        assert!(stripped.literals[0].has_interpolation_marker());
        assert!(!stripped.code.contains("name"));
    }

    #[test]
    fn line_at_counts() {
        assert_eq!(line_at("a\nb\nc", 0), 1);
        assert_eq!(line_at("a\nb\nc", 2), 2);
        assert_eq!(line_at("a\nb\nc", 100), 3);
    }
}
