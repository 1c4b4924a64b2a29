//! A tiny interpreter for the literal subset of the dialect.
//!
//! Enough to read back what the escaper and builder wrote: quoted string
//! literals with every escape form the dialect accepts, and
//! `var NAME = "...";` declarations in a built script.

/// Read the string literal at the start of `src`.
///
/// Returns the decoded value and the number of bytes consumed, closing quote
/// included.
pub fn parse_string_literal(src: &str) -> Result<(String, usize), String> {
    let mut chars = src.char_indices().peekable();
    let quote = match chars.next() {
        Some((_, q @ ('"' | '\''))) => q,
        _ => return Err("literal must start with a quote".to_string()),
    };

    let mut out = String::new();
    while let Some((at, ch)) = chars.next() {
        match ch {
            c if c == quote => return Ok((out, at + c.len_utf8())),
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
                return Err(format!("raw line terminator at byte {}", at));
            }
            '\\' => {
                let Some((_, esc)) = chars.next() else {
                    break;
                };
                match esc {
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'b' => out.push('\u{08}'),
                    'f' => out.push('\u{0C}'),
                    'v' => out.push('\u{0B}'),
                    '0' => out.push('\0'),
                    // Line continuation.
                    '\n' | '\u{2028}' | '\u{2029}' => {}
                    '\r' => {
                        if chars.peek().is_some_and(|(_, c)| *c == '\n') {
                            chars.next();
                        }
                    }
                    'x' => {
                        let code = take_hex(&mut chars, 2)?;
                        out.push(char_from(code)?);
                    }
                    'u' => {
                        let code = if chars.peek().is_some_and(|(_, c)| *c == '{') {
                            chars.next();
                            let mut digits = String::new();
                            loop {
                                match chars.next() {
                                    Some((_, '}')) => break,
                                    Some((_, d)) => digits.push(d),
                                    None => return Err("unterminated \\u{...}".to_string()),
                                }
                            }
                            u32::from_str_radix(&digits, 16).map_err(|e| e.to_string())?
                        } else {
                            take_hex(&mut chars, 4)?
                        };
                        push_code_unit(&mut out, &mut chars, code)?;
                    }
                    other => out.push(other),
                }
            }
            other => out.push(other),
        }
    }

    Err("unterminated string literal".to_string())
}

fn take_hex(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    count: usize,
) -> Result<u32, String> {
    let mut digits = String::with_capacity(count);
    for _ in 0..count {
        match chars.next() {
            Some((_, d)) if d.is_ascii_hexdigit() => digits.push(d),
            _ => return Err(format!("expected {} hex digits", count)),
        }
    }
    u32::from_str_radix(&digits, 16).map_err(|e| e.to_string())
}

fn char_from(code: u32) -> Result<char, String> {
    char::from_u32(code).ok_or_else(|| format!("invalid code point {:#x}", code))
}

/// Push a `\uXXXX` unit, pairing a high surrogate with a following `\uXXXX` low one.
fn push_code_unit(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    code: u32,
) -> Result<(), String> {
    if (0xD800..0xDC00).contains(&code) {
        let backslash = chars.next().map(|(_, c)| c);
        let u = chars.next().map(|(_, c)| c);
        if backslash != Some('\\') || u != Some('u') {
            return Err("unpaired high surrogate".to_string());
        }
        let low = take_hex(chars, 4)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err("unpaired high surrogate".to_string());
        }
        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
        out.push(char_from(combined)?);
        return Ok(());
    }
    out.push(char_from(code)?);
    Ok(())
}

/// Value of the string literal bound by `var NAME = "...";` in `script`.
pub fn extract_string_var(script: &str, name: &str) -> Result<String, String> {
    let needle = format!("var {} = ", name);
    let start = script
        .find(&needle)
        .ok_or_else(|| format!("no declaration of '{}'", name))?;
    let rest = &script[start + needle.len()..];
    let (value, consumed) = parse_string_literal(rest)?;
    if !rest[consumed..].trim_start().starts_with(';') {
        return Err(format!("declaration of '{}' continues past its literal", name));
    }
    Ok(value)
}

/// Text of the initializer in `var NAME = ...;`, as written.
pub fn extract_initializer<'a>(script: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("var {} = ", name);
    let start = script.find(&needle)? + needle.len();
    let line_end = script[start..].find('\n').map_or(script.len(), |n| start + n);
    script[start..line_end].trim_end().strip_suffix(';')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_escapes() {
        let (value, used) = parse_string_literal(r#""a\"b\\c\n" rest"#).unwrap();
        assert_eq!(value, "a\"b\\c\n");
        assert_eq!(used, 11);
    }

    #[test]
    fn single_quotes_and_unicode() {
        let (value, _) =
            parse_string_literal(r"'it\'s \u2028 \x41 \u{1F600} \uD83D\uDE00'").unwrap();
        assert_eq!(value, "it's \u{2028} A \u{1F600} \u{1F600}");
    }

    #[test]
    fn rejects_raw_newline_and_eof() {
        assert!(parse_string_literal("\"a\nb\"").is_err());
        assert!(parse_string_literal("\"abc").is_err());
        assert!(parse_string_literal("abc").is_err());
    }

    #[test]
    fn reads_declaration() {
        let script = "(function () {\n  var q = \"He said \\\"hi\\\"\";\n})();";
        assert_eq!(extract_string_var(script, "q").unwrap(), "He said \"hi\"");
        assert!(extract_string_var(script, "missing").is_err());
        assert_eq!(extract_initializer(script, "q"), Some("\"He said \\\"hi\\\"\""));
    }
}
