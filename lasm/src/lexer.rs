//! Line lexer for `.a` sources.
//!
//! Tokens are separated by whitespace or commas. A `:` terminates the
//! preceding token and marks it; `;` starts a comment running to the end of
//! the line. String literals accept `"` or `'` delimiters with the escapes
//! `\n \t \r \\ \" \'`; a single-quoted single character is a character
//! literal carrying its ASCII code.

use crate::Word;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare token; `colon` records an attached label colon.
    Word { text: String, colon: bool },
    Str(String),
    Char(Word),
}

impl Token {
    pub fn word(text: &str) -> Token {
        Token::Word {
            text: text.to_string(),
            colon: false,
        }
    }
}

/// One lexed source line, label already split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: u32,
    pub text: String,
    pub label: Option<String>,
    pub tokens: Vec<Token>,
}

const LABEL_START: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$@";

pub fn is_label_start(ch: char) -> bool {
    LABEL_START.contains(ch)
}

pub fn is_label_char(ch: char) -> bool {
    is_label_start(ch) || ch.is_ascii_digit()
}

pub fn valid_label(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_label_start(first) => chars.all(is_label_char),
        _ => false,
    }
}

fn unescape(ch: char) -> Result<char, String> {
    Ok(match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '\\' => '\\',
        '"' => '"',
        '\'' => '\'',
        other => return Err(format!("unknown escape \\{}", other)),
    })
}

fn lex_quoted(chars: &mut std::iter::Peekable<std::str::Chars>, delim: char) -> Result<String, String> {
    let mut content = String::new();
    loop {
        match chars.next() {
            None => return Err("missing terminating quote".to_string()),
            Some('\\') => match chars.next() {
                None => return Err("missing terminating quote".to_string()),
                Some(esc) => content.push(unescape(esc)?),
            },
            Some(ch) if ch == delim => return Ok(content),
            Some(ch) => content.push(ch),
        }
    }
}

/// Lexes one raw source line into tokens, stripping the comment tail and
/// splitting off a leading label.
///
/// A token is a label definition iff it carries a `:` or the line begins in
/// column 0 with a non-whitespace character.
pub fn lex_line(number: u32, text: &str) -> Result<Line, String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let column0 = text
        .chars()
        .next()
        .map(|ch| !ch.is_whitespace() && ch != ';')
        .unwrap_or(false);

    let mut current = String::new();
    let flush = |tokens: &mut Vec<Token>, current: &mut String, colon: bool| {
        if !current.is_empty() || colon {
            tokens.push(Token::Word {
                text: std::mem::replace(current, String::new()),
                colon,
            });
        }
    };

    while let Some(ch) = chars.next() {
        match ch {
            ';' => break,
            ':' => flush(&mut tokens, &mut current, true),
            ch if ch.is_whitespace() || ch == ',' => flush(&mut tokens, &mut current, false),
            '"' | '\'' => {
                flush(&mut tokens, &mut current, false);
                let content = lex_quoted(&mut chars, ch)?;
                if ch == '\'' && content.chars().count() == 1 {
                    let value = content.chars().next().unwrap() as u32;
                    tokens.push(Token::Char(value as Word));
                } else {
                    tokens.push(Token::Str(content));
                }
            }
            ch => current.push(ch),
        }
    }
    flush(&mut tokens, &mut current, false);

    let mut label = None;
    if let Some(Token::Word { text, colon }) = tokens.first() {
        // directives sit in the label column without being labels
        let candidate = *colon || (column0 && !text.starts_with('.'));
        if candidate {
            let name = text.clone();
            if !valid_label(&name) {
                return Err(format!("bad label: {}", name));
            }
            label = Some(name);
            tokens.remove(0);
        }
    }

    // a stray colon anywhere else is not a label definition
    if tokens.iter().any(|t| matches!(t, Token::Word { colon: true, .. })) {
        return Err("unexpected ':'".to_string());
    }

    Ok(Line {
        number,
        text: text.to_string(),
        label,
        tokens,
    })
}
