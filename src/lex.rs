//! Splits a raw argument vector into tokens.
//!
//! The lexer knows nothing about declared shapes: it only recognizes option
//! syntax (`--name`, `--name=value`, `-abc`, `-abc=value`) and the `--`
//! boundary. Whether an option-like token names a declared option is decided
//! later, by the resolver.

/// One lexical unit of argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The argv element this token came from, spelled as the user typed it.
    pub raw: String,
    /// Index of that argv element. Tokens of a short bundle share it.
    pub arg: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Literal(String),
    OptionLike { name: String, value: Option<String> },
    RawArgsMarker,
}

impl Token {
    pub fn literal(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Literal(it) => Some(it.as_str()),
            _ => None,
        }
    }
}

pub fn lex<I, S>(args: I) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut res = Vec::new();
    let mut after_double_dash = false;

    for (arg, raw) in args.into_iter().map(Into::into).enumerate() {
        if after_double_dash {
            res.push(Token { kind: TokenKind::Literal(raw.clone()), raw, arg });
            continue;
        }
        if raw == "--" {
            after_double_dash = true;
            res.push(Token { kind: TokenKind::RawArgsMarker, raw, arg });
            continue;
        }
        if let Some(long) = raw.strip_prefix("--") {
            let (name, value) = split_binding(long);
            if is_long_name(name) {
                let name = format!("--{name}");
                let kind = TokenKind::OptionLike { name, value: value.map(String::from) };
                res.push(Token { kind, raw: raw.clone(), arg });
                continue;
            }
        } else if let Some(short) = raw.strip_prefix('-') {
            let (bundle, value) = split_binding(short);
            if !bundle.is_empty() && bundle.chars().all(is_short_char) {
                let n = bundle.chars().count();
                for (i, c) in bundle.chars().enumerate() {
                    // Only the last flag of a bundle gets the bound value.
                    let value = if i + 1 == n { value.map(String::from) } else { None };
                    let kind = TokenKind::OptionLike { name: format!("-{c}"), value };
                    res.push(Token { kind, raw: raw.clone(), arg });
                }
                continue;
            }
        }
        res.push(Token { kind: TokenKind::Literal(raw.clone()), raw, arg });
    }

    tracing::trace!(tokens = res.len(), "lexed argv");
    res
}

fn split_binding(s: &str) -> (&str, Option<&str>) {
    match s.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (s, None),
    }
}

fn is_long_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('-') && !name.chars().any(char::is_whitespace)
}

fn is_short_char(c: char) -> bool {
    c != '-' && !c.is_whitespace()
}
