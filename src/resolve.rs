//! Classifies the tokens after a command's path into option occurrences and
//! positional slots.
//!
//! Resolution is a single left to right pass. Option-like tokens naming a
//! declared option become occurrences and pull their values from the tokens
//! that follow; everything else is queued as a positional candidate. The queue
//! is then distributed over the shape's fixed slots, with leftovers going to
//! the unbounded slot if there is one.
//!
//! Nothing here looks at what options *mean*: repeated occurrences are all
//! kept, in argv order, and folding them is up to the fields.

use crate::{
    lex::{Token, TokenKind},
    shape::{OptionSpec, Shape},
    Error, Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// A switch; `false` comes from the `--no-` spelling.
    Flag(bool),
    /// Exactly `arity` values.
    Values(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// The declared alias that matched, `-v` for both `-v` and `--no-v`.
    pub name: String,
    pub value: OptionValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotCategory {
    Required,
    Optional,
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalSlot {
    pub value: String,
    pub category: SlotCategory,
}

/// Per-invocation classification of an argv against one shape.
///
/// Field extraction pops positional slots off this as it goes, so it is
/// consumed by the time all fields have run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMatch<'a> {
    pub shape: &'a Shape,
    pub options: Vec<Occurrence>,
    pub positionals: Vec<PositionalSlot>,
}

impl<'a> ResolvedMatch<'a> {
    /// Occurrences of any of `names`, in argv order.
    pub fn occurrences<'s>(&'s self, names: &'s [String]) -> impl Iterator<Item = &'s Occurrence> {
        self.options.iter().filter(move |it| names.contains(&it.name))
    }

    /// Removes and returns the first slot of `category`.
    pub fn pop_positional(&mut self, category: SlotCategory) -> Option<String> {
        let idx = self.positionals.iter().position(|it| it.category == category)?;
        Some(self.positionals.remove(idx).value)
    }

    /// Removes and returns every unbounded slot.
    pub fn take_unbounded(&mut self) -> Vec<String> {
        let (taken, kept) = std::mem::take(&mut self.positionals)
            .into_iter()
            .partition::<Vec<_>, _>(|it| it.category == SlotCategory::Unbounded);
        self.positionals = kept;
        taken.into_iter().map(|it| it.value).collect()
    }
}

pub fn resolve<'a>(shape: &'a Shape, tokens: &[Token]) -> Result<ResolvedMatch<'a>> {
    let fixed = shape.positionals().len();
    let proxy = shape.has_proxy();

    let mut options = Vec::new();
    let mut candidates: Vec<String> = Vec::new();
    let mut proxied = Vec::new();

    let mut pos = 0;
    while pos < tokens.len() {
        // With fixed slots, the proxy opens right after the last one is filled.
        if proxy && fixed > 0 && candidates.len() >= fixed {
            proxied = verbatim(&tokens[pos..]);
            break;
        }
        let token = &tokens[pos];
        let proxy_ready = proxy && candidates.len() >= fixed;
        match &token.kind {
            TokenKind::RawArgsMarker | TokenKind::Literal(_) if proxy_ready => {
                proxied = verbatim(&tokens[pos..]);
                break;
            }
            TokenKind::RawArgsMarker => pos += 1,
            TokenKind::Literal(it) => {
                candidates.push(it.clone());
                pos += 1;
            }
            TokenKind::OptionLike { .. } => {
                let end = pos + tokens[pos..].iter().take_while(|it| it.arg == token.arg).count();
                let group = &tokens[pos..end];
                let declared: Option<Vec<_>> = group.iter().map(|it| declared(shape, it)).collect();
                let declared = match declared {
                    Some(it) => it,
                    None if proxy_ready => {
                        proxied = verbatim(&tokens[pos..]);
                        break;
                    }
                    None => {
                        // An unknown member makes the whole argv element a
                        // positional value, spelled as typed.
                        candidates.push(token.raw.clone());
                        pos = end;
                        continue;
                    }
                };
                pos = end;
                let n = declared.len();
                for (i, option) in declared.into_iter().enumerate() {
                    let occurrence = occurrence(option, i + 1 == n, tokens, &mut pos)?;
                    options.push(occurrence);
                }
            }
        }
    }

    let positionals = distribute(shape, candidates, proxied)?;
    tracing::debug!(
        path = ?shape.path(),
        options = options.len(),
        positionals = positionals.len(),
        "resolved arguments"
    );
    Ok(ResolvedMatch { shape, options, positionals })
}

struct Declared<'t, 's> {
    /// As typed, for error messages.
    spelled: &'t str,
    bound: Option<&'t str>,
    alias: &'s str,
    spec: &'s OptionSpec,
    negated: bool,
}

fn declared<'t, 's>(shape: &'s Shape, token: &'t Token) -> Option<Declared<'t, 's>> {
    match &token.kind {
        TokenKind::OptionLike { name, value } => {
            let (spec, alias, negated) = shape.lookup(name)?;
            Some(Declared { spelled: name, bound: value.as_deref(), alias, spec, negated })
        }
        _ => None,
    }
}

fn occurrence(
    option: Declared<'_, '_>,
    last_in_bundle: bool,
    tokens: &[Token],
    pos: &mut usize,
) -> Result<Occurrence> {
    let name = option.alias.to_string();
    if option.negated || option.spec.arity == 0 {
        if option.bound.is_some() {
            return Err(Error::BindingNotAllowed { option: option.spelled.to_string() });
        }
        return Ok(Occurrence { name, value: OptionValue::Flag(!option.negated) });
    }

    let mut values = Vec::with_capacity(option.spec.arity);
    if let Some(bound) = option.bound {
        if !option.spec.allow_binding {
            return Err(Error::BindingNotAllowed { option: option.spelled.to_string() });
        }
        values.push(bound.to_string());
    }
    while values.len() < option.spec.arity {
        let value = if last_in_bundle { tokens.get(*pos).and_then(Token::literal) } else { None };
        match value {
            Some(it) => {
                values.push(it.to_string());
                *pos += 1;
            }
            None => return Err(Error::MissingOptionValue { option: option.spelled.to_string() }),
        }
    }
    Ok(Occurrence { name, value: OptionValue::Values(values) })
}

/// Each argv element once, as typed, minus the `--` boundary.
fn verbatim(tokens: &[Token]) -> Vec<String> {
    let mut res = Vec::new();
    let mut prev = None;
    for token in tokens {
        if token.kind == TokenKind::RawArgsMarker || prev == Some(token.arg) {
            continue;
        }
        prev = Some(token.arg);
        res.push(token.raw.clone());
    }
    res
}

/// Optional slots fill leftmost first, and only while there are more
/// candidates left than required slots still waiting for one.
fn distribute(
    shape: &Shape,
    candidates: Vec<String>,
    proxied: Vec<String>,
) -> Result<Vec<PositionalSlot>> {
    let mut remaining_required = shape.positionals().iter().filter(|it| it.required).count();
    let mut remaining = candidates.len();
    let mut candidates = candidates.into_iter();

    let mut res = Vec::new();
    for slot in shape.positionals() {
        if slot.required {
            let value = candidates
                .next()
                .ok_or_else(|| Error::MissingRequiredPositional { slot: slot.name.clone() })?;
            remaining -= 1;
            remaining_required -= 1;
            res.push(PositionalSlot { value, category: SlotCategory::Required });
        } else if remaining > remaining_required {
            if let Some(value) = candidates.next() {
                remaining -= 1;
                res.push(PositionalSlot { value, category: SlotCategory::Optional });
            }
        }
    }

    let extra: Vec<String> = candidates.collect();
    if shape.unbounded().is_none() {
        if !extra.is_empty() {
            return Err(Error::TooManyArguments { extra });
        }
        return Ok(res);
    }
    let unbounded = extra.into_iter().chain(proxied);
    res.extend(unbounded.map(|value| PositionalSlot { value, category: SlotCategory::Unbounded }));
    Ok(res)
}
