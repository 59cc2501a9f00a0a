//! Picks the registered shape an argv selects by its leading literal tokens.

use crate::{lex::Token, shape::Shape};

/// Tunables for the "did you mean" suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    pub max_suggestions: usize,
    /// Candidates further away than this edit distance are not suggested.
    pub max_distance: usize,
}

impl Default for MatchConfig {
    fn default() -> MatchConfig {
        MatchConfig { max_suggestions: 3, max_distance: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// `consumed` leading tokens spelled the shape's path.
    Matched { shape: usize, consumed: usize },
    NotFound { input: String, suggestions: Vec<String> },
    /// The argv ended where a command word was expected. `expected` lists
    /// the segments that could follow, in registration order.
    Incomplete { expected: Vec<String> },
    /// Several shapes share the longest matching path. Candidates are in
    /// registration order.
    Ambiguous { candidates: Vec<usize>, consumed: usize },
}

pub fn match_shapes(shapes: &[Shape], tokens: &[Token], config: &MatchConfig) -> MatchOutcome {
    let leading: Vec<&str> = tokens.iter().map_while(Token::literal).collect();

    let mut longest = 0;
    let mut candidates = Vec::new();
    for (idx, shape) in shapes.iter().enumerate() {
        if !is_prefix(shape.path(), &leading) {
            continue;
        }
        let len = shape.path().len();
        if candidates.is_empty() || len > longest {
            longest = len;
            candidates.clear();
            candidates.push(idx);
        } else if len == longest {
            candidates.push(idx);
        }
    }

    match candidates.len() {
        0 => {
            let depth = shared_depth(shapes, &leading);
            let input = match (leading.get(depth), tokens.get(depth)) {
                (Some(it), _) => it.to_string(),
                (None, Some(it)) => it.raw.clone(),
                (None, None) => {
                    let expected = next_segments(shapes, &leading[..depth]);
                    return MatchOutcome::Incomplete {
                        expected: expected.into_iter().map(String::from).collect(),
                    };
                }
            };
            let suggestions = suggest(shapes, &leading[..depth], &input, config);
            MatchOutcome::NotFound { input, suggestions }
        }
        1 => MatchOutcome::Matched { shape: candidates[0], consumed: longest },
        _ => MatchOutcome::Ambiguous { candidates, consumed: longest },
    }
}

/// Path segments that could follow `prefix`, closest to `input` first.
/// Equal distances keep registration order.
pub fn suggest(
    shapes: &[Shape],
    prefix: &[&str],
    input: &str,
    config: &MatchConfig,
) -> Vec<String> {
    let mut scored: Vec<(usize, &str)> = next_segments(shapes, prefix)
        .into_iter()
        .map(|it| (strsim::levenshtein(input, it), it))
        .filter(|(distance, _)| *distance <= config.max_distance)
        .collect();
    // Stable sort keeps registration order among equals.
    scored.sort_by_key(|(distance, _)| *distance);
    scored.into_iter().take(config.max_suggestions).map(|(_, it)| it.to_string()).collect()
}

/// Distinct path segments right after `prefix`, in registration order.
fn next_segments<'a>(shapes: &'a [Shape], prefix: &[&str]) -> Vec<&'a str> {
    let mut res: Vec<&str> = Vec::new();
    for shape in shapes {
        let path = shape.path();
        if path.len() <= prefix.len() || !is_prefix(&path[..prefix.len()], prefix) {
            continue;
        }
        let next = path[prefix.len()].as_str();
        if !res.contains(&next) {
            res.push(next);
        }
    }
    res
}

fn is_prefix(path: &[String], input: &[&str]) -> bool {
    path.len() <= input.len() && path.iter().zip(input).all(|(p, i)| p == i)
}

/// How many leading tokens agree with the start of at least one path.
fn shared_depth(shapes: &[Shape], leading: &[&str]) -> usize {
    shapes
        .iter()
        .map(|shape| {
            shape.path().iter().zip(leading).take_while(|(p, i)| p.as_str() == **i).count()
        })
        .max()
        .unwrap_or(0)
}
