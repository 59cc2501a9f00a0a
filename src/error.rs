use std::fmt;

use thiserror::Error;

/// Everything that can go wrong between registering shapes and handing typed
/// values back to the caller.
///
/// Registration errors are programming mistakes in the host; the rest are
/// meant to be shown to the end user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Option name declared more than once: `{name}`")]
    DuplicateOptionName { name: String },

    #[error("Option declared without any name")]
    EmptyOptionNames,

    #[error("Only one of `rest` or `proxy` may be declared, got a second one: `{slot}`")]
    ConflictingVariadicRole { slot: String },

    #[error("Positional declared after `{variadic}`, which must come last: `{slot}`")]
    PositionalAfterVariadic { variadic: String, slot: String },

    #[error("Field key declared more than once: `{key}`")]
    DuplicateFieldKey { key: String },

    #[error("A command is required{}. Use `help` for more information", OneOf(expected))]
    CommandRequired { expected: Vec<String> },

    #[error("Unknown command: `{input}`.{}", DidYouMean(suggestions))]
    CommandNotFound { input: String, suggestions: Vec<String> },

    #[error("expected a value for `{option}`")]
    MissingOptionValue { option: String },

    #[error("Option does not accept a bound value: `{option}`")]
    BindingNotAllowed { option: String },

    #[error("Argument is required: `{slot}`. Use `help` for more information")]
    MissingRequiredPositional { slot: String },

    #[error("Unexpected argument{}: {}", plural(extra.len()), Quoted(extra))]
    TooManyArguments { extra: Vec<String> },

    #[error("Flag is required: `{option}`. Use `help` for more information")]
    MissingRequiredOption { option: String },

    #[error("Invalid value for `{field}`: {}", messages.join("; "))]
    InvalidValue { field: String, messages: Vec<String> },
}

struct DidYouMean<'a>(&'a [String]);

impl fmt::Display for DidYouMean<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, " Did you mean {}?", Quoted(self.0))
    }
}

struct OneOf<'a>(&'a [String]);

impl fmt::Display for OneOf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, ", one of {}", Quoted(self.0))
    }
}

struct Quoted<'a>(&'a [String]);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, it) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "`{it}`")?;
        }
        Ok(())
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
