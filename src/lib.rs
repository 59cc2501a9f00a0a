//! A command line grammar engine.
//!
//! Commands are declared as lists of [`Field`]s under a literal path. Given a
//! raw argv, [`Grammar::parse`] picks the most specific command, classifies
//! every token into option occurrences and positional values, and runs each
//! field's extraction rule to produce typed values:
//!
//! ```
//! use argshape::{boolean, positional, Command, Grammar};
//!
//! let mut grammar = Grammar::new();
//! grammar.command(Command::new("add").field(boolean("-f,--force")).field(positional("pkg")))?;
//!
//! let parsed = grammar.parse(["add", "--force", "lodash"])?;
//! assert!(parsed.values.get_bool("force"));
//! assert_eq!(parsed.values.get_str("pkg"), Some("lodash"));
//! # Ok::<(), argshape::Error>(())
//! ```
//!
//! The stages are exposed separately as well: [`lex`], [`matcher`],
//! [`resolve`] and [`field::extract`]. Executing commands, help output and
//! reading the real process argv are left to the host.

mod error;
mod grammar;

pub mod field;
pub mod lex;
pub mod matcher;
pub mod resolve;
pub mod shape;
pub mod validate;

pub use crate::{
    error::Error,
    field::{
        array, boolean, counter, optional_positional, positional, proxy, rest, string, Extracted,
        Field, Value,
    },
    grammar::{Command, Grammar, Parsed},
    matcher::MatchConfig,
    validate::Validator,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;
