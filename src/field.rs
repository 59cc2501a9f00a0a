//! Fields: typed values read out of a [`ResolvedMatch`].
//!
//! A field is a plain record pairing a *definition* (the option or slot it
//! adds to a shape) with an *extraction rule* (how resolved state becomes a
//! [`Value`]). Commands are described as lists of fields; shared option sets
//! are just field lists reused in several commands.
//!
//! Extraction runs fields in declaration order against one shared
//! `ResolvedMatch`, and positional fields pop their slot off it. That makes
//! declaration order significant: positional fields must be declared in the
//! order their values appear on the command line.

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    resolve::{OptionValue, ResolvedMatch, SlotCategory},
    shape::{OptionSpec, PositionalSpec, UnboundedRole, UnboundedSpec},
    validate::{self, Validator},
    Error, Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Absent,
    Bool(bool),
    Counter(u32),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl Value {
    /// The string payload, one entry per string.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Value::Str(it) => vec![it.as_str()],
            Value::List(items) => items.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// What a field contributes to its command's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    None,
    Option(OptionSpec),
    Positional(PositionalSpec),
    Unbounded(UnboundedSpec),
}

pub type Extraction = Arc<dyn Fn(&mut ResolvedMatch<'_>) -> Result<Value> + Send + Sync>;

#[derive(Clone)]
enum Rule {
    Boolean,
    Counter,
    String { required: bool },
    Array,
    Positional,
    OptionalPositional,
    Unbounded,
    Custom(Extraction),
}

#[derive(Clone)]
pub struct Field {
    key: String,
    definition: Definition,
    rule: Rule,
    validator: Option<Arc<dyn Validator>>,
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("definition", &self.definition)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

/// A switch. Last occurrence wins, `--no-X` turns it off. Defaults to false.
pub fn boolean(names: &str) -> Field {
    Field::option(names, 0, Rule::Boolean)
}

/// Counts occurrences; `--no-X` resets the count to zero.
pub fn counter(names: &str) -> Field {
    Field::option(names, 0, Rule::Counter)
}

/// An option taking a value. Last occurrence wins, absent when not given.
pub fn string(names: &str) -> Field {
    Field::option(names, 1, Rule::String { required: false })
}

/// An option that may be repeated; values are kept in argv order.
pub fn array(names: &str) -> Field {
    Field::option(names, 1, Rule::Array)
}

pub fn positional(key: &str) -> Field {
    let spec = PositionalSpec { name: key.to_string(), required: true };
    Field::new(key, Definition::Positional(spec), Rule::Positional)
}

pub fn optional_positional(key: &str) -> Field {
    let spec = PositionalSpec { name: key.to_string(), required: false };
    Field::new(key, Definition::Positional(spec), Rule::OptionalPositional)
}

/// Leftover positional values.
pub fn rest(key: &str) -> Field {
    let spec = UnboundedSpec { name: key.to_string(), role: UnboundedRole::Rest };
    Field::new(key, Definition::Unbounded(spec), Rule::Unbounded)
}

/// Everything after the fixed positionals, verbatim.
pub fn proxy(key: &str) -> Field {
    let spec = UnboundedSpec { name: key.to_string(), role: UnboundedRole::Proxy };
    Field::new(key, Definition::Unbounded(spec), Rule::Unbounded)
}

impl Field {
    fn new(key: &str, definition: Definition, rule: Rule) -> Field {
        Field { key: key.to_string(), definition, rule, validator: None }
    }

    fn option(names: &str, arity: usize, rule: Rule) -> Field {
        let spec = OptionSpec::new(names, arity);
        let key = spec.display_name().trim_start_matches('-').to_string();
        Field { key, definition: Definition::Option(spec), rule, validator: None }
    }

    /// A field with a hand written extraction rule.
    pub fn custom<F>(key: &str, definition: Definition, extract: F) -> Field
    where
        F: Fn(&mut ResolvedMatch<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        Field::new(key, definition, Rule::Custom(Arc::new(extract)))
    }

    pub fn key(mut self, key: &str) -> Field {
        self.key = key.to_string();
        self
    }

    /// Number of values per occurrence for `string` and `array` options.
    /// Has no effect on other fields.
    pub fn arity(mut self, arity: usize) -> Field {
        if let (Rule::String { .. } | Rule::Array, Definition::Option(spec)) =
            (&self.rule, &mut self.definition)
        {
            spec.arity = arity.max(1);
        }
        self
    }

    /// Makes a `string` option mandatory.
    pub fn required(mut self) -> Field {
        if let Rule::String { required } = &mut self.rule {
            *required = true;
        }
        self
    }

    /// Rejects the `--name=value` spelling.
    pub fn no_binding(mut self) -> Field {
        if let Definition::Option(spec) = &mut self.definition {
            spec.allow_binding = false;
        }
        self
    }

    pub fn validate(mut self, validator: impl Validator + 'static) -> Field {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn field_key(&self) -> &str {
        &self.key
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    fn names(&self) -> &[String] {
        match &self.definition {
            Definition::Option(spec) => &spec.names,
            _ => &[],
        }
    }

    pub fn extract(&self, m: &mut ResolvedMatch<'_>) -> Result<Value> {
        let value = match &self.rule {
            Rule::Boolean => {
                let last = m.occurrences(self.names()).filter_map(flag).last();
                Value::Bool(last.unwrap_or(false))
            }
            Rule::Counter => {
                let count =
                    m.occurrences(self.names()).filter_map(flag).fold(0u32, |count, on| {
                        if on {
                            count.saturating_add(1)
                        } else {
                            0
                        }
                    });
                Value::Counter(count)
            }
            Rule::String { required } => {
                match m.occurrences(self.names()).filter_map(values).last() {
                    Some([it]) => Value::Str(it.clone()),
                    Some(it) => Value::List(it.to_vec()),
                    None if *required => {
                        return Err(Error::MissingRequiredOption { option: self.display_name() })
                    }
                    None => Value::Absent,
                }
            }
            Rule::Array => {
                let items = m.occurrences(self.names()).filter_map(values).flatten().cloned();
                Value::List(items.collect())
            }
            Rule::Positional => match m.pop_positional(SlotCategory::Required) {
                Some(it) => Value::Str(it),
                None => return Err(Error::MissingRequiredPositional { slot: self.key.clone() }),
            },
            Rule::OptionalPositional => match m.pop_positional(SlotCategory::Optional) {
                Some(it) => Value::Str(it),
                None => Value::Absent,
            },
            Rule::Unbounded => Value::List(m.take_unbounded()),
            Rule::Custom(extract) => extract(m)?,
        };
        match &self.validator {
            Some(validator) => validate::check(&**validator, &self.key, value),
            None => Ok(value),
        }
    }

    fn display_name(&self) -> String {
        match &self.definition {
            Definition::Option(spec) => spec.display_name().to_string(),
            _ => self.key.clone(),
        }
    }
}

fn flag(occurrence: &crate::resolve::Occurrence) -> Option<bool> {
    match occurrence.value {
        OptionValue::Flag(it) => Some(it),
        OptionValue::Values(_) => None,
    }
}

fn values(occurrence: &crate::resolve::Occurrence) -> Option<&[String]> {
    match &occurrence.value {
        OptionValue::Values(it) => Some(it.as_slice()),
        OptionValue::Flag(_) => None,
    }
}

/// Field values by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    values: BTreeMap<String, Value>,
}

impl Extracted {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Value::Str(it)) => Some(it.as_str()),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Bool(true)))
    }

    pub fn get_count(&self, key: &str) -> u32 {
        match self.get(key) {
            Some(Value::Counter(it)) => *it,
            _ => 0,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(Value::Int(it)) => Some(*it),
            _ => None,
        }
    }

    pub fn get_list(&self, key: &str) -> &[String] {
        match self.get(key) {
            Some(Value::List(it)) => it,
            _ => &[],
        }
    }

    pub fn into_map(self) -> BTreeMap<String, Value> {
        self.values
    }
}

/// Runs `fields` in order against `m`. Either every field produces a value
/// or the first failure is returned and nothing else.
pub fn extract(fields: &[Field], mut m: ResolvedMatch<'_>) -> Result<Extracted> {
    let mut values = BTreeMap::new();
    for field in fields {
        let value = field.extract(&mut m)?;
        values.insert(field.key.clone(), value);
    }
    Ok(Extracted { values })
}
