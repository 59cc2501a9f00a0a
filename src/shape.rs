//! Declared command grammars and the registry that holds them.

use crate::{Error, Result};

/// A named option: `-f, --force` with arity 0, `--out <file>` with arity 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub names: Vec<String>,
    /// Number of tokens consumed as the option's value(s). Zero is a switch.
    pub arity: usize,
    /// Whether `--name=value` is accepted.
    pub allow_binding: bool,
}

impl OptionSpec {
    /// `names` is a comma separated alias list, as in `"-f,--force"`.
    pub fn new(names: &str, arity: usize) -> OptionSpec {
        let names = names
            .split(',')
            .map(str::trim)
            .filter(|it| !it.is_empty())
            .map(String::from)
            .collect();
        OptionSpec { names, arity, allow_binding: arity > 0 }
    }

    pub fn allow_binding(mut self, yes: bool) -> OptionSpec {
        self.allow_binding = yes;
        self
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|it| it == name)
    }

    /// The name used in messages: the longest alias, `--force` over `-f`.
    pub fn display_name(&self) -> &str {
        self.names.iter().max_by_key(|it| it.len()).map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalSpec {
    pub name: String,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnboundedRole {
    /// Collects leftover positional values.
    Rest,
    /// Collects every remaining argv element verbatim once the fixed slots
    /// are filled, options included.
    Proxy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundedSpec {
    pub name: String,
    pub role: UnboundedRole,
}

/// Positional layout entry as declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Fixed(PositionalSpec),
    Unbounded(UnboundedSpec),
}

/// One registered command. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    path: Vec<String>,
    options: Vec<OptionSpec>,
    positionals: Vec<PositionalSpec>,
    unbounded: Option<UnboundedSpec>,
}

impl Shape {
    pub fn new(path: Vec<String>, options: Vec<OptionSpec>, slots: Vec<Slot>) -> Result<Shape> {
        let mut seen: Vec<&str> = Vec::new();
        for option in &options {
            if option.names.is_empty() {
                return Err(Error::EmptyOptionNames);
            }
            for name in &option.names {
                if seen.contains(&name.as_str()) {
                    return Err(Error::DuplicateOptionName { name: name.clone() });
                }
                seen.push(name);
            }
        }

        let mut positionals = Vec::new();
        let mut unbounded: Option<UnboundedSpec> = None;
        for slot in slots {
            match slot {
                Slot::Fixed(it) => {
                    if let Some(variadic) = &unbounded {
                        return Err(Error::PositionalAfterVariadic {
                            variadic: variadic.name.clone(),
                            slot: it.name,
                        });
                    }
                    positionals.push(it)
                }
                Slot::Unbounded(it) => {
                    if unbounded.is_some() {
                        return Err(Error::ConflictingVariadicRole { slot: it.name });
                    }
                    unbounded = Some(it);
                }
            }
        }

        Ok(Shape { path, options, positionals, unbounded })
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// Fixed slots in declaration order.
    pub fn positionals(&self) -> &[PositionalSpec] {
        &self.positionals
    }

    pub fn unbounded(&self) -> Option<&UnboundedSpec> {
        self.unbounded.as_ref()
    }

    pub fn has_proxy(&self) -> bool {
        matches!(&self.unbounded, Some(it) if it.role == UnboundedRole::Proxy)
    }

    /// Finds the option an option-like token refers to, along with the alias
    /// that matched. The flag is `true` for a `--no-X` spelling of a declared
    /// switch `-X` or `--X`; the alias is then the positive one.
    pub fn lookup(&self, name: &str) -> Option<(&OptionSpec, &str, bool)> {
        if let Some((spec, alias)) = self.find(name) {
            return Some((spec, alias, false));
        }
        let negated = name.strip_prefix("--no-")?;
        let mut candidates = vec![format!("--{negated}")];
        if negated.chars().count() == 1 {
            candidates.insert(0, format!("-{negated}"));
        }
        candidates
            .iter()
            .filter_map(|it| self.find(it))
            .find(|(spec, _)| spec.arity == 0)
            .map(|(spec, alias)| (spec, alias, true))
    }

    fn find(&self, name: &str) -> Option<(&OptionSpec, &str)> {
        self.options.iter().find_map(|spec| {
            spec.names.iter().find(|it| *it == name).map(|it| (spec, it.as_str()))
        })
    }
}

/// Every registered shape, in registration order.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    shapes: Vec<Shape>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Returns the index of the new shape, which doubles as its registration
    /// rank when breaking ties.
    pub fn register(
        &mut self,
        path: Vec<String>,
        options: Vec<OptionSpec>,
        slots: Vec<Slot>,
    ) -> Result<usize> {
        let shape = Shape::new(path, options, slots)?;
        tracing::debug!(path = ?shape.path, "registered shape");
        self.shapes.push(shape);
        Ok(self.shapes.len() - 1)
    }

    pub fn all_shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn get(&self, idx: usize) -> Option<&Shape> {
        self.shapes.get(idx)
    }
}
