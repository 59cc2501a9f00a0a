use crate::{
    field::{self, Definition, Extracted, Field},
    lex::{lex, Token},
    matcher::{match_shapes, suggest, MatchConfig, MatchOutcome},
    resolve::{resolve, ResolvedMatch},
    shape::{OptionSpec, Registry, Shape, Slot},
    Error, Result,
};

/// A command path plus the fields that make up its grammar.
#[derive(Debug, Clone)]
pub struct Command {
    path: Vec<String>,
    fields: Vec<Field>,
}

impl Command {
    /// `path` is whitespace separated: `Command::new("remote add")`.
    pub fn new(path: &str) -> Command {
        let path = path.split_ascii_whitespace().map(String::from).collect();
        Command { path, fields: Vec::new() }
    }

    pub fn field(mut self, field: Field) -> Command {
        self.fields.push(field);
        self
    }

    /// Appends a field list, for option sets shared between commands.
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Command {
        self.fields.extend(fields);
        self
    }

    /// Folds the field definitions into a shape.
    pub fn shape(&self) -> Result<Shape> {
        let (options, slots) = self.definitions()?;
        Shape::new(self.path.clone(), options, slots)
    }

    /// Every field key names one value in [`Extracted`], so keys must be
    /// unique within a command.
    fn definitions(&self) -> Result<(Vec<OptionSpec>, Vec<Slot>)> {
        let mut keys: Vec<&str> = Vec::new();
        let mut options = Vec::new();
        let mut slots = Vec::new();
        for field in &self.fields {
            let key = field.field_key();
            if keys.contains(&key) {
                return Err(Error::DuplicateFieldKey { key: key.to_string() });
            }
            keys.push(key);
            match field.definition() {
                Definition::None => (),
                Definition::Option(it) => options.push(it.clone()),
                Definition::Positional(it) => slots.push(Slot::Fixed(it.clone())),
                Definition::Unbounded(it) => slots.push(Slot::Unbounded(it.clone())),
            }
        }
        Ok((options, slots))
    }
}

/// The outcome of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// Registration index of the selected command.
    pub command: usize,
    pub path: Vec<String>,
    pub values: Extracted,
}

/// Registered commands and the lex, match, resolve, extract pipeline over
/// them. Built once, then only read; it can be shared between threads.
#[derive(Debug, Default)]
pub struct Grammar {
    registry: Registry,
    fields: Vec<Vec<Field>>,
    config: MatchConfig,
}

impl Grammar {
    pub fn new() -> Grammar {
        Grammar::default()
    }

    pub fn with_config(config: MatchConfig) -> Grammar {
        Grammar { config, ..Grammar::default() }
    }

    pub fn command(&mut self, command: Command) -> Result<&mut Grammar> {
        let (options, slots) = command.definitions()?;
        self.registry.register(command.path, options, slots)?;
        self.fields.push(command.fields);
        Ok(self)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn parse<I, S>(&self, args: I) -> Result<Parsed>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (command, m) = self.resolve(args)?;
        let path = m.shape.path().to_vec();
        let values = field::extract(&self.fields[command], m)?;
        tracing::debug!(?path, fields = self.fields[command].len(), "extracted fields");
        Ok(Parsed { command, path, values })
    }

    /// Runs the pipeline up to, but not including, field extraction.
    pub fn resolve<I, S>(&self, args: I) -> Result<(usize, ResolvedMatch<'_>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = lex(args);
        let shapes = self.registry.all_shapes();
        match match_shapes(shapes, &tokens, &self.config) {
            MatchOutcome::NotFound { input, suggestions } => {
                Err(Error::CommandNotFound { input, suggestions })
            }
            MatchOutcome::Incomplete { expected } => Err(Error::CommandRequired { expected }),
            MatchOutcome::Matched { shape, consumed } => {
                let m = self.resolve_shape(shape, &tokens, consumed)?;
                Ok((shape, m))
            }
            MatchOutcome::Ambiguous { candidates, consumed } => {
                // Earliest registered shape that accepts the arguments wins,
                // otherwise the earliest one reports its error.
                let first = self.resolve_shape(candidates[0], &tokens, consumed);
                if first.is_err() {
                    for &shape in &candidates[1..] {
                        if let Ok(m) = self.resolve_shape(shape, &tokens, consumed) {
                            return Ok((shape, m));
                        }
                    }
                }
                first.map(|m| (candidates[0], m))
            }
        }
    }

    fn resolve_shape(
        &self,
        idx: usize,
        tokens: &[Token],
        consumed: usize,
    ) -> Result<ResolvedMatch<'_>> {
        let shapes = self.registry.all_shapes();
        let shape = &shapes[idx];
        tracing::debug!(path = ?shape.path(), "selected shape");
        match resolve(shape, &tokens[consumed..]) {
            Err(Error::TooManyArguments { extra }) => Err(self
                .nested_typo(shape, tokens.get(consumed), &extra)
                .unwrap_or(Error::TooManyArguments { extra })),
            res => res,
        }
    }

    /// `remote ad` against `remote add`: the shorter `remote` matched, but the
    /// stray word is really a misspelled subcommand.
    fn nested_typo(&self, shape: &Shape, next: Option<&Token>, extra: &[String]) -> Option<Error> {
        if !shape.positionals().is_empty() {
            return None;
        }
        let input = next?.literal()?;
        if extra.first().map(String::as_str) != Some(input) {
            return None;
        }
        let shapes = self.registry.all_shapes();
        let prefix: Vec<&str> = shape.path().iter().map(String::as_str).collect();
        let extended = shapes
            .iter()
            .any(|it| it.path().len() > prefix.len() && it.path().starts_with(shape.path()));
        if !extended {
            return None;
        }
        let suggestions = suggest(shapes, &prefix, input, &self.config);
        Some(Error::CommandNotFound { input: input.to_string(), suggestions })
    }
}
