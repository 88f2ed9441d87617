use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

use crate::constant::*;
use crate::model::CountCheck;
use crate::parser::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParameterClass {
    Named,
    Positional,
}

/// A parameter as the integrator wrote it, before any defaults are filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParameterDeclaration {
    pub(crate) class: ParameterClass,
    pub(crate) name: String,
    pub(crate) help: Option<String>,
    pub(crate) optional: bool,
    pub(crate) valueless: bool,
    pub(crate) default: Option<String>,
    pub(crate) aliases: Vec<String>,
}

impl ParameterDeclaration {
    pub(crate) fn new(class: ParameterClass, name: impl Into<String>) -> Self {
        Self {
            class,
            name: name.into(),
            help: None,
            optional: false,
            valueless: false,
            default: None,
            aliases: Vec::default(),
        }
    }
}

/// A command as the integrator wrote it, before any defaults are filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandDeclaration {
    pub(crate) name: String,
    pub(crate) about: Option<String>,
    pub(crate) parameters: Vec<ParameterDeclaration>,
    // (alias, target named parameter)
    pub(crate) named_aliases: Vec<(String, String)>,
    pub(crate) positional_count_check: Option<CountCheck>,
    pub(crate) unexpected_named_check: Option<CountCheck>,
    pub(crate) allow_help_named: Option<bool>,
    pub(crate) is_default: bool,
}

impl CommandDeclaration {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            parameters: Vec::default(),
            named_aliases: Vec::default(),
            positional_count_check: None,
            unexpected_named_check: None,
            allow_help_named: None,
            is_default: false,
        }
    }

    /// The declaration of the built-in `help` command.
    pub(crate) fn help() -> Self {
        let mut target = ParameterDeclaration::new(ParameterClass::Positional, HELP_TARGET);
        target.help = Some("The command to describe.".to_string());
        target.optional = true;

        Self {
            about: Some(HELP_MESSAGE.to_string()),
            parameters: vec![target],
            positional_count_check: Some(CountCheck::Ignore),
            unexpected_named_check: Some(CountCheck::Ignore),
            allow_help_named: Some(false),
            ..Self::new(HELP_COMMAND)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NamedSpec {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) optional: bool,
    pub(crate) valueless: bool,
    pub(crate) default: Option<String>,
    pub(crate) aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PositionalSpec {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) optional: bool,
    pub(crate) default: Option<String>,
}

/// The normalized, fully defaulted description of a command.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandSchema {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) named: IndexMap<String, NamedSpec>,
    pub(crate) aliases: HashMap<String, String>,
    pub(crate) positional: Vec<PositionalSpec>,
    pub(crate) positional_count_check: CountCheck,
    pub(crate) unexpected_named_check: CountCheck,
    pub(crate) allow_help_named: bool,
    pub(crate) is_default: bool,
}

impl CommandSchema {
    pub(crate) fn build(declaration: CommandDeclaration) -> Result<Self, ConfigError> {
        let CommandDeclaration {
            name: command,
            about,
            parameters,
            named_aliases,
            positional_count_check,
            unexpected_named_check,
            allow_help_named,
            is_default,
        } = declaration;
        let mut named: IndexMap<String, NamedSpec> = IndexMap::default();
        let mut positional: Vec<PositionalSpec> = Vec::default();
        let mut first_optional: Option<String> = None;

        for parameter in parameters.into_iter() {
            let ParameterDeclaration {
                class,
                name,
                help,
                optional,
                valueless,
                default,
                aliases,
            } = parameter;
            let description = help.unwrap_or_else(|| NO_DESCRIPTION.to_string());

            match class {
                ParameterClass::Named => {
                    let mut unique_aliases: Vec<String> = Vec::default();

                    for alias in aliases {
                        if !unique_aliases.contains(&alias) {
                            unique_aliases.push(alias);
                        }
                    }

                    let spec = NamedSpec {
                        name: name.clone(),
                        description,
                        optional: optional || default.is_some(),
                        valueless,
                        default,
                        aliases: unique_aliases,
                    };

                    if named.insert(name.clone(), spec).is_some() {
                        return Err(ConfigError(format!(
                            "command '{command}' cannot duplicate the named parameter '{name}'."
                        )));
                    }
                }
                ParameterClass::Positional => {
                    if valueless {
                        return Err(ConfigError(format!(
                            "command '{command}' positional parameter '{name}' cannot be valueless."
                        )));
                    }

                    if !aliases.is_empty() {
                        return Err(ConfigError(format!(
                            "command '{command}' positional parameter '{name}' cannot have aliases."
                        )));
                    }

                    if optional && default.is_some() {
                        return Err(ConfigError(format!(
                            "command '{command}' positional parameter '{name}' is redundantly declared both optional and with a default."
                        )));
                    }

                    if positional.iter().any(|p| p.name == name) {
                        return Err(ConfigError(format!(
                            "command '{command}' cannot duplicate the positional parameter '{name}'."
                        )));
                    }

                    let optional = optional || default.is_some();

                    if optional {
                        first_optional.get_or_insert_with(|| name.clone());
                    } else if let Some(prior) = &first_optional {
                        return Err(ConfigError(format!(
                            "command '{command}' required positional parameter '{name}' cannot follow the optional positional parameter '{prior}'."
                        )));
                    }

                    positional.push(PositionalSpec {
                        name,
                        description,
                        optional,
                        default,
                    });
                }
            }
        }

        for (alias, target) in named_aliases.into_iter() {
            match named.get_mut(&target) {
                Some(spec) => {
                    if !spec.aliases.contains(&alias) {
                        spec.aliases.push(alias);
                    }
                }
                None => {
                    return Err(ConfigError(format!(
                        "command '{command}' alias '{alias}' refers to the unknown named parameter '{target}'."
                    )));
                }
            }
        }

        let mut aliases: HashMap<String, String> = HashMap::default();

        for spec in named.values() {
            for alias in &spec.aliases {
                if named.contains_key(alias) {
                    return Err(ConfigError(format!(
                        "command '{command}' alias '{alias}' collides with the named parameter '{alias}'."
                    )));
                }

                if let Some(existing) = aliases.insert(alias.clone(), spec.name.clone()) {
                    return Err(ConfigError(format!(
                        "command '{command}' alias '{alias}' cannot refer to both '{existing}' and '{}'.",
                        spec.name
                    )));
                }
            }
        }

        let allow_help_named = allow_help_named.unwrap_or(true);

        if allow_help_named {
            if let Some(reserved) = named
                .keys()
                .chain(aliases.keys())
                .find(|name| is_help_name(name))
            {
                return Err(ConfigError(format!(
                    "command '{command}' cannot declare the reserved named parameter '{reserved}' while the help override is allowed."
                )));
            }
        }

        Ok(Self {
            name: command,
            description: about.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            named,
            aliases,
            positional,
            positional_count_check: positional_count_check.unwrap_or(CountCheck::Ignore),
            unexpected_named_check: unexpected_named_check.unwrap_or(CountCheck::Error),
            allow_help_named,
            is_default,
        })
    }

    /// The canonical names and aliases of every valueless named parameter.
    pub(crate) fn valueless_names(&self) -> HashSet<String> {
        self.named
            .values()
            .filter(|spec| spec.valueless)
            .flat_map(|spec| std::iter::once(&spec.name).chain(spec.aliases.iter()))
            .cloned()
            .collect()
    }

    /// The number of positional values which must be supplied.
    pub(crate) fn minimum_positional(&self) -> usize {
        self.positional.iter().filter(|p| !p.optional).count()
    }
}

pub(crate) fn is_help_name(name: &str) -> bool {
    name == HELP_NAME || name == HELP_ALTERNATE
}

/// Render a named parameter as it would be typed on the Cli.
pub(crate) fn flag(name: &str) -> String {
    if name.chars().count() == 1 && name != HELP_ALTERNATE {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}
