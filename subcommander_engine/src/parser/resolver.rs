use std::collections::HashMap;

use crate::constant::*;
use crate::model::{CountCheck, NamedValue};
use crate::parser::{Invocation, RunOptions, UsageError, UserInterface};
use crate::schema::{flag, is_help_name, CommandSchema};
use crate::tokens::tokenize;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Resolves the tokens following a command name against that command's schema.
pub(crate) struct Resolver<'s> {
    program: &'s str,
    schema: &'s CommandSchema,
}

impl<'s> Resolver<'s> {
    pub(crate) fn new(program: &'s str, schema: &'s CommandSchema) -> Self {
        Self { program, schema }
    }

    /// Resolve the command local `tokens` into an invocation.
    ///
    /// The steps run in a fixed order, each relying on the normalization done by the previous:
    /// 1. Re-tokenize with this command's valueless names.
    /// 2. Apply the positional count policy.
    /// 3. Fold aliases into their canonical names.
    /// 4. Enforce required named arguments.
    /// 5. Fill the unsupplied positional slots.
    /// 6. Apply the unexpected named argument policy.
    /// 7. Fill defaults and coerce valueless arguments.
    pub(crate) fn resolve(
        &self,
        tokens: &[&str],
        runtime: &[&str],
        options: RunOptions,
        user_interface: &(impl UserInterface + ?Sized),
    ) -> Result<Invocation, UsageError> {
        let schema = self.schema;
        let tokenized = tokenize(tokens, &schema.valueless_names());
        let mut raw = tokenized.named;

        // 2. Positional count.
        let declared = schema.positional.len();
        let supplied = tokenized.positional.len();

        if supplied > declared {
            let message = format!(
                "Too many positional arguments for '{command}': expected at most {declared}, received {supplied}.",
                command = schema.name
            );

            match schema.positional_count_check {
                CountCheck::Error => return Err(self.usage_error(message)),
                CountCheck::Warn => user_interface.print_warning(message),
                CountCheck::Ignore => {}
            }
        }

        // 3. Alias folding; the first value for a canonical name wins.
        let folding: Vec<String> = raw
            .keys()
            .filter(|key| schema.aliases.contains_key(*key))
            .cloned()
            .collect();

        for alias in folding {
            if let (Some(value), Some(canonical)) =
                (raw.shift_remove(&alias), schema.aliases.get(&alias))
            {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Folding alias '{alias}' into '{canonical}'.");
                }

                let slot = raw.entry(canonical.clone()).or_insert(None);

                if slot.is_none() {
                    *slot = value;
                }
            }
        }

        // 4. Required named arguments, reported ahead of any missing positional.
        for spec in schema
            .named
            .values()
            .filter(|spec| spec.default.is_none() && !spec.optional)
        {
            if is_unset(spec.valueless, raw.get(&spec.name)) {
                return Err(self.usage_error(format!(
                    "No value specified for required named argument '{f}'.",
                    f = flag(&spec.name)
                )));
            }
        }

        // 5. Positional fill.
        let mut positional: Vec<Option<String>> =
            tokenized.positional.into_iter().map(Some).collect();

        for spec in schema.positional.iter().skip(supplied) {
            if let Some(default) = &spec.default {
                positional.push(Some(default.clone()));
            } else if spec.optional {
                positional.push(None);
            } else {
                return Err(self.usage_error(format!(
                    "Missing required positional argument '{name}': '{command}' expects at least {minimum} positional argument(s), received {supplied}.",
                    name = spec.name.to_ascii_uppercase(),
                    command = schema.name,
                    minimum = schema.minimum_positional(),
                )));
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Resolved positional arguments: {positional:?}.");
        }

        // 6. Unexpected named arguments.
        if schema.unexpected_named_check != CountCheck::Ignore {
            let unexpected = raw.keys().filter(|key| {
                !schema.named.contains_key(*key)
                    && !schema.aliases.contains_key(*key)
                    && !is_help_name(key)
            });

            for name in unexpected {
                let message = format!(
                    "Unexpected named argument '{f}' for '{command}'.",
                    f = flag(name),
                    command = schema.name
                );

                match schema.unexpected_named_check {
                    CountCheck::Error => return Err(self.usage_error(message)),
                    CountCheck::Warn => user_interface.print_warning(message),
                    CountCheck::Ignore => {}
                }
            }
        }

        // 7. Defaults and valueless coercion, over the declared schema.
        let mut named: HashMap<String, NamedValue> = HashMap::default();

        for spec in schema.named.values() {
            let supplied = raw.shift_remove(&spec.name);
            let present = supplied.is_some();
            let unset = is_unset(spec.valueless, supplied.as_ref());
            let mut value = match supplied {
                Some(Some(v)) => Some(NamedValue::Text(v)),
                Some(None) => Some(NamedValue::Null),
                None => None,
            };

            // Required arguments are never unset here.
            if unset {
                if let Some(default) = &spec.default {
                    value.replace(NamedValue::Text(default.clone()));
                } else if !spec.valueless {
                    value = present.then_some(NamedValue::Null);
                }
            }

            if spec.valueless {
                let flagged = matches!(value, Some(NamedValue::Null));
                value = Some(NamedValue::Flag(flagged));
            }

            if let Some(value) = value {
                named.insert(spec.name.clone(), value);
            }
        }

        // Anything left is undeclared (tolerated by policy) or a help request.
        for (name, value) in raw.into_iter() {
            let value = match value {
                Some(v) => NamedValue::Text(v),
                None => NamedValue::Null,
            };
            named.insert(name, value);
        }

        Ok(Invocation {
            command: schema.name.clone(),
            positional,
            named,
            unparsed: tokens.iter().map(|t| t.to_string()).collect(),
            runtime: runtime.iter().map(|t| t.to_string()).collect(),
            options,
        })
    }

    fn usage_error(&self, message: String) -> UsageError {
        UsageError::new(message).with_usage(format!(
            "Run '{program} {HELP_COMMAND} {command}' for usage instructions.",
            program = self.program,
            command = self.schema.name
        ))
    }
}

// A valueless argument is unset only when absent; otherwise a missing or blank value is unset.
fn is_unset(valueless: bool, supplied: Option<&Option<String>>) -> bool {
    match supplied {
        None => true,
        Some(_) if valueless => false,
        Some(None) => true,
        Some(Some(value)) => value.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::util::channel_interface;
    use crate::schema::{CommandDeclaration, ParameterClass, ParameterDeclaration};
    use crate::test::assert_contains;
    use rstest::rstest;

    fn named(name: &str) -> ParameterDeclaration {
        ParameterDeclaration::new(ParameterClass::Named, name)
    }

    fn positional(name: &str) -> ParameterDeclaration {
        ParameterDeclaration::new(ParameterClass::Positional, name)
    }

    fn schema(parameters: Vec<ParameterDeclaration>) -> CommandSchema {
        schema_with(parameters, |_| {})
    }

    fn schema_with(
        parameters: Vec<ParameterDeclaration>,
        setup: impl FnOnce(&mut CommandDeclaration),
    ) -> CommandSchema {
        let mut declaration = CommandDeclaration {
            parameters,
            ..CommandDeclaration::new("cmd1")
        };
        setup(&mut declaration);
        CommandSchema::build(declaration).unwrap()
    }

    fn resolve(schema: &CommandSchema, tokens: &[&str]) -> Result<Invocation, UsageError> {
        let (sender, receiver) = channel_interface();
        let result = Resolver::new("program", schema).resolve(
            tokens,
            &["program"],
            RunOptions::default(),
            &sender,
        );
        drop(sender);
        let (message, warning, error) = receiver.consume();
        assert_eq!(message, None);
        assert_eq!(warning, None);
        assert_eq!(error, None);
        result
    }

    fn text(value: &str) -> NamedValue {
        NamedValue::Text(value.to_string())
    }

    #[test]
    fn resolve_empty() {
        // Execute
        let invocation = resolve(&schema(vec![]), &[]).unwrap();

        // Verify
        assert_eq!(invocation.command_name(), "cmd1");
        assert!(invocation.positional().is_empty());
        assert!(invocation.named().is_empty());
        assert!(invocation.unparsed().is_empty());
        assert_eq!(invocation.runtime(), &["program".to_string()]);
    }

    #[test]
    fn resolve_required() {
        // Setup
        let schema = schema(vec![named("required"), positional("target")]);

        // Execute
        let invocation = resolve(&schema, &["--required", "x", "t1"]).unwrap();

        // Verify
        assert_eq!(invocation.value("required"), Some("x"));
        assert_eq!(invocation.positional_value(0), Some("t1"));
        assert_eq!(
            invocation.unparsed(),
            &["--required".to_string(), "x".to_string(), "t1".to_string()]
        );
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec!["t1"])]
    #[case(vec!["--required=", "t1"])]
    #[case(vec!["t1", "--required"])]
    fn resolve_required_missing(#[case] tokens: Vec<&str>) {
        // Setup
        let schema = schema(vec![named("required"), positional("target")]);

        // Execute
        let error = resolve(&schema, tokens.as_slice()).unwrap_err();

        // Verify
        assert_contains!(error.message(), "required named argument '--required'");
        assert_eq!(
            error.usage(),
            Some("Run 'program help cmd1' for usage instructions.")
        );
    }

    #[test]
    fn resolve_required_named_before_positional() {
        // Setup
        let schema = schema(vec![named("required"), positional("target")]);

        // Execute
        let error = resolve(&schema, &[]).unwrap_err();

        // Verify
        assert_eq!(
            error.message(),
            "No value specified for required named argument '--required'."
        );
    }

    #[rstest]
    #[case(vec!["--r", "x"])]
    #[case(vec!["--required", "--r", "x"])]
    fn resolve_required_through_alias(#[case] tokens: Vec<&str>) {
        // Setup
        let mut required = named("required");
        required.aliases.push("r".to_string());
        let schema = schema(vec![required, positional("target")]);

        // Execute
        let error = resolve(&schema, tokens.as_slice()).unwrap_err();

        // Verify
        assert_contains!(error.message(), "Missing required positional argument 'TARGET'");
    }

    #[test]
    fn resolve_positional_missing() {
        // Setup
        let mut extra = positional("extra");
        extra.optional = true;
        let schema = schema(vec![positional("source"), positional("target"), extra]);

        // Execute
        let error = resolve(&schema, &["s"]).unwrap_err();

        // Verify
        assert_contains!(error.message(), "Missing required positional argument 'TARGET'");
        assert_contains!(error.message(), "at least 2 positional argument(s), received 1");
    }

    #[test]
    fn resolve_positional_fill() {
        // Setup
        let mut extra = positional("extra");
        extra.optional = true;
        let mut mode = positional("mode");
        mode.default = Some("fast".to_string());
        let schema = schema(vec![positional("source"), extra, mode]);

        // Execute
        let invocation = resolve(&schema, &["s"]).unwrap();

        // Verify
        assert_eq!(
            invocation.positional(),
            &[Some("s".to_string()), None, Some("fast".to_string())]
        );
    }

    #[test]
    fn resolve_positional_excess_ignored() {
        // Execute
        let invocation = resolve(&schema(vec![positional("source")]), &["a", "b", "c"]).unwrap();

        // Verify
        assert_eq!(
            invocation.positional(),
            &[
                Some("a".to_string()),
                Some("b".to_string()),
                Some("c".to_string())
            ]
        );
    }

    #[test]
    fn resolve_positional_excess_error() {
        // Setup
        let schema = schema_with(vec![positional("source")], |d| {
            d.positional_count_check = Some(CountCheck::Error)
        });

        // Execute
        let error = resolve(&schema, &["a", "b"]).unwrap_err();

        // Verify
        assert_contains!(error.message(), "Too many positional arguments");
        assert_contains!(error.message(), "expected at most 1, received 2");
    }

    #[test]
    fn resolve_positional_excess_warn() {
        // Setup
        let schema = schema_with(vec![positional("source")], |d| {
            d.positional_count_check = Some(CountCheck::Warn)
        });
        let (sender, receiver) = channel_interface();

        // Execute
        let invocation = Resolver::new("program", &schema)
            .resolve(&["a", "b"], &["program"], RunOptions::default(), &sender)
            .unwrap();
        drop(sender);

        // Verify
        assert_eq!(invocation.positional().len(), 2);
        let (message, warning, error) = receiver.consume();
        assert_eq!(message, None);
        let warning = warning.unwrap();
        assert_contains!(warning, "Too many positional arguments");
        assert_eq!(error, None);
    }

    #[rstest]
    #[case(vec!["--alias1", "v"])]
    #[case(vec!["--namedarg1", "v"])]
    #[case(vec!["--alias1=v"])]
    fn resolve_alias_equivalence(#[case] tokens: Vec<&str>) {
        // Setup
        let schema = schema_with(vec![named("namedarg1")], |d| {
            d.named_aliases
                .push(("alias1".to_string(), "namedarg1".to_string()))
        });

        // Execute
        let invocation = resolve(&schema, tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(
            invocation.named(),
            &HashMap::from([("namedarg1".to_string(), text("v"))])
        );
    }

    #[rstest]
    #[case(vec!["--namedarg1", "first", "--alias1", "second"], "first")]
    #[case(vec!["--alias1", "first", "--namedarg1", "second"], "second")]
    #[case(vec!["--alias1", "first", "--other", "second"], "first")]
    #[case(vec!["--namedarg1", "--alias1", "second"], "second")]
    fn resolve_alias_does_not_clobber(#[case] tokens: Vec<&str>, #[case] expected: &str) {
        // Setup
        let mut namedarg1 = named("namedarg1");
        namedarg1.aliases = vec!["alias1".to_string(), "other".to_string()];
        let schema = schema(vec![namedarg1]);

        // Execute
        let invocation = resolve(&schema, tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(invocation.value("namedarg1"), Some(expected));
        assert_eq!(invocation.named().len(), 1);
    }

    #[test]
    fn resolve_unexpected_error() {
        // Execute
        let error = resolve(&schema(vec![]), &["--bogus", "-x"]).unwrap_err();

        // Verify
        assert_contains!(error.message(), "Unexpected named argument '--bogus'");
    }

    #[test]
    fn resolve_unexpected_warn() {
        // Setup
        let schema = schema_with(vec![], |d| {
            d.unexpected_named_check = Some(CountCheck::Warn)
        });
        let (sender, receiver) = channel_interface();

        // Execute
        let invocation = Resolver::new("program", &schema)
            .resolve(&["--bogus", "v", "-x"], &["program"], RunOptions::default(), &sender)
            .unwrap();
        drop(sender);

        // Verify
        assert_eq!(invocation.value("bogus"), Some("v"));
        assert_eq!(invocation.named_value("x"), Some(&NamedValue::Null));
        let (_, warning, _) = receiver.consume();
        let warning = warning.unwrap();
        assert_contains!(warning, "'--bogus'");
        assert_contains!(warning, "'-x'");
    }

    #[test]
    fn resolve_unexpected_ignore() {
        let schema = schema_with(vec![], |d| {
            d.unexpected_named_check = Some(CountCheck::Ignore)
        });
        let invocation = resolve(&schema, &["--bogus"]).unwrap();
        assert_eq!(invocation.named_value("bogus"), Some(&NamedValue::Null));
    }

    #[rstest]
    #[case(vec!["--help"])]
    #[case(vec!["--?"])]
    fn resolve_help_is_not_unexpected(#[case] tokens: Vec<&str>) {
        let invocation = resolve(&schema(vec![]), tokens.as_slice()).unwrap();
        assert_eq!(invocation.named().len(), 1);
    }

    #[rstest]
    #[case(vec![], Some(text("3")))]
    #[case(vec!["--level", "5"], Some(text("5")))]
    #[case(vec!["--level="], Some(text("3")))]
    #[case(vec!["--level"], Some(text("3")))]
    fn resolve_default(#[case] tokens: Vec<&str>, #[case] expected: Option<NamedValue>) {
        // Setup
        let mut level = named("level");
        level.default = Some("3".to_string());

        // Execute
        let invocation = resolve(&schema(vec![level]), tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(invocation.named_value("level").cloned(), expected);
    }

    #[rstest]
    #[case(vec![], None)]
    #[case(vec!["--name"], Some(NamedValue::Null))]
    #[case(vec!["--name="], Some(NamedValue::Null))]
    #[case(vec!["--name", "x"], Some(text("x")))]
    fn resolve_optional(#[case] tokens: Vec<&str>, #[case] expected: Option<NamedValue>) {
        // Setup
        let mut name = named("name");
        name.optional = true;

        // Execute
        let invocation = resolve(&schema(vec![name]), tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(invocation.named_value("name").cloned(), expected);
    }

    #[rstest]
    #[case(vec![], false)]
    #[case(vec!["--verbose"], true)]
    #[case(vec!["-v"], true)]
    #[case(vec!["--verbose=yes"], false)]
    #[case(vec!["-qv"], true)]
    fn resolve_valueless(#[case] tokens: Vec<&str>, #[case] expected: bool) {
        // Setup
        let mut verbose = named("verbose");
        verbose.valueless = true;
        verbose.optional = true;
        verbose.aliases.push("v".to_string());
        let mut quiet = named("quiet");
        quiet.valueless = true;
        quiet.optional = true;
        quiet.aliases.push("q".to_string());

        // Execute
        let invocation = resolve(&schema(vec![verbose, quiet]), tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(
            invocation.named_value("verbose"),
            Some(&NamedValue::Flag(expected))
        );
    }

    #[test]
    fn resolve_valueless_does_not_consume() {
        // Setup
        let mut verbose = named("verbose");
        verbose.valueless = true;
        verbose.optional = true;
        let schema = schema(vec![verbose, positional("target")]);

        // Execute
        let invocation = resolve(&schema, &["--verbose", "t1"]).unwrap();

        // Verify
        assert!(invocation.flag("verbose"));
        assert_eq!(invocation.positional_value(0), Some("t1"));
    }

    #[test]
    fn resolve_valueless_required() {
        // Setup
        let mut force = named("force");
        force.valueless = true;
        let schema = schema(vec![force]);

        // Execute & Verify
        assert!(resolve(&schema, &["--force"]).unwrap().flag("force"));
        let error = resolve(&schema, &[]).unwrap_err();
        assert_contains!(error.message(), "required named argument '--force'");
    }

    #[test]
    fn resolve_valueless_default() {
        let mut force = named("force");
        force.valueless = true;
        force.default = Some("yes".to_string());
        let invocation = resolve(&schema(vec![force]), &[]).unwrap();
        assert_eq!(invocation.named_value("force"), Some(&NamedValue::Flag(false)));
    }
}
