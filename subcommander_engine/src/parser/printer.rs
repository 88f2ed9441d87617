use terminal_size::{terminal_size, Width};

use crate::constant::*;
use crate::parser::interface::UserInterface;
use crate::parser::{ColumnRenderer, LeftWidth, MiddleWidth, PaddingWidth, TotalWidth};
use crate::schema::{flag, CommandSchema};

/// A row of the application help's command table.
pub(crate) struct CommandRow<'s> {
    pub(crate) schema: &'s CommandSchema,
    pub(crate) aliases: Vec<&'s str>,
}

/// Renders usage information from the command schemas.
pub(crate) struct Printer {
    terminal_width: Option<usize>,
}

// Used when the output is not a terminal.
const FALLBACK_TOTAL_WIDTH: usize = 80;
const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;

impl Printer {
    pub(crate) fn terminal() -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(terminal_width)
    }

    pub(crate) fn new(terminal_width: Option<usize>) -> Self {
        Self { terminal_width }
    }

    pub(crate) fn print_application(
        &self,
        program: &str,
        about: Option<&str>,
        mut commands: Vec<CommandRow>,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        commands.sort_by(|a, b| a.schema.name.cmp(&b.schema.name));
        let rows: Vec<(String, String)> = commands
            .iter()
            .map(|CommandRow { schema, aliases }| {
                let mut names = vec![schema.name.as_str()];
                let mut aliases = aliases.clone();
                aliases.sort();
                names.extend(aliases);
                (names.join(", "), schema.description.clone())
            })
            .collect();
        let column_renderer = self.renderer(&[&rows]);

        user_interface.print(format!("usage: {program} <command> [...]"));

        if let Some(about) = about {
            user_interface.print("".to_string());
            user_interface.print(about.to_string());
        }

        user_interface.print("".to_string());
        user_interface.print("commands:".to_string());

        for (left, middle) in &rows {
            for line in column_renderer.render(MAIN_INDENT, left, middle) {
                user_interface.print(line);
            }
        }

        user_interface.print("".to_string());
        user_interface.print(format!(
            "Run '{program} {HELP_COMMAND} <command>' for usage instructions of a command."
        ));
    }

    pub(crate) fn print_command(
        &self,
        program: &str,
        schema: &CommandSchema,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        let mut summary = vec![format!("usage: {program} {}", schema.name)];
        let mut positional_rows: Vec<(String, String)> = Vec::default();
        let mut named_rows: Vec<(String, String)> = Vec::default();

        let mut named: Vec<_> = schema.named.values().collect();
        named.sort_by(|a, b| a.name.cmp(&b.name));

        for spec in named {
            let grammar = if spec.valueless {
                "".to_string()
            } else {
                format!(" {}", metavariable(&spec.name))
            };

            if spec.optional {
                summary.push(format!("[{}{grammar}]", flag(&spec.name)));
            } else {
                summary.push(format!("{}{grammar}", flag(&spec.name)));
            }

            let flags: Vec<String> = std::iter::once(&spec.name)
                .chain(spec.aliases.iter())
                .map(|name| format!("{}{grammar}", flag(name)))
                .collect();
            let description = match &spec.default {
                Some(default) => format!("{} (default: {default})", spec.description),
                None => spec.description.clone(),
            };
            named_rows.push((flags.join(", "), description));
        }

        if schema.allow_help_named {
            named_rows.push((
                format!("{}, {}", flag(HELP_NAME), flag(HELP_ALTERNATE)),
                "Show this usage information.".to_string(),
            ));
        }

        for spec in &schema.positional {
            let grammar = if spec.optional {
                format!("[{}]", metavariable(&spec.name))
            } else {
                metavariable(&spec.name)
            };
            summary.push(grammar.clone());
            let description = match &spec.default {
                Some(default) => format!("{} (default: {default})", spec.description),
                None => spec.description.clone(),
            };
            positional_rows.push((grammar, description));
        }

        let column_renderer = self.renderer(&[&positional_rows, &named_rows]);

        user_interface.print(summary.join(" "));
        user_interface.print("".to_string());
        user_interface.print(schema.description.clone());

        for (title, rows) in [
            ("positional arguments:", &positional_rows),
            ("named arguments:", &named_rows),
        ] {
            if rows.is_empty() {
                continue;
            }

            user_interface.print("".to_string());
            user_interface.print(title.to_string());

            for (left, middle) in rows {
                for line in column_renderer.render(MAIN_INDENT, left, middle) {
                    user_interface.print(line);
                }
            }
        }
    }

    fn renderer(&self, sections: &[&Vec<(String, String)>]) -> ColumnRenderer {
        let rows = sections.iter().flat_map(|rows| rows.iter());
        let (left, middle) = rows.fold((1, 2), |(left, middle), (l, m)| {
            (
                std::cmp::max(left, l.chars().count()),
                std::cmp::max(middle, m.chars().count() + MAIN_INDENT),
            )
        });

        ColumnRenderer::guided(
            PaddingWidth::new(PADDING_WIDTH).expect("internal error - padding must be positive"),
            LeftWidth::new(left).expect("internal error - left width must be positive"),
            MiddleWidth::new(middle).expect("internal error - middle width must be at least 2"),
            TotalWidth(self.terminal_width.unwrap_or(FALLBACK_TOTAL_WIDTH)),
        )
    }
}

fn metavariable(name: &str) -> String {
    name.to_ascii_uppercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::util::channel_interface;
    use crate::schema::{CommandDeclaration, ParameterClass, ParameterDeclaration};

    fn print_command(schema: &CommandSchema) -> String {
        let (sender, receiver) = channel_interface();
        Printer::new(None).print_command("program", schema, &sender);
        drop(sender);
        receiver.consume_message()
    }

    #[test]
    fn print_command_empty() {
        // Setup
        let schema = CommandSchema::build(CommandDeclaration::new("cmd1")).unwrap();

        // Execute
        let message = print_command(&schema);

        // Verify
        assert_eq!(
            message,
            r#"usage: program cmd1

No description.

named arguments:
 --help, --?   Show this usage information."#
        );
    }

    #[test]
    fn print_command_without_help() {
        // Setup
        let schema = CommandSchema::build(CommandDeclaration {
            about: Some("Does it.".to_string()),
            allow_help_named: Some(false),
            ..CommandDeclaration::new("cmd1")
        })
        .unwrap();

        // Execute
        let message = print_command(&schema);

        // Verify
        assert_eq!(message, "usage: program cmd1\n\nDoes it.");
    }

    #[test]
    fn print_command_parameters() {
        // Setup
        let mut required = ParameterDeclaration::new(ParameterClass::Named, "required");
        required.help = Some("Something required.".to_string());
        let mut level = ParameterDeclaration::new(ParameterClass::Named, "level");
        level.help = Some("The level.".to_string());
        level.default = Some("3".to_string());
        level.aliases.push("l".to_string());
        let mut verbose = ParameterDeclaration::new(ParameterClass::Named, "verbose");
        verbose.help = Some("Be loud.".to_string());
        verbose.valueless = true;
        verbose.optional = true;
        verbose.aliases.push("v".to_string());
        let mut target = ParameterDeclaration::new(ParameterClass::Positional, "target");
        target.help = Some("The target.".to_string());
        let mut extra = ParameterDeclaration::new(ParameterClass::Positional, "extra");
        extra.help = Some("Something extra.".to_string());
        extra.optional = true;
        let schema = CommandSchema::build(CommandDeclaration {
            about: Some("Runs the first command.".to_string()),
            parameters: vec![required, level, verbose, target, extra],
            ..CommandDeclaration::new("cmd1")
        })
        .unwrap();

        // Execute
        let message = print_command(&schema);

        // Verify
        assert_eq!(
            message,
            r#"usage: program cmd1 [--level LEVEL] --required REQUIRED [--verbose] TARGET [EXTRA]

Runs the first command.

positional arguments:
 TARGET                    The target.
 [EXTRA]                   Something extra.

named arguments:
 --level LEVEL, -l LEVEL   The level. (default: 3)
 --required REQUIRED       Something required.
 --verbose, -v             Be loud.
 --help, --?               Show this usage information."#
        );
    }

    #[test]
    fn print_command_wraps() {
        // Setup
        let mut target = ParameterDeclaration::new(ParameterClass::Positional, "target");
        target.help = Some("one two three four five six seven eight nine ten".to_string());
        let schema = CommandSchema::build(CommandDeclaration {
            parameters: vec![target],
            allow_help_named: Some(false),
            ..CommandDeclaration::new("cmd1")
        })
        .unwrap();
        let (sender, receiver) = channel_interface();

        // Execute
        Printer::new(Some(30)).print_command("program", &schema, &sender);
        drop(sender);

        // Verify
        let message = receiver.consume_message();
        assert_eq!(
            message,
            r#"usage: program cmd1 TARGET

No description.

positional arguments:
 TARGET   one two three four
          five six seven eight
          nine ten"#
        );
    }

    #[test]
    fn print_application() {
        // Setup
        let cmd1 = CommandSchema::build(CommandDeclaration {
            about: Some("Runs the first command.".to_string()),
            ..CommandDeclaration::new("cmd1")
        })
        .unwrap();
        let help = CommandSchema::build(CommandDeclaration::help()).unwrap();
        let (sender, receiver) = channel_interface();

        // Execute
        Printer::new(None).print_application(
            "program",
            Some("Does program things."),
            vec![
                CommandRow {
                    schema: &help,
                    aliases: vec![],
                },
                CommandRow {
                    schema: &cmd1,
                    aliases: vec!["c1"],
                },
            ],
            &sender,
        );
        drop(sender);

        // Verify
        let message = receiver.consume_message();
        assert_eq!(
            message,
            r#"usage: program <command> [...]

Does program things.

commands:
 cmd1, c1   Runs the first command.
 help       Show usage information for the application or a command.

Run 'program help <command>' for usage instructions of a command."#
        );
    }

    #[test]
    fn metavariables() {
        assert_eq!(metavariable("dry-run"), "DRY_RUN");
    }
}
