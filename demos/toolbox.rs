use std::fs;
use subcommander::{Command, CommandLineApplication, CountCheck, Parameter, UsageError};

fn main() {
    let remote = CommandLineApplication::new("remote")
        .about("Manage the known remotes.")
        .command(
            Command::new("add", |invocation| {
                let name = invocation.positional_value(0).unwrap_or_default();
                let url = invocation.positional_value(1).unwrap_or_default();
                println!("Added remote '{name}' at {url}.");
                Ok(None)
            })
            .about("Add a remote.")
            .add(Parameter::positional("name").help("The name of the remote."))
            .add(Parameter::positional("url").help("The location of the remote.")),
        )
        .command(
            Command::new("list", |_| {
                println!("origin");
                Ok(None)
            })
            .alias("ls")
            .about("List the remotes."),
        )
        .build();

    let mut application = CommandLineApplication::new("toolbox")
        .about("A box of small tools.")
        .command(
            Command::new("count", |invocation| {
                let path = invocation.positional_value(0).unwrap_or_default();
                let content = fs::read_to_string(path).map_err(|error| {
                    UsageError::new(format!("Cannot read '{path}': {error}.")).with_exit_code(2)
                })?;

                if invocation.flag("lines") {
                    println!("{}", content.lines().count());
                } else {
                    println!("{}", content.split_whitespace().count());
                }

                Ok(None)
            })
            .about("Count the words (or lines) of a file.")
            .add(
                Parameter::named("lines")
                    .valueless()
                    .optional()
                    .help("Count lines instead of words."),
            )
            .named_alias("l", "lines")
            .add(Parameter::positional("path").help("The file to count.")),
        )
        .command(
            Command::new("echo", |invocation| {
                let words: Vec<&str> = invocation
                    .positional()
                    .iter()
                    .flatten()
                    .map(String::as_str)
                    .collect();
                println!("{}", words.join(" "));
                Ok(None)
            })
            .about("Print the given words.")
            .add(Parameter::positional("first").optional().help("The first word."))
            .positional_count_check(CountCheck::Ignore),
        )
        .command(
            Command::new("fail", |invocation| {
                let status = invocation
                    .value("status")
                    .unwrap_or_default()
                    .parse::<i32>()?;
                Ok(Some(status))
            })
            .about("Exit with the given status.")
            .add(
                Parameter::named("status")
                    .default("1")
                    .help("The exit status."),
            ),
        )
        .command(Command::category("remote", remote).alias("r"))
        .build();

    application.run_env();
}
