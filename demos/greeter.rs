use subcommander::{Command, CommandLineApplication, Parameter};

fn main() {
    let mut application = CommandLineApplication::new("greeter")
        .about("Greets people, politely or otherwise.")
        .command(
            Command::new("greet", |invocation| {
                let name = invocation.positional_value(0).unwrap_or("world");
                let greeting = invocation.value("greeting").unwrap_or("Hello");

                if invocation.flag("shout") {
                    println!("{}, {}!", greeting.to_uppercase(), name.to_uppercase());
                } else {
                    println!("{greeting}, {name}.");
                }

                Ok(None)
            })
            .as_default()
            .alias("g")
            .about("Greet someone.")
            .add(
                Parameter::named("greeting")
                    .alias("G")
                    .default("Hello")
                    .help("The word to greet with."),
            )
            .add(
                Parameter::named("shout")
                    .alias("s")
                    .valueless()
                    .optional()
                    .help("Greet loudly."),
            )
            .add(
                Parameter::positional("name")
                    .optional()
                    .help("Who to greet."),
            ),
        )
        .build();

    application.run_env();
}
