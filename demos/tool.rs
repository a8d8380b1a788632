use std::env;

use argot::{
    Choices, CommandLine, HelpVisibility, OptionSpec, ParameterSpec, WildcardExpansion,
};

// Completion mode: `TOOL_COMPLETE=<index> tool ARGS..` prints the candidates for `ARGS[index]`.
const COMPLETE_VARIABLE: &str = "TOOL_COMPLETE";

fn main() {
    let mut cli = CommandLine::new("tool").about("Copy and list files.");
    let root = cli.root();
    cli.add_help_option(root)
        .expect("Invalid command line configuration");
    cli.add_verbose_option(root)
        .expect("Invalid command line configuration");
    let colour = cli
        .add_option(
            root,
            OptionSpec::<String>::value("WHEN")
                .long("color")
                .optional_value("auto".to_string())
                .inherited()
                .completions(Choices::new(["always", "auto", "never"]))
                .description("Colourize the output."),
        )
        .expect("Invalid command line configuration");
    let trace = cli
        .add_option(
            root,
            OptionSpec::flag()
                .long("trace")
                .inherited()
                .visibility(HelpVisibility::Verbose)
                .description("Trace each step."),
        )
        .expect("Invalid command line configuration");

    let copy = cli
        .add_command(root, "copy", "Copy the sources into the target.")
        .expect("Invalid command line configuration");
    let count = cli
        .add_option(
            copy,
            OptionSpec::<u32>::value("COUNT")
                .short('n')
                .long("count")
                .description("How many copies to make."),
        )
        .expect("Invalid command line configuration");
    let target = cli
        .add_parameter(
            copy,
            ParameterSpec::<String>::value("target").description("The destination directory."),
        )
        .expect("Invalid command line configuration");
    let sources = cli
        .add_parameter(
            copy,
            ParameterSpec::<String>::values("sources")
                .wildcards(WildcardExpansion::Windows)
                .description("The files to copy."),
        )
        .expect("Invalid command line configuration");

    let list = cli
        .add_command(root, "list", "List the matching files.")
        .expect("Invalid command line configuration");
    let patterns = cli
        .add_parameter(
            list,
            ParameterSpec::<String>::values("patterns")
                .optional()
                .wildcards(WildcardExpansion::Always),
        )
        .expect("Invalid command line configuration");

    cli.on_invoke(copy, move |invocation| {
        let copies = invocation.value(count).copied().unwrap_or(1);

        if invocation.count(trace) > 0 {
            eprintln!("{}: colour {:?}", invocation.path(), invocation.value(colour));
        }

        for source in invocation.values(sources) {
            println!(
                "copy {source} -> {} (x{copies})",
                invocation.value(target).map(String::as_str).unwrap_or(".")
            );
        }

        0
    })
    .expect("Invalid command line configuration");
    cli.on_invoke(list, move |invocation| {
        for path in invocation.values(patterns) {
            println!("{path}");
        }

        0
    })
    .expect("Invalid command line configuration");

    if let Ok(index) = env::var(COMPLETE_VARIABLE) {
        let arguments: Vec<String> = env::args().skip(1).collect();
        let arguments: Vec<&str> = arguments.iter().map(AsRef::as_ref).collect();
        let index = index.parse().unwrap_or(arguments.len());

        for candidate in cli.complete(&arguments, index) {
            println!("{candidate}");
        }

        return;
    }

    cli.parse();
}
