use argot::{CommandLine, ParameterSpec};

fn main() {
    let mut cli = CommandLine::new("summer");
    let root = cli.root();
    cli.add_help_option(root)
        .expect("Invalid command line configuration");
    let items = cli
        .add_parameter(
            root,
            ParameterSpec::<u32>::values("item").description("The items to sum."),
        )
        .expect("Invalid command line configuration");
    cli.on_invoke(root, move |invocation| {
        let sum: u32 = invocation.values(items).iter().sum();
        println!("Sum: {sum}");
        0
    })
    .expect("Invalid command line configuration");

    cli.parse();
}
