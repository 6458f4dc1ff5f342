use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("kacky")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Live map-rotation countdowns for Kacky servers")
        .long_about("kacky polls the Kacky backend for the server roster and shows, for every server, the map being played and a countdown to the next map change. Countdowns tick locally between polls and snap to the backend's values on every refresh.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the Kacky API (overrides config and KACKY_API_URL)")
                .global(true),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .help("Bearer token for the roster request (overrides config and KACKY_TOKEN)")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("Fetch the roster once and print it")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("minimal")
                        .long("minimal")
                        .help("Only show server, map and countdown")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("json")
                )
                .arg(
                    Arg::new("group")
                        .long("group")
                        .help("Group servers by difficulty tier")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("json")
                )
        )
        .subcommand(
            Command::new("watch")
                .about("Show a live roster that counts down and refreshes itself")
                .long_about(
                    "Shows the roster and redraws it on every countdown tick. The roster is \
                    refetched on the configured interval; press Enter to refetch immediately. \
                    Press Ctrl-C to quit."
                )
                .arg(
                    Arg::new("minimal")
                        .long("minimal")
                        .help("Only show server, map and countdown")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("group")
                        .long("group")
                        .help("Group servers by difficulty tier")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(Shell))
                )
        )
}
