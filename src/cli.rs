use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};

pub fn build_cli() -> Command {
    let page = Arg::new("page")
        .long("page")
        .num_args(1)
        .default_value("0")
        .value_parser(value_parser!(u32))
        .help("Page index");

    Command::new("beatsaver")
        .about("Query the BeatSaver map catalog")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .num_args(1)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("maps")
                .about("List maps in a sort order")
                .arg(
                    Arg::new("order")
                        .required(true)
                        .value_parser(["latest", "hot", "rating", "downloads", "plays"]),
                )
                .arg(page.clone()),
        )
        .subcommand(
            Command::new("search")
                .about("Search maps")
                .arg(Arg::new("query").required(true))
                .arg(
                    Arg::new("advanced")
                        .long("advanced")
                        .help("Treat the query as Lucene syntax")
                        .action(ArgAction::SetTrue),
                )
                .arg(page.clone()),
        )
        .subcommand(
            Command::new("map")
                .about("Look up a single map")
                .arg(Arg::new("key").long("key").num_args(1))
                .arg(Arg::new("hash").long("hash").num_args(1))
                .group(
                    ArgGroup::new("lookup")
                        .args(["key", "hash"])
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("user")
                .about("Look up a user, or list their maps")
                .arg(Arg::new("id").required(true))
                .arg(
                    Arg::new("maps")
                        .long("maps")
                        .help("List the user's uploads instead")
                        .action(ArgAction::SetTrue),
                )
                .arg(page),
        )
}

pub fn page_arg(matches: &ArgMatches) -> u32 {
    matches.get_one::<u32>("page").copied().unwrap_or(0)
}

pub fn init_logging(level: Option<&str>) {
    // Explicit level wins, then RUST_LOG, then info. Logs go to stderr so stdout stays JSON.
    let env = env_logger::Env::default().default_filter_or(level.unwrap_or("info"));
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(lvl) = level {
        builder.parse_filters(lvl);
    }
    builder.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_with_page() {
        let m = build_cli()
            .try_get_matches_from(["beatsaver", "search", "a b", "--advanced", "--page", "2"])
            .unwrap();
        let (name, sub) = m.subcommand().unwrap();
        assert_eq!(name, "search");
        assert_eq!(sub.get_one::<String>("query").unwrap(), "a b");
        assert!(sub.get_flag("advanced"));
        assert_eq!(page_arg(sub), 2);
    }

    #[test]
    fn map_requires_key_or_hash() {
        assert!(build_cli().try_get_matches_from(["beatsaver", "map"]).is_err());
        assert!(build_cli()
            .try_get_matches_from(["beatsaver", "map", "--key", "a", "--hash", "b"])
            .is_err());
    }

    #[test]
    fn rejects_unknown_sort_order() {
        assert!(build_cli()
            .try_get_matches_from(["beatsaver", "maps", "newest"])
            .is_err());
    }
}
