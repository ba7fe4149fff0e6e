use anyhow::{Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use ruang::article::Parser;
use ruang::build::build_site;
use ruang::catalog::Catalog;
use ruang::config::Config;
use ruang::date;
use std::path::Path;

fn main() -> Result<()> {
    let matches = App::new("ruang")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds a static blog from a directory of Markdown articles")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .global(true)
                .help("Logs every file parsed and written"),
        )
        .subcommand(
            SubCommand::with_name("build")
                .about("Renders the site into the output directory")
                .arg(project_arg())
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .default_value("_site")
                        .help("The directory the site is written to"),
                ),
        )
        .subcommand(
            SubCommand::with_name("search")
                .about("Lists the articles whose title or description match a query")
                .arg(project_arg())
                .arg(
                    Arg::with_name("limit")
                        .short("n")
                        .long("limit")
                        .takes_value(true)
                        .default_value("9")
                        .help("The maximum number of articles listed"),
                )
                .arg(Arg::with_name("QUERY").help("Matches everything when omitted")),
        )
        .subcommand(
            SubCommand::with_name("categories")
                .about("Lists the categories with their article counts")
                .arg(project_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        ("build", Some(m)) => {
            init_logging(m);
            let output = Path::new(m.value_of("output").unwrap_or("_site"));
            build_site(load_config(m, output)?)?;
        }
        ("search", Some(m)) => {
            init_logging(m);
            let limit: usize = m
                .value_of("limit")
                .unwrap_or("9")
                .parse()
                .context("`--limit` must be a non-negative integer")?;
            let catalog = load_catalog(m)?;
            let found = catalog.search(m.value_of("QUERY").unwrap_or(""), limit);
            if found.is_empty() {
                log::info!("No articles found");
            }
            for article in found {
                println!(
                    "{}  {}  {}",
                    date::format_iso(&article.date),
                    article.title,
                    article.url
                );
            }
        }
        ("categories", Some(m)) => {
            init_logging(m);
            let catalog = load_catalog(m)?;
            for (category, count) in catalog.category_counts() {
                println!("{} ({})  {}", category.name, count, category.url);
            }
        }
        _ => {}
    }
    Ok(())
}

fn project_arg() -> Arg<'static, 'static> {
    Arg::with_name("project")
        .short("p")
        .long("project")
        .takes_value(true)
        .default_value(".")
        .help("A directory inside the project; `ruang.yaml` is searched upward from it")
}

fn init_logging(matches: &ArgMatches) {
    let level = match matches.is_present("verbose") {
        true => "debug",
        false => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(matches: &ArgMatches, output: &Path) -> Result<Config> {
    let project = matches.value_of("project").unwrap_or(".");
    let project = std::fs::canonicalize(project)
        .with_context(|| format!("Resolving project directory `{}`", project))?;
    Config::from_directory(&project, output)
}

// The listing commands never write, so the output directory is unused.
fn load_catalog(matches: &ArgMatches) -> Result<Catalog> {
    let config = load_config(matches, Path::new("_site"))?;
    let parser = Parser::new(
        &config.home_page,
        &config.articles_url,
        &config.categories_url,
        &config.articles_output_directory,
    );
    Ok(Catalog::new(
        parser.parse_articles(&config.content_directory)?,
    ))
}
