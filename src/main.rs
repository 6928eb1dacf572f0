use clap::{App, Arg};
use inkpress::build::build_site;
use inkpress::config::Config;
use std::path::Path;
use std::process::exit;

fn main() {
    let matches = App::new("inkpress")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds a static blog site from Markdown posts")
        .arg(
            Arg::with_name("project-directory")
                .help("The directory to search for the `inkpress.yaml` project file")
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Overrides the configured output directory"),
        )
        .get_matches();

    let project_directory = Path::new(matches.value_of("project-directory").unwrap_or("."));
    let output = matches.value_of("output").map(Path::new);

    let config = match Config::from_directory(project_directory, output) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };

    if let Err(e) = build_site(&config) {
        eprintln!("{}", e);
        exit(1);
    }
}
