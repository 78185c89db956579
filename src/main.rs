//! Binary entry point: read the configuration, open the music database, wire
//! the three linked lists and drive the Ratatui event loop until the user
//! exits. The database handle is closed only after the loop is gone.
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use music_db_browser::config::{Config, DB_ENV};
use music_db_browser::{run_app, App, Catalog, MusicBrowser};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    db_path: Option<PathBuf>,
    demo: bool,
    print_example: bool,
    show_help: bool,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }
    if options.print_example {
        print!("{}", Config::example());
        return Ok(());
    }

    let config = Config::load(&options.config_path)?;
    init_logging(&config)?;

    let catalog = if options.demo {
        Catalog::open_demo()?
    } else {
        let override_path = options
            .db_path
            .clone()
            .or_else(|| env::var_os(DB_ENV).map(PathBuf::from));
        let db_path = config.db_path(override_path);
        Catalog::open(&db_path).with_context(|| {
            format!(
                "open music database {}; pass a path, set {DB_ENV}, or use --demo",
                db_path.display()
            )
        })?
    };

    let catalog = Rc::new(catalog);
    let result = browse(Rc::clone(&catalog));

    info!("Closing database connection.");
    match Rc::try_unwrap(catalog) {
        Ok(catalog) => catalog.close()?,
        Err(_) => warn!("database handle still shared at exit; leaving it to drop"),
    }
    result
}

/// Everything that borrows the catalog lives in here so its last clone is
/// released before `run` closes the connection.
fn browse(catalog: Rc<Catalog>) -> Result<()> {
    let browser = MusicBrowser::wire(catalog)?;
    let mut app = App::new(browser);
    app.start()?;
    run_app(&mut app)
}

fn init_logging(config: &Config) -> Result<()> {
    let path = config.log_file();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let mut builder = colog::default_builder();
    builder.filter(None, config.log_level());
    builder.target(env_logger::Target::Pipe(Box::new(file)));
    builder
        .try_init()
        .map_err(|err| anyhow!("failed to initialise logging: {err}"))
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        db_path: None,
        demo: false,
        print_example: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--demo" => options.demo = true,
            "--print-example-config" => options.print_example = true,
            "--help" | "-h" => options.show_help = true,
            flag if flag.starts_with('-') => {
                return Err(anyhow!(
                    "unknown argument {flag:?}; run with --help to see supported options"
                ));
            }
            path => {
                if options.db_path.is_some() {
                    return Err(anyhow!("only one database path may be given"));
                }
                options.db_path = Some(PathBuf::from(path));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("music-browser [OPTIONS] [DB_PATH]");
    println!("  --config <path>          Use a specific config file");
    println!("  --demo                   Browse a built-in demo catalogue (in-memory)");
    println!("  --print-example-config   Print a config template");
    println!("  --help                   Show this help");
}
