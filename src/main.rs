use std::env;
use std::process::ExitCode;

use inidoc::Document;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = env::args().skip(1).collect::<Vec<String>>();
    let Some(path) = args.first() else {
        eprintln!("usage: inidoc <path> [<section> <key>]");
        return ExitCode::FAILURE;
    };

    let mut doc = Document::new();
    if let Err(err) = doc.load(path) {
        tracing::error!("{err}");
        return ExitCode::FAILURE;
    }

    match (args.get(1), args.get(2)) {
        (Some(section), Some(key)) => {
            println!("{}", doc.get(section, key, String::new()));
        }
        _ => print!("{doc}"),
    }

    ExitCode::SUCCESS
}
