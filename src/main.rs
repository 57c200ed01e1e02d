use clap::Parser;
use std::io;
use std::process::ExitCode;

use topwords::config::{analysis, Cli, Command, ServeConfig};
use topwords::{count, logger, Server};

/// Handle server mode
fn run_server(config: ServeConfig) -> topwords::Result<()> {
    let server = Server::bind(&config)?;
    server.run()
}

/// Print `word: count` lines for the top words of `text` or stdin
fn run_count(text: Option<String>, top: usize, compat: bool) -> topwords::Result<()> {
    let input = count::read_text(text, io::stdin())?;
    count::write_top(&mut io::stdout().lock(), &input, top, &analysis(compat))?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.log_level) {
        eprintln!("Error setting up logging: {e}");
    }

    let result = match cli.command {
        Command::Serve(args) => run_server(ServeConfig::from(&args)),
        Command::Count { text, top, compat } => run_count(text, top, compat),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
