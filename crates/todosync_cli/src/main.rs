//! Interactive to-do list demo.
//!
//! # Responsibility
//! - Load config, start logging and pick the list variant from flags.
//! - Read line commands from stdin and print the resulting view.

mod args;
mod command;
mod http_seed;
mod render;
mod session;

use args::CliArgs;
use clap::Parser;
use command::parse_command;
use http_seed::HttpSeedSource;
use log::{error, info};
use session::{Outcome, Session};
use std::io::{BufRead, Write};
use std::process::ExitCode;
use todosync_core::{JsonFileSeedSource, LocalTodoList, SeedSource, TodoSyncConfig};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error");
            eprintln!("todosync: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => TodoSyncConfig::load(path).map_err(|err| err.to_string())?,
        None => TodoSyncConfig::default(),
    };
    todosync_core::init_from_config(&config)?;
    info!(
        "event=cli_start module=cli status=ok version={} local={}",
        todosync_core::core_version(),
        args.local
    );

    let mut session = if args.local {
        Session::local(load_local(args, &config))
    } else {
        Session::remote(&config)?
    };

    let result = command_loop(&mut session);
    session.close();
    result
}

fn load_local(args: &CliArgs, config: &TodoSyncConfig) -> LocalTodoList {
    let source: Box<dyn SeedSource> = match (&args.seed_file, &args.seed_url) {
        (Some(path), _) => Box::new(JsonFileSeedSource::new(path, config.seed_limit)),
        (None, Some(url)) => Box::new(HttpSeedSource::new(url.clone(), config.seed_limit)),
        (None, None) => Box::new(HttpSeedSource::new(
            config.seed_url.clone(),
            config.seed_limit,
        )),
    };

    let mut list = LocalTodoList::from_config(config);
    list.load_seed(source.as_ref());
    list
}

fn command_loop(session: &mut Session) -> Result<(), String> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", render::render_view(&session.view())).map_err(io_error)?;

    for line in stdin.lock().lines() {
        let line = line.map_err(io_error)?;
        let output = match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => match session.execute(command) {
                Outcome::Print(text) => text,
                Outcome::Quit => break,
            },
            Err(message) => message,
        };
        writeln!(stdout, "{output}").map_err(io_error)?;
        stdout.flush().map_err(io_error)?;
    }
    Ok(())
}

fn io_error(err: std::io::Error) -> String {
    format!("terminal i/o failed: {err}")
}
