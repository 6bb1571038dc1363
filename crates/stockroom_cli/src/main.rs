//! Interactive inventory console.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the JSON-backed repository.
//! - Hand control to the numbered menu loop.
//! - End the process cleanly on Ctrl-C.
//!
//! # Invariants
//! - Every change is already on disk when the menu reports it, so an
//!   interrupt never needs a final flush.

mod menu;

use log::{info, warn};
use std::future::Future;
use std::io::{self, Write};
use std::process::ExitCode;
use stockroom_core::{
    core_version, init_logging, InventoryService, JsonFileStore, Repository, StockroomConfig,
};
use tokio::signal;
use tokio::task::{JoinError, JoinHandle};

/// Conventional exit status for a process stopped by SIGINT.
const INTERRUPTED_EXIT: i32 = 130;

/// How the console session ended.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Finished,
    Failed(String),
    Interrupted,
}

fn main() -> ExitCode {
    let config = match StockroomConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("file logging disabled: {err}");
        }
    }
    info!(
        "event=cli_start module=cli status=ok version={} list_order={}",
        core_version(),
        config.list_order
    );

    let repo = Repository::open(
        JsonFileStore::new(&config.data_file),
        config.repository_options(),
    );
    if let Some(warning) = repo.load_warning() {
        println!("warning: {warning}");
        println!("starting with an empty inventory; the file is replaced on the next change");
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start signal runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let service = InventoryService::new(repo);
    let menu = runtime.spawn_blocking(move || {
        let stdin = io::stdin();
        menu::Session::new(service, stdin.lock(), io::stdout()).run()
    });

    match runtime.block_on(supervise(menu, signal::ctrl_c())) {
        Outcome::Finished => ExitCode::SUCCESS,
        Outcome::Failed(message) => {
            eprintln!("fatal: {message}");
            ExitCode::FAILURE
        }
        Outcome::Interrupted => {
            println!("\nInterrupted. Goodbye!");
            let _ = io::stdout().flush();
            info!("event=cli_interrupt module=cli status=ok");
            // The menu thread is parked on stdin and cannot be joined.
            std::process::exit(INTERRUPTED_EXIT);
        }
    }
}

/// Waits for the menu to finish or for `interrupt` to fire, whichever
/// comes first.
///
/// If the interrupt listener cannot be installed the menu simply runs to
/// completion.
async fn supervise<F>(mut menu: JoinHandle<menu::MenuResult<()>>, interrupt: F) -> Outcome
where
    F: Future<Output = io::Result<()>>,
{
    tokio::select! {
        joined = &mut menu => finished(joined),
        signalled = interrupt => match signalled {
            Ok(()) => Outcome::Interrupted,
            Err(err) => {
                warn!("event=cli_interrupt module=cli status=unavailable error={err}");
                finished(menu.await)
            }
        },
    }
}

fn finished(joined: Result<menu::MenuResult<()>, JoinError>) -> Outcome {
    match joined {
        Ok(Ok(())) => Outcome::Finished,
        Ok(Err(err)) => Outcome::Failed(err.to_string()),
        Err(err) => Outcome::Failed(format!("menu task stopped: {err}")),
    }
}
