// src/main.rs

use remon::engine::ExitReason;
use remon::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        // Exit right away; completion watchers of killed commands are not
        // waited for.
        Ok(_reason) => std::process::exit(0),
        Err(err) => {
            eprintln!("remon error: {err:#}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<ExitReason> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
