use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::debug;

use syllaboard::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with custom format
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    // Credentials may come from a .env file in the working directory
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {:?}", path),
        Err(_) => debug!("No .env file found, using process environment"),
    }

    let cli = Cli::parse();
    syllaboard::run(cli).await
}
