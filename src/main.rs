use clap::Parser;

use mailsignal::adapter::inbound::cli::command::Cli;
use mailsignal::adapter::inbound::cli::dispatch::dispatch;
use mailsignal::adapter::inbound::cli::output;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = dispatch(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
