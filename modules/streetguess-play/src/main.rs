use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use streetguess_game::{HttpImageLocator, RoundEngine};

mod command;
mod terminal;

use command::Command;
use terminal::TerminalPresenter;

#[derive(Parser)]
#[command(name = "streetguess-play", about = "Play StreetGuess in the terminal")]
struct Cli {
    /// Base URL of the StreetGuess API
    #[arg(long, env = "STREETGUESS_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Seconds to wait for each image lookup
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let locator = HttpImageLocator::new(&cli.api_url, Duration::from_secs(cli.timeout_secs))?;
    let mut engine = RoundEngine::new(locator);
    let mut presenter = TerminalPresenter::new(std::io::stdout());

    println!("StreetGuess: {} rounds. Guess with `lat, lon`, submit with `s`.", engine.total_rounds());

    let ticket = engine.begin_reset();
    engine.publish(&mut presenter);
    engine.resolve(ticket).await;
    engine.publish(&mut presenter);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line, engine.phase()) {
            Ok(command) => command,
            Err(hint) => {
                println!("{hint}");
                continue;
            }
        };

        let outcome = match command {
            Command::Quit => break,
            Command::Guess { lat, lon } => engine.place_guess(lat, lon),
            Command::Submit => engine.submit_guess().map(|_| ()),
            Command::Retry => engine.retry_round().await.map(|_| ()),
            Command::Next => match engine.begin_next_round() {
                Ok(Some(ticket)) => {
                    engine.publish(&mut presenter);
                    engine.resolve(ticket).await;
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(err) => Err(err),
            },
            Command::PlayAgain => {
                let ticket = engine.begin_reset();
                engine.publish(&mut presenter);
                engine.resolve(ticket).await;
                Ok(())
            }
        };

        if let Err(err) = outcome {
            println!("{}", err.user_message());
        }
        engine.publish(&mut presenter);
    }

    Ok(())
}
