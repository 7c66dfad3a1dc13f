use streetguess_game::RoundPhase;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Guess { lat: f64, lon: f64 },
    Submit,
    Next,
    Retry,
    PlayAgain,
    Quit,
}

impl Command {
    /// Interpret one line of input for the current phase. `Err` carries a hint
    /// for the player.
    pub fn parse(input: &str, phase: RoundPhase) -> Result<Self, &'static str> {
        let input = input.trim();
        if matches!(input, "q" | "quit") {
            return Ok(Command::Quit);
        }

        match phase {
            RoundPhase::AwaitingGuess => match input {
                "s" | "submit" => Ok(Command::Submit),
                other => parse_guess(other)
                    .map(|(lat, lon)| Command::Guess { lat, lon })
                    .ok_or("Enter a guess as `lat, lon` or `s` to submit."),
            },
            RoundPhase::RoundResolved => Ok(Command::Next),
            RoundPhase::RoundFailed => match input {
                "r" | "retry" => Ok(Command::Retry),
                _ => Err("Type `r` to retry or `q` to quit."),
            },
            RoundPhase::GameOver => match input {
                "p" | "play" => Ok(Command::PlayAgain),
                _ => Err("Type `p` to play again or `q` to quit."),
            },
            RoundPhase::Idle | RoundPhase::RoundLoading => Err("Still loading, hold on."),
        }
    }
}

/// `"40.7, -74.0"` or `"40.7 -74.0"`.
fn parse_guess(input: &str) -> Option<(f64, f64)> {
    let mut parts = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty());
    let lat = parts.next()?.parse().ok()?;
    let lon = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_accept_comma_or_space() {
        assert_eq!(parse_guess("40.7, -74.0"), Some((40.7, -74.0)));
        assert_eq!(parse_guess("40.7 -74.0"), Some((40.7, -74.0)));
        assert_eq!(parse_guess("40.7"), None);
        assert_eq!(parse_guess("1, 2, 3"), None);
        assert_eq!(parse_guess("north, east"), None);
    }

    #[test]
    fn commands_depend_on_phase() {
        assert_eq!(
            Command::parse("s", RoundPhase::AwaitingGuess),
            Ok(Command::Submit)
        );
        assert_eq!(
            Command::parse("1 2", RoundPhase::AwaitingGuess),
            Ok(Command::Guess { lat: 1.0, lon: 2.0 })
        );
        assert_eq!(Command::parse("", RoundPhase::RoundResolved), Ok(Command::Next));
        assert_eq!(Command::parse("r", RoundPhase::RoundFailed), Ok(Command::Retry));
        assert_eq!(Command::parse("p", RoundPhase::GameOver), Ok(Command::PlayAgain));
        assert!(Command::parse("s", RoundPhase::GameOver).is_err());
        assert_eq!(Command::parse(" q ", RoundPhase::RoundLoading), Ok(Command::Quit));
    }
}
