use std::io::Write;

use streetguess_game::{GameSummary, ImageResult, Presenter, RoundResult};

/// Plain-text presenter. The "map" is the player typing coordinates.
pub struct TerminalPresenter<W: Write> {
    out: W,
    submit_enabled: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            submit_enabled: false,
        }
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Terminal output is best-effort; a closed stdout ends the game anyway.
    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn show_loading(&mut self, round_number: usize, total_rounds: usize) {
        self.line(&format!("Round {round_number}/{total_rounds}: finding a panorama..."));
    }

    fn show_round_image(&mut self, round_number: usize, total_rounds: usize, image: &ImageResult) {
        let url = image.image_url.as_deref().unwrap_or("(no image url)");
        let heading = image
            .compass_angle
            .map(|a| format!(", facing {a:.0}°"))
            .unwrap_or_default();
        self.line(&format!(
            "Round {round_number}/{total_rounds}: where is this?\n  {url}{heading}"
        ));
    }

    fn show_round_error(&mut self, round_number: usize, message: &str) {
        self.line(&format!("Round {round_number} could not load: {message}"));
        self.line("Type `r` to retry or `q` to quit.");
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn show_round_result(&mut self, result: &RoundResult, total_score: u32) {
        self.line(&format!(
            "It was {} ({:.4}, {:.4}). You guessed ({:.4}, {:.4}).",
            result.location_name,
            result.true_coordinates.lat,
            result.true_coordinates.lon,
            result.guessed_coordinates.lat,
            result.guessed_coordinates.lon,
        ));
        self.line(&format!(
            "Distance: {:.2} km | Round score: {} | Total: {total_score}",
            result.distance_km, result.score
        ));
    }

    fn show_game_over(&mut self, summary: &GameSummary) {
        self.line(&format!(
            "Game over! Final score: {} / {}",
            summary.total_score, summary.max_score
        ));
        for (i, round) in summary.rounds.iter().enumerate() {
            self.line(&format!(
                "  {}. {:<16} {:>9.2} km {:>5}",
                i + 1,
                round.location_name,
                round.distance_km,
                round.score
            ));
        }
        self.line("Type `p` to play again or `q` to quit.");
    }
}
