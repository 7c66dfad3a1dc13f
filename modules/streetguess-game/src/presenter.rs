use crate::engine::{GameSnapshot, GameSummary, RoundPhase, RoundResult};
use crate::locator::ImageResult;

/// The presentation layer the engine renders through. Implementations only
/// display; they never mutate game state.
pub trait Presenter {
    fn show_loading(&mut self, round_number: usize, total_rounds: usize);

    fn show_round_image(&mut self, round_number: usize, total_rounds: usize, image: &ImageResult);

    fn show_round_error(&mut self, round_number: usize, message: &str);

    fn set_submit_enabled(&mut self, enabled: bool);

    fn show_round_result(&mut self, result: &RoundResult, total_score: u32);

    fn show_game_over(&mut self, summary: &GameSummary);
}

/// Dispatch a snapshot to the matching presenter calls.
pub fn present<P: Presenter + ?Sized>(snapshot: &GameSnapshot, presenter: &mut P) {
    let round = snapshot.round_number;
    let total = snapshot.total_rounds;

    match snapshot.phase {
        RoundPhase::Idle => {}
        RoundPhase::RoundLoading => presenter.show_loading(round, total),
        RoundPhase::RoundFailed => {
            let message = snapshot.error.as_deref().unwrap_or("Failed to load round");
            presenter.show_round_error(round, message);
        }
        RoundPhase::AwaitingGuess => {
            if let Some(image) = &snapshot.image {
                presenter.show_round_image(round, total, image);
            }
            presenter.set_submit_enabled(snapshot.guess_pending());
            return;
        }
        RoundPhase::RoundResolved => {
            if let Some(result) = &snapshot.last_result {
                presenter.show_round_result(result, snapshot.total_score);
            }
        }
        RoundPhase::GameOver => presenter.show_game_over(&snapshot.summary()),
    }
    presenter.set_submit_enabled(false);
}
