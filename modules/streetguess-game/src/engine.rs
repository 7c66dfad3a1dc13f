//! The round state machine.
//!
//! Idle → RoundLoading → AwaitingGuess → RoundResolved → (RoundLoading | GameOver).
//! A failed resolution parks the round in `RoundFailed` until it is retried.
//!
//! Image resolution is the only suspending step. Every resolution is tied to a
//! [`RoundTicket`]; starting another round or resetting bumps the generation,
//! so a response that arrives for a superseded round is dropped.

use serde::Serialize;
use streetguess_common::{
    haversine_km, score_for_distance, seed_locations, Coordinates, GameError, Location, Result,
    MAX_ROUND_SCORE,
};
use tracing::{debug, info, warn};

use crate::locator::{ImageLocator, ImageResult};
use crate::presenter::{present, Presenter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Idle,
    RoundLoading,
    RoundFailed,
    AwaitingGuess,
    RoundResolved,
    GameOver,
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RoundPhase::Idle => "idle",
            RoundPhase::RoundLoading => "loading a round",
            RoundPhase::RoundFailed => "the round failed to load",
            RoundPhase::AwaitingGuess => "awaiting a guess",
            RoundPhase::RoundResolved => "the round is resolved",
            RoundPhase::GameOver => "the game is over",
        };
        f.write_str(s)
    }
}

/// Identifies one in-flight image resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTicket {
    generation: u64,
    round_index: usize,
}

impl RoundTicket {
    pub fn round_index(&self) -> usize {
        self.round_index
    }
}

/// What happened when a resolution completed.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Ready,
    Failed(GameError),
    /// The ticket belonged to a superseded round; nothing changed.
    Stale,
}

/// Outcome of [`RoundEngine::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Round(Resolution),
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundResult {
    pub location_name: String,
    pub image_id: String,
    pub true_coordinates: Coordinates,
    pub guessed_coordinates: Coordinates,
    pub distance_km: f64,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub total_score: u32,
    pub max_score: u32,
    pub rounds: Vec<RoundResult>,
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub phase: RoundPhase,
    pub round_index: usize,
    /// 1-based, for display.
    pub round_number: usize,
    pub total_rounds: usize,
    pub total_score: u32,
    pub image: Option<ImageResult>,
    pub pending_guess: Option<Coordinates>,
    pub last_result: Option<RoundResult>,
    pub error: Option<String>,
    pub results: Vec<RoundResult>,
}

impl GameSnapshot {
    pub fn guess_pending(&self) -> bool {
        self.pending_guess.is_some()
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            total_score: self.total_score,
            max_score: MAX_ROUND_SCORE * self.total_rounds as u32,
            rounds: self.results.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct GameState {
    phase: RoundPhase,
    current_round_index: usize,
    total_score: u32,
    active_image: Option<ImageResult>,
    pending_guess: Option<Coordinates>,
    last_result: Option<RoundResult>,
    last_error: Option<GameError>,
    results: Vec<RoundResult>,
    generation: u64,
}

impl GameState {
    fn new(generation: u64) -> Self {
        Self {
            phase: RoundPhase::Idle,
            current_round_index: 0,
            total_score: 0,
            active_image: None,
            pending_guess: None,
            last_result: None,
            last_error: None,
            results: Vec::new(),
            generation,
        }
    }
}

pub struct RoundEngine<L: ImageLocator> {
    locator: L,
    locations: Vec<Location>,
    state: GameState,
}

impl<L: ImageLocator> RoundEngine<L> {
    /// Engine over the five seed locations.
    pub fn new(locator: L) -> Self {
        Self {
            locator,
            locations: seed_locations(),
            state: GameState::new(0),
        }
    }

    pub fn with_locations(locator: L, locations: Vec<Location>) -> Result<Self> {
        if locations.is_empty() {
            return Err(GameError::Validation(
                "a game needs at least one location".to_string(),
            ));
        }
        Ok(Self {
            locator,
            locations,
            state: GameState::new(0),
        })
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    pub fn total_score(&self) -> u32 {
        self.state.total_score
    }

    pub fn current_round_index(&self) -> usize {
        self.state.current_round_index
    }

    pub fn total_rounds(&self) -> usize {
        self.locations.len()
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let s = &self.state;
        GameSnapshot {
            phase: s.phase,
            round_index: s.current_round_index,
            round_number: (s.current_round_index + 1).min(self.locations.len()),
            total_rounds: self.locations.len(),
            total_score: s.total_score,
            image: s.active_image.clone(),
            pending_guess: s.pending_guess,
            last_result: s.last_result.clone(),
            error: s.last_error.as_ref().map(GameError::user_message),
            results: s.results.clone(),
        }
    }

    /// Render the current snapshot through `presenter`.
    pub fn publish<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        present(&self.snapshot(), presenter);
    }

    // --- Round resolution ---

    /// Enter `RoundLoading` for `index` and issue a ticket for the resolution.
    ///
    /// Allowed before the first round, while a round is loading (the older
    /// request is superseded) and after a failed load (retry).
    pub fn begin_round(&mut self, index: usize) -> Result<RoundTicket> {
        match self.state.phase {
            RoundPhase::Idle | RoundPhase::RoundLoading | RoundPhase::RoundFailed => {}
            phase => return Err(invalid("start_round", phase)),
        }
        if index >= self.locations.len() {
            return Err(GameError::Validation(format!(
                "round {index} is out of range (game has {} rounds)",
                self.locations.len()
            )));
        }
        Ok(self.enter_loading(index))
    }

    fn enter_loading(&mut self, index: usize) -> RoundTicket {
        let s = &mut self.state;
        s.generation += 1;
        s.phase = RoundPhase::RoundLoading;
        s.current_round_index = index;
        s.active_image = None;
        s.pending_guess = None;
        s.last_error = None;
        debug!(round = index, generation = s.generation, "Round loading");
        RoundTicket {
            generation: s.generation,
            round_index: index,
        }
    }

    /// The location a ticket is resolving.
    pub fn location_for(&self, ticket: &RoundTicket) -> &Location {
        &self.locations[ticket.round_index]
    }

    /// Apply the outcome of a resolution. Outcomes for superseded tickets are
    /// discarded.
    pub fn complete_round(
        &mut self,
        ticket: RoundTicket,
        outcome: Result<ImageResult>,
    ) -> Resolution {
        let s = &mut self.state;
        if ticket.generation != s.generation || s.phase != RoundPhase::RoundLoading {
            debug!(
                ticket_generation = ticket.generation,
                current_generation = s.generation,
                "Discarding stale image resolution"
            );
            return Resolution::Stale;
        }

        match outcome {
            Ok(image) => {
                info!(round = ticket.round_index, image_id = %image.image_id, "Round ready");
                s.active_image = Some(image);
                s.phase = RoundPhase::AwaitingGuess;
                Resolution::Ready
            }
            Err(err) => {
                warn!(round = ticket.round_index, error = %err, "Round failed to load");
                s.last_error = Some(err.clone());
                s.phase = RoundPhase::RoundFailed;
                Resolution::Failed(err)
            }
        }
    }

    /// Begin round `index` and resolve its image.
    pub async fn start_round(&mut self, index: usize) -> Result<Resolution> {
        let ticket = self.begin_round(index)?;
        Ok(self.resolve(ticket).await)
    }

    /// Re-attempt the current round after a failed load.
    pub async fn retry_round(&mut self) -> Result<Resolution> {
        if self.state.phase != RoundPhase::RoundFailed {
            return Err(invalid("retry_round", self.state.phase));
        }
        self.start_round(self.state.current_round_index).await
    }

    /// Look up the image for `ticket` and apply the outcome.
    pub async fn resolve(&mut self, ticket: RoundTicket) -> Resolution {
        let at = self.location_for(&ticket).coordinates;
        let outcome = self.locator.locate(at).await;
        self.complete_round(ticket, outcome)
    }

    // --- Guessing ---

    /// Move the pending guess. Nothing is committed until submission.
    pub fn place_guess(&mut self, lat: f64, lon: f64) -> Result<()> {
        if self.state.phase != RoundPhase::AwaitingGuess {
            return Err(invalid("place_guess", self.state.phase));
        }
        self.state.pending_guess = Some(Coordinates::checked(lat, lon)?);
        Ok(())
    }

    /// Place and submit in one step.
    pub fn submit_guess_at(&mut self, lat: f64, lon: f64) -> Result<RoundResult> {
        self.place_guess(lat, lon)?;
        self.submit_guess()
    }

    /// Score the pending guess against the round's true location.
    pub fn submit_guess(&mut self) -> Result<RoundResult> {
        let s = &mut self.state;
        if s.phase != RoundPhase::AwaitingGuess {
            return Err(invalid("submit_guess", s.phase));
        }
        let guess = s.pending_guess.ok_or(GameError::NoGuess)?;
        let image = s.active_image.as_ref().ok_or_else(|| {
            GameError::Internal("awaiting a guess without an active image".to_string())
        })?;

        let truth = image.true_location();
        let distance_km = haversine_km(guess, truth);
        let score = score_for_distance(distance_km);

        let result = RoundResult {
            location_name: self.locations[s.current_round_index].name.clone(),
            image_id: image.image_id.clone(),
            true_coordinates: truth,
            guessed_coordinates: guess,
            distance_km,
            score,
        };

        s.total_score += score;
        s.pending_guess = None;
        s.results.push(result.clone());
        s.last_result = Some(result.clone());
        s.phase = RoundPhase::RoundResolved;

        info!(
            round = s.current_round_index,
            distance_km,
            score,
            total_score = s.total_score,
            "Guess scored"
        );
        Ok(result)
    }

    // --- Progression ---

    /// Move past a resolved round. Returns `None` when that was the last round.
    pub fn begin_next_round(&mut self) -> Result<Option<RoundTicket>> {
        if self.state.phase != RoundPhase::RoundResolved {
            return Err(invalid("advance", self.state.phase));
        }
        self.state.last_result = None;

        let next = self.state.current_round_index + 1;
        if next >= self.locations.len() {
            let s = &mut self.state;
            s.current_round_index = next;
            s.active_image = None;
            s.phase = RoundPhase::GameOver;
            info!(total_score = s.total_score, "Game over");
            return Ok(None);
        }
        Ok(Some(self.enter_loading(next)))
    }

    pub async fn advance(&mut self) -> Result<Progress> {
        match self.begin_next_round()? {
            Some(ticket) => Ok(Progress::Round(self.resolve(ticket).await)),
            None => Ok(Progress::GameOver),
        }
    }

    /// Throw the current game away and load round 0. Allowed from any phase;
    /// any resolution still in flight becomes stale.
    pub fn begin_reset(&mut self) -> RoundTicket {
        self.state = GameState::new(self.state.generation);
        info!("Game reset");
        self.enter_loading(0)
    }

    pub async fn reset(&mut self) -> Resolution {
        let ticket = self.begin_reset();
        self.resolve(ticket).await
    }
}

fn invalid(action: &'static str, phase: RoundPhase) -> GameError {
    GameError::InvalidTransition {
        action,
        phase: phase.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use streetguess_common::ProviderPoint;

    /// Answers every lookup with an image exactly at the requested point.
    struct ExactLocator;

    #[async_trait]
    impl ImageLocator for ExactLocator {
        async fn locate(&self, at: Coordinates) -> Result<ImageResult> {
            Ok(image_at(at))
        }
    }

    fn image_at(at: Coordinates) -> ImageResult {
        ImageResult {
            image_id: format!("{}:{}", at.lat, at.lon),
            image_url: None,
            coordinates: ProviderPoint::from(at),
            compass_angle: None,
        }
    }

    #[test]
    fn starts_idle_with_zero_score() {
        let engine = RoundEngine::new(ExactLocator);
        assert_eq!(engine.phase(), RoundPhase::Idle);
        assert_eq!(engine.total_score(), 0);
        assert_eq!(engine.current_round_index(), 0);
        assert_eq!(engine.total_rounds(), 5);
    }

    #[test]
    fn empty_location_list_is_rejected() {
        assert!(RoundEngine::with_locations(ExactLocator, vec![]).is_err());
    }

    #[test]
    fn out_of_range_round_is_rejected() {
        let mut engine = RoundEngine::new(ExactLocator);
        assert!(matches!(
            engine.begin_round(5),
            Err(GameError::Validation(_))
        ));
        assert_eq!(engine.phase(), RoundPhase::Idle);
    }

    #[test]
    fn superseded_ticket_is_stale() {
        let mut engine = RoundEngine::new(ExactLocator);
        let first = engine.begin_round(0).unwrap();
        let second = engine.begin_round(0).unwrap();

        let at = engine.location_for(&first).coordinates;
        assert_eq!(engine.complete_round(first, Ok(image_at(at))), Resolution::Stale);
        assert_eq!(engine.phase(), RoundPhase::RoundLoading);

        assert_eq!(engine.complete_round(second, Ok(image_at(at))), Resolution::Ready);
        assert_eq!(engine.phase(), RoundPhase::AwaitingGuess);
    }

    #[test]
    fn late_response_after_reset_does_not_touch_new_game() {
        let mut engine = RoundEngine::new(ExactLocator);
        let old = engine.begin_round(0).unwrap();
        let fresh = engine.begin_reset();

        let bogus = image_at(Coordinates::new(1.0, 1.0));
        assert_eq!(engine.complete_round(old, Ok(bogus)), Resolution::Stale);
        assert!(engine.snapshot().image.is_none());

        let at = engine.location_for(&fresh).coordinates;
        assert_eq!(engine.complete_round(fresh, Ok(image_at(at))), Resolution::Ready);
        assert_eq!(engine.snapshot().image.unwrap().true_location(), at);
    }

    #[test]
    fn completing_twice_is_stale() {
        let mut engine = RoundEngine::new(ExactLocator);
        let ticket = engine.begin_round(0).unwrap();
        let at = engine.location_for(&ticket).coordinates;
        assert_eq!(engine.complete_round(ticket, Ok(image_at(at))), Resolution::Ready);
        assert_eq!(engine.complete_round(ticket, Ok(image_at(at))), Resolution::Stale);
    }

    #[test]
    fn guess_outside_awaiting_is_invalid() {
        let mut engine = RoundEngine::new(ExactLocator);
        assert!(matches!(
            engine.place_guess(0.0, 0.0),
            Err(GameError::InvalidTransition { .. })
        ));
        assert!(matches!(
            engine.submit_guess(),
            Err(GameError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn snapshot_round_number_is_one_based() {
        let mut engine = RoundEngine::new(ExactLocator);
        engine.begin_round(2).unwrap();
        let snap = engine.snapshot();
        assert_eq!(snap.round_index, 2);
        assert_eq!(snap.round_number, 3);
        assert_eq!(snap.summary().max_score, 25_000);
    }
}
