//! Round state machine and image resolution for StreetGuess.
//!
//! `RoundEngine` owns the game: the fixed location sequence, the round
//! pointer and the running score. It resolves each round's panorama through an
//! [`ImageLocator`] and hands read-only [`GameSnapshot`]s to a [`Presenter`].

pub mod engine;
pub mod http_locator;
pub mod locator;
pub mod presenter;

pub use engine::{
    GameSnapshot, GameSummary, Progress, Resolution, RoundEngine, RoundPhase, RoundResult,
    RoundTicket,
};
pub use http_locator::HttpImageLocator;
pub use locator::{bounding_box_for, ImageLocator, ImageResult, MapillaryLocator, SEARCH_HALF_WIDTH_DEG};
pub use presenter::{present, Presenter};
