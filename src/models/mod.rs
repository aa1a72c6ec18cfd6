//! Core data models: roster, pairings, results and derived standings.

mod ids;
mod pairing;
mod player;
mod result;
mod standing;
mod tournament;

pub use ids::*;
pub use pairing::*;
pub use player::*;
pub use result::*;
pub use standing::*;
pub use tournament::*;
