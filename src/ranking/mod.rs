pub mod engine;
pub mod ordinal;

pub use engine::{compute_positions, RankedPosition, Ranking, StudentTotal};
pub use ordinal::ordinal;
