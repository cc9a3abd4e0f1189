pub mod cricket;
pub mod match_id;
pub mod provider;

pub use cricket::CricketScoreClient;
pub use match_id::{build_score_url, MatchIdResolver};
pub use provider::{MatchIdProvider, ScoreProvider};
