pub mod bot;
pub mod policy;

pub use bot::{BotDifficulty, HandStrength, bid_ceiling, strongest_suit};
pub use policy::HeuristicPolicy;
