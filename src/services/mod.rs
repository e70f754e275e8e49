pub mod leaderboard;
pub mod quiz_loader;

pub use leaderboard::Leaderboard;
pub use quiz_loader::{discover, quiz_id_from_path, CacheStats, QuizLoader};
