pub mod catalog;
pub mod question;
pub mod score;

pub use catalog::{QuizCatalog, ALL_QUIZ_ID};
pub use question::{Letter, Question, QuestionSet};
pub use score::{ScoreEntry, Standing};
