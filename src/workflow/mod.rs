pub mod session;

pub use session::{AnswerOutcome, QuestionMode, QuizSession, SessionEvent, SessionState};
