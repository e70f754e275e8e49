//! 答题会话 - 流程层
//!
//! 每个访客一份显式的状态机，由离散的用户事件驱动：
//!
//! ```text
//! AwaitingName ──EnterName──▶ AwaitingSelection ──SelectQuiz──▶ AwaitingSubmit
//!                                                                │  ▲
//!                                                          Submit│  │Next
//!                                                                ▼  │
//!                                   Finished ◀──Next（顺序模式末题）── ShowingResult
//! ```
//!
//! 非法事件返回 `SessionError`，状态保持不变。

use std::str::FromStr;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SessionError;
use crate::models::{Question, QuizCatalog, ScoreEntry};
use crate::services::Leaderboard;

/// 出题方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionMode {
    /// 按顺序出题，最后一题之后结束
    #[default]
    Sequential,
    /// 每次随机抽一道题，不会结束
    Random,
}

impl FromStr for QuestionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(QuestionMode::Sequential),
            "random" => Ok(QuestionMode::Random),
            other => Err(format!("未知的出题方式: {}", other)),
        }
    }
}

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub selected: String,
    pub correct_answer: String,
    /// 提交后该玩家在排行榜上的成绩
    pub score: ScoreEntry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingName,
    AwaitingSelection,
    AwaitingSubmit { selection: Option<usize> },
    ShowingResult { outcome: AnswerOutcome },
    Finished,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::AwaitingName => "awaiting_name",
            SessionState::AwaitingSelection => "awaiting_selection",
            SessionState::AwaitingSubmit { .. } => "awaiting_submit",
            SessionState::ShowingResult { .. } => "showing_result",
            SessionState::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    EnterName(String),
    SelectQuiz(String),
    /// 选中第几个选项（0-3）
    Choose(usize),
    Submit,
    Next,
    SwitchQuiz(String),
    Restart,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::EnterName(_) => "enter_name",
            SessionEvent::SelectQuiz(_) => "select_quiz",
            SessionEvent::Choose(_) => "choose",
            SessionEvent::Submit => "submit",
            SessionEvent::Next => "next",
            SessionEvent::SwitchQuiz(_) => "switch_quiz",
            SessionEvent::Restart => "restart",
        }
    }
}

/// 单个访客的答题会话
pub struct QuizSession {
    catalog: Arc<QuizCatalog>,
    leaderboard: Leaderboard,
    mode: QuestionMode,
    state: SessionState,
    player: Option<String>,
    quiz_id: Option<String>,
    index: usize,
    /// 本次会话（当前测验）的答对数 / 作答数
    session_score: ScoreEntry,
}

impl QuizSession {
    pub fn new(catalog: Arc<QuizCatalog>, leaderboard: Leaderboard, mode: QuestionMode) -> Self {
        Self {
            catalog,
            leaderboard,
            mode,
            state: SessionState::AwaitingName,
            player: None,
            quiz_id: None,
            index: 0,
            session_score: ScoreEntry::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    pub fn quiz_id(&self) -> Option<&str> {
        self.quiz_id.as_deref()
    }

    pub fn mode(&self) -> QuestionMode {
        self.mode
    }

    pub fn session_score(&self) -> ScoreEntry {
        self.session_score
    }

    /// 当前题目在集合中的位置（从 0 开始）与集合大小
    pub fn progress(&self) -> Option<(usize, usize)> {
        let set = self.catalog.get(self.quiz_id.as_deref()?)?;
        Some((self.index, set.len()))
    }

    /// 正在作答或刚提交的题目
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::AwaitingSubmit { .. } | SessionState::ShowingResult { .. } => self
                .catalog
                .get(self.quiz_id.as_deref()?)
                .and_then(|set| set.get(self.index)),
            _ => None,
        }
    }

    /// 处理一个事件，成功时返回新状态
    pub async fn handle(&mut self, event: SessionEvent) -> Result<&SessionState, SessionError> {
        let invalid = SessionError::InvalidTransition {
            state: self.state.name(),
            event: event.name(),
        };

        match (self.state.clone(), event) {
            (SessionState::AwaitingName, SessionEvent::EnterName(name)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(SessionError::EmptyName);
                }
                info!("👤 玩家加入: {}", name);
                self.player = Some(name.to_string());
                self.state = SessionState::AwaitingSelection;
            }

            (SessionState::AwaitingSelection, SessionEvent::SelectQuiz(quiz_id)) => {
                self.start_quiz(&quiz_id)?;
            }

            (
                SessionState::AwaitingSubmit { .. }
                | SessionState::ShowingResult { .. }
                | SessionState::Finished,
                SessionEvent::SwitchQuiz(quiz_id),
            ) => {
                self.start_quiz(&quiz_id)?;
            }

            (SessionState::AwaitingSubmit { .. }, SessionEvent::Choose(index)) => {
                if index >= 4 {
                    return Err(SessionError::ChoiceOutOfRange {
                        index,
                        max_index: 3,
                    });
                }
                self.state = SessionState::AwaitingSubmit {
                    selection: Some(index),
                };
            }

            (SessionState::AwaitingSubmit { selection }, SessionEvent::Submit) => {
                let selection = selection.unwrap_or(0);
                let outcome = self.submit(selection).await.ok_or(invalid)?;
                self.state = SessionState::ShowingResult { outcome };
            }

            (SessionState::ShowingResult { .. }, SessionEvent::Next) => {
                self.advance();
            }

            (SessionState::Finished, SessionEvent::Restart) => {
                let quiz_id = self.quiz_id.clone().ok_or(invalid)?;
                self.start_quiz(&quiz_id)?;
            }

            _ => return Err(invalid),
        }

        debug!("会话状态: {}", self.state.name());
        Ok(&self.state)
    }

    /// 开始（或切换到）某个测验，重置进度和本次会话成绩
    fn start_quiz(&mut self, quiz_id: &str) -> Result<(), SessionError> {
        let set = self
            .catalog
            .get(quiz_id)
            .ok_or_else(|| SessionError::UnknownQuiz {
                quiz_id: quiz_id.to_string(),
            })?;
        if set.is_empty() {
            return Err(SessionError::NoQuestions {
                quiz_id: quiz_id.to_string(),
            });
        }

        self.index = match self.mode {
            QuestionMode::Sequential => 0,
            QuestionMode::Random => rand::thread_rng().gen_range(0..set.len()),
        };
        info!("📖 开始测验 {} (共 {} 道题)", quiz_id, set.len());
        self.quiz_id = Some(quiz_id.to_string());
        self.session_score = ScoreEntry::default();
        self.state = SessionState::AwaitingSubmit { selection: None };
        Ok(())
    }

    /// 判定当前题目并写入排行榜
    async fn submit(&mut self, selection: usize) -> Option<AnswerOutcome> {
        let player = self.player.clone()?;
        let quiz_id = self.quiz_id.clone()?;
        let question = self.current_question()?;
        debug!("判定题目: {}", question.preview());

        let selected = question.choices.get(selection)?.clone();
        let is_correct = question.is_correct(&selected);
        let correct_answer = question.correct.clone();

        let score = self
            .leaderboard
            .record_answer(&quiz_id, &player, is_correct)
            .await;
        self.session_score.record(is_correct);

        Some(AnswerOutcome {
            is_correct,
            selected,
            correct_answer,
            score,
        })
    }

    fn advance(&mut self) {
        let len = self.progress().map(|(_, len)| len).unwrap_or(0);
        match self.mode {
            QuestionMode::Sequential => {
                if self.index + 1 >= len {
                    info!("🏁 测验完成: {}", self.session_score);
                    self.state = SessionState::Finished;
                    return;
                }
                self.index += 1;
            }
            QuestionMode::Random => {
                if len > 0 {
                    self.index = rand::thread_rng().gen_range(0..len);
                }
            }
        }
        self.state = SessionState::AwaitingSubmit { selection: None };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Letter, QuestionSet};

    fn question(prompt: &str, correct: Letter) -> Question {
        Question::new(
            prompt.to_string(),
            [
                "A. Nazareth".to_string(),
                "B. Bethlehem".to_string(),
                "C. Capernaum".to_string(),
                "D. Jerusalem".to_string(),
            ],
            correct,
        )
    }

    fn catalog() -> Arc<QuizCatalog> {
        let mut catalog = QuizCatalog::new();
        catalog.insert(QuestionSet::new(
            "Luke",
            vec![question("q1", Letter::A), question("q2", Letter::B)],
        ));
        catalog.insert(QuestionSet::new("Acts", vec![]));
        Arc::new(catalog)
    }

    async fn started(mode: QuestionMode) -> (QuizSession, Leaderboard) {
        let board = Leaderboard::new();
        let mut session = QuizSession::new(catalog(), board.clone(), mode);
        session
            .handle(SessionEvent::EnterName("  Alice ".to_string()))
            .await
            .unwrap();
        session
            .handle(SessionEvent::SelectQuiz("Luke".to_string()))
            .await
            .unwrap();
        (session, board)
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let mut session = QuizSession::new(catalog(), Leaderboard::new(), QuestionMode::Sequential);
        let err = session
            .handle(SessionEvent::EnterName("   ".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::EmptyName);
        assert_eq!(session.state(), &SessionState::AwaitingName);
    }

    #[tokio::test]
    async fn test_unknown_and_empty_quizzes_are_distinct() {
        let mut session = QuizSession::new(catalog(), Leaderboard::new(), QuestionMode::Sequential);
        session
            .handle(SessionEvent::EnterName("Alice".to_string()))
            .await
            .unwrap();

        let err = session
            .handle(SessionEvent::SelectQuiz("John".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownQuiz { .. }));

        let err = session
            .handle(SessionEvent::SelectQuiz("Acts".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NoQuestions { .. }));
        assert_eq!(session.state(), &SessionState::AwaitingSelection);
    }

    #[tokio::test]
    async fn test_sequential_walkthrough_records_scores() {
        let (mut session, board) = started(QuestionMode::Sequential).await;
        assert_eq!(session.player(), Some("Alice"));
        assert_eq!(session.current_question().unwrap().prompt, "q1");

        // 默认选中第一项，q1 的答案是 A
        let state = session.handle(SessionEvent::Submit).await.unwrap();
        let SessionState::ShowingResult { outcome } = state else {
            panic!("应该显示结果");
        };
        assert!(outcome.is_correct);
        assert_eq!(outcome.score, ScoreEntry { attempted: 1, correct: 1 });

        session.handle(SessionEvent::Next).await.unwrap();
        assert_eq!(session.current_question().unwrap().prompt, "q2");
        session.handle(SessionEvent::Choose(2)).await.unwrap();
        let state = session.handle(SessionEvent::Submit).await.unwrap();
        let SessionState::ShowingResult { outcome } = state else {
            panic!("应该显示结果");
        };
        assert!(!outcome.is_correct);
        assert_eq!(outcome.selected, "C. Capernaum");
        assert_eq!(outcome.correct_answer, "B. Bethlehem");

        let state = session.handle(SessionEvent::Next).await.unwrap();
        assert_eq!(state, &SessionState::Finished);
        assert_eq!(
            session.session_score(),
            ScoreEntry { attempted: 2, correct: 1 }
        );
        assert_eq!(
            board.snapshot("Luke").await["Alice"],
            ScoreEntry { attempted: 2, correct: 1 }
        );

        session.handle(SessionEvent::Restart).await.unwrap();
        assert_eq!(session.current_question().unwrap().prompt, "q1");
        assert_eq!(session.session_score(), ScoreEntry::default());
    }

    #[tokio::test]
    async fn test_invalid_events_leave_state_unchanged() {
        let (mut session, _) = started(QuestionMode::Sequential).await;

        let err = session.handle(SessionEvent::Next).await.unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                state: "awaiting_submit",
                event: "next",
            }
        );

        let err = session.handle(SessionEvent::Choose(4)).await.unwrap_err();
        assert!(matches!(err, SessionError::ChoiceOutOfRange { index: 4, .. }));
        assert_eq!(session.state(), &SessionState::AwaitingSubmit { selection: None });

        session.handle(SessionEvent::Submit).await.unwrap();
        let err = session.handle(SessionEvent::Submit).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_switch_quiz_resets_progress() {
        let (mut session, _) = started(QuestionMode::Sequential).await;
        session.handle(SessionEvent::Submit).await.unwrap();
        session.handle(SessionEvent::Next).await.unwrap();
        assert_eq!(session.progress(), Some((1, 2)));

        session
            .handle(SessionEvent::SwitchQuiz("Luke".to_string()))
            .await
            .unwrap();
        assert_eq!(session.progress(), Some((0, 2)));
        assert_eq!(session.session_score(), ScoreEntry::default());
    }

    #[tokio::test]
    async fn test_random_mode_never_finishes() {
        let (mut session, board) = started(QuestionMode::Random).await;
        for _ in 0..10 {
            session.handle(SessionEvent::Submit).await.unwrap();
            let state = session.handle(SessionEvent::Next).await.unwrap();
            assert_eq!(state, &SessionState::AwaitingSubmit { selection: None });
            let (index, len) = session.progress().unwrap();
            assert!(index < len);
        }
        assert_eq!(board.player_score("Luke", "Alice").await.attempted, 10);
    }

    #[test]
    fn test_question_mode_from_str() {
        assert_eq!("Random".parse::<QuestionMode>(), Ok(QuestionMode::Random));
        assert_eq!(" sequential ".parse::<QuestionMode>(), Ok(QuestionMode::Sequential));
        assert!("shuffle".parse::<QuestionMode>().is_err());
    }
}
