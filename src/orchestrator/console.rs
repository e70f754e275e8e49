//! 终端答题 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：运行日志、加载题库目录、创建排行榜
//! 2. **输入解析**：把终端输入翻译成 `SessionEvent`
//! 3. **输出渲染**：根据会话状态打印题目、结果和排行榜
//! 4. **收尾**：把所有测验的成绩快照写入运行日志
//!
//! 只做调度和显示，判定逻辑全部在 `workflow::QuizSession` 中。

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::config::Config;
use crate::logger;
use crate::models::{Letter, QuizCatalog};
use crate::services::{Leaderboard, QuizLoader};
use crate::workflow::{QuestionMode, QuizSession, SessionEvent, SessionState};

/// 应用主结构
pub struct App {
    config: Config,
    catalog: Arc<QuizCatalog>,
    leaderboard: Leaderboard,
}

impl App {
    /// 初始化应用：写运行日志标题并加载题库
    pub async fn initialize(config: Config) -> Result<Self> {
        logger::init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;

        logger::log_startup(
            &config.quiz_folder.display().to_string(),
            match config.question_mode {
                QuestionMode::Sequential => "顺序",
                QuestionMode::Random => "随机",
            },
        );

        let mut loader = QuizLoader::new(config.shuffle_questions);
        let catalog = loader
            .load_folder(&config.quiz_folder)
            .await
            .with_context(|| format!("无法加载题库目录: {}", config.quiz_folder.display()))?;

        Ok(Self::with_catalog(config, catalog))
    }

    /// 使用已经加载好的目录创建应用
    pub fn with_catalog(config: Config, catalog: QuizCatalog) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
            leaderboard: Leaderboard::new(),
        }
    }

    pub fn catalog(&self) -> &QuizCatalog {
        &self.catalog
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// 在标准输入输出上运行一个答题会话
    pub async fn run(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run_with(stdin, stdout).await
    }

    /// 在给定的输入输出上运行一个答题会话
    pub async fn run_with<R, W>(&self, mut input: R, mut out: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if self.catalog.has_no_questions() {
            warn!("⚠️ 没有找到可用的题库，程序结束");
            say(&mut out, "没有可以答题的题库，请把题库文件放入目录后重新启动。\n").await?;
            return Ok(());
        }

        let mut session = QuizSession::new(
            self.catalog.clone(),
            self.leaderboard.clone(),
            self.config.question_mode,
        );

        loop {
            self.render(&session, &mut out).await?;

            let mut line = String::new();
            if input.read_line(&mut line).await? == 0 {
                break;
            }
            let line = line.trim();

            match line {
                "q" => break,
                "l" => {
                    self.render_leaderboard(session.quiz_id(), &mut out).await?;
                    continue;
                }
                _ => {}
            }

            let Some(events) = self.parse_input(session.state(), line) else {
                say(&mut out, "无法识别的输入\n").await?;
                continue;
            };
            for event in events {
                if let Err(e) = session.handle(event).await {
                    say(&mut out, &format!("⚠️ {}\n", e)).await?;
                    break;
                }
            }
        }

        self.save_snapshot().await?;
        Ok(())
    }

    /// 把终端输入翻译成会话事件
    fn parse_input(&self, state: &SessionState, line: &str) -> Option<Vec<SessionEvent>> {
        if let Some(target) = line.strip_prefix("s ") {
            if !matches!(
                state,
                SessionState::AwaitingName | SessionState::AwaitingSelection
            ) {
                return Some(vec![SessionEvent::SwitchQuiz(self.resolve_quiz(target))]);
            }
        }

        match state {
            SessionState::AwaitingName => Some(vec![SessionEvent::EnterName(line.to_string())]),
            SessionState::AwaitingSelection => {
                Some(vec![SessionEvent::SelectQuiz(self.resolve_quiz(line))])
            }
            SessionState::AwaitingSubmit { .. } => {
                let mut chars = line.chars();
                let letter = chars
                    .next()
                    .and_then(|c| Letter::from_char(c.to_ascii_uppercase()))?;
                if chars.next().is_some() {
                    return None;
                }
                Some(vec![SessionEvent::Choose(letter.index()), SessionEvent::Submit])
            }
            SessionState::ShowingResult { .. } => match line {
                "" | "n" => Some(vec![SessionEvent::Next]),
                _ => None,
            },
            SessionState::Finished => match line {
                "r" => Some(vec![SessionEvent::Restart]),
                _ => None,
            },
        }
    }

    /// 序号（从 1 开始）或不区分大小写的名称
    fn resolve_quiz(&self, input: &str) -> String {
        let input = input.trim();
        if let Ok(n) = input.parse::<usize>() {
            if let Some(id) = n.checked_sub(1).and_then(|i| self.catalog.quiz_ids().nth(i)) {
                return id.to_string();
            }
        }
        self.catalog
            .quiz_ids()
            .find(|id| id.eq_ignore_ascii_case(input))
            .unwrap_or(input)
            .to_string()
    }

    async fn render<W: AsyncWrite + Unpin>(&self, session: &QuizSession, out: &mut W) -> Result<()> {
        let text = match session.state() {
            SessionState::AwaitingName => "请输入你的名字:\n".to_string(),
            SessionState::AwaitingSelection => {
                let mut text = String::from("可选的测验:\n");
                for (i, set) in self.catalog.sets().iter().enumerate() {
                    text.push_str(&format!("  {}) {} ({} 题)\n", i + 1, set.quiz_id, set.len()));
                }
                text.push_str("请选择测验（序号或名称）:\n");
                text
            }
            SessionState::AwaitingSubmit { .. } => self.render_question(session).await,
            SessionState::ShowingResult { outcome } => {
                let mut text = if outcome.is_correct {
                    "✅ 正确!\n".to_string()
                } else {
                    format!("❌ 错误。\n正确答案: {}\n", outcome.correct_answer)
                };
                text.push_str("回车进入下一题（l 排行榜, s <测验> 切换, q 退出）\n");
                text
            }
            SessionState::Finished => format!(
                "🏁 测验完成! 本次得分: {}\nr 重新开始, s <测验> 切换, l 排行榜, q 退出\n",
                session.session_score()
            ),
        };
        say(out, &text).await
    }

    async fn render_question(&self, session: &QuizSession) -> String {
        let (Some(player), Some(quiz_id), Some(question)) = (
            session.player(),
            session.quiz_id(),
            session.current_question(),
        ) else {
            return String::new();
        };

        let score = self.leaderboard.player_score(quiz_id, player).await;
        let mut text = format!(
            "\n{} — 得分: {}/{} | 正确率: {}\n",
            player,
            score.correct,
            score.attempted,
            score.percent_label()
        );
        if let (QuestionMode::Sequential, Some((index, total))) = (session.mode(), session.progress()) {
            text.push_str(&format!("[{}] 第 {}/{} 题\n", quiz_id, index + 1, total));
        }
        text.push_str(&format!("{}\n", question.prompt));
        for choice in &question.choices {
            text.push_str(&format!("  {}\n", choice));
        }
        text.push_str("输入 A-D 作答（l 排行榜, s <测验> 切换, q 退出）:\n");
        text
    }

    async fn render_leaderboard<W: AsyncWrite + Unpin>(
        &self,
        quiz_id: Option<&str>,
        out: &mut W,
    ) -> Result<()> {
        let Some(quiz_id) = quiz_id else {
            return say(out, "请先选择测验\n").await;
        };

        let standings = self.leaderboard.standings(quiz_id).await;
        if standings.is_empty() {
            return say(out, "还没有成绩，快来做第一个吧!\n").await;
        }

        let mut text = format!("🏆 排行榜 - {}\n", quiz_id);
        for s in standings.iter().take(self.config.leaderboard_size) {
            let percent = s
                .percent
                .map(|p| format!("{:.1}%", p))
                .unwrap_or_else(|| "-".to_string());
            text.push_str(&format!(
                "  {:>2}. {:<16} {:>3}/{:<3} {}\n",
                s.rank, s.player, s.correct, s.attempted, percent
            ));
        }
        say(out, &text).await
    }

    /// 把成绩快照写入运行日志
    async fn save_snapshot(&self) -> crate::Result<()> {
        let snapshot = self.leaderboard.snapshot_all().await;
        let body = serde_json::to_string_pretty(&snapshot)?;
        logger::append_to_log_file(&self.config.output_log_file, "成绩快照", &body)?;
        info!("日志已保存至: {}", self.config.output_log_file);
        Ok(())
    }
}

async fn say<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}
