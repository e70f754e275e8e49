//! # Bible Quiz
//!
//! 从 PDF 题库中提取选择题，按玩家逐题作答并维护排行榜
//!
//! ## 架构设计
//!
//! ### ① 基础设施层
//! - `extractor/` - 文档 → 文本行（lopdf / 纯文本）
//! - `parser/` - 文本行 → `Question`，单次前向扫描
//!
//! ### ② 业务能力层（Services）
//! - `QuizLoader` - 发现题库文件、按内容缓存解析结果、组装 `QuizCatalog`
//! - `Leaderboard` - 进程内共享的成绩表
//!
//! ### ③ 流程层（Workflow）
//! - `QuizSession` - 单个访客的答题状态机
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 终端前端

pub mod config;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod services;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, Result};
pub use models::{Question, QuestionSet, QuizCatalog, ScoreEntry};
pub use orchestrator::App;
pub use parser::parse;
pub use services::{Leaderboard, QuizLoader};
pub use workflow::{QuestionMode, QuizSession, SessionEvent, SessionState};
