//! 编排层（Orchestration Layer）
//!
//! ```text
//! orchestrator::App（终端输入输出）
//!     ↓
//! workflow::QuizSession（单个访客的状态机）
//!     ↓
//! services（能力层：quiz_loader / leaderboard）
//!     ↓
//! parser + extractor（文本 → 题目）
//! ```

pub mod console;

pub use console::App;
