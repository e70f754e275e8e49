//! 排行榜服务 - 业务能力层
//!
//! 进程内共享的成绩表：测验标识 → 玩家 → 成绩。
//! 所有读写都在同一把锁内完成，并发提交不会丢失更新。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::models::{ScoreEntry, Standing};

type Board = HashMap<String, HashMap<String, ScoreEntry>>;

/// 排行榜句柄
///
/// `clone()` 得到的是同一份数据的句柄，显式传给需要它的会话。
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    inner: Arc<Mutex<Board>>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次作答，首次作答时自动创建记录，返回更新后的成绩
    pub async fn record_answer(&self, quiz_id: &str, player: &str, is_correct: bool) -> ScoreEntry {
        let mut board = self.inner.lock().await;
        let entry = board
            .entry(quiz_id.to_string())
            .or_default()
            .entry(player.to_string())
            .or_default();
        entry.record(is_correct);

        debug!(
            "记录成绩: [{}] {} {} → {}",
            quiz_id,
            player,
            if is_correct { "✓" } else { "✗" },
            entry
        );
        *entry
    }

    /// 某个测验的成绩快照（只读副本）
    pub async fn snapshot(&self, quiz_id: &str) -> HashMap<String, ScoreEntry> {
        let board = self.inner.lock().await;
        board.get(quiz_id).cloned().unwrap_or_default()
    }

    /// 所有测验的成绩快照
    pub async fn snapshot_all(&self) -> HashMap<String, HashMap<String, ScoreEntry>> {
        self.inner.lock().await.clone()
    }

    /// 某玩家在某测验中的成绩，没有记录时为零
    pub async fn player_score(&self, quiz_id: &str, player: &str) -> ScoreEntry {
        let board = self.inner.lock().await;
        board
            .get(quiz_id)
            .and_then(|players| players.get(player))
            .copied()
            .unwrap_or_default()
    }

    /// 排名：正确率降序（未作答排最后），作答数降序，玩家名升序
    pub async fn standings(&self, quiz_id: &str) -> Vec<Standing> {
        rank(self.snapshot(quiz_id).await)
    }
}

/// 对成绩快照排名
pub fn rank(snapshot: HashMap<String, ScoreEntry>) -> Vec<Standing> {
    let mut rows: Vec<(String, ScoreEntry)> = snapshot.into_iter().collect();
    rows.sort_by(|(name_a, a), (name_b, b)| {
        let acc_a = a.accuracy().unwrap_or(-1.0);
        let acc_b = b.accuracy().unwrap_or(-1.0);
        acc_b
            .total_cmp(&acc_a)
            .then_with(|| b.attempted.cmp(&a.attempted))
            .then_with(|| name_a.cmp(name_b))
    });

    rows.into_iter()
        .enumerate()
        .map(|(i, (player, entry))| Standing {
            rank: i + 1,
            player,
            correct: entry.correct,
            attempted: entry.attempted,
            percent: entry.percent(),
        })
        .collect()
}
