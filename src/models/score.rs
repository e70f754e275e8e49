use serde::{Deserialize, Serialize};

/// 某玩家在某测验中的成绩（`correct <= attempted`）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub attempted: u32,
    pub correct: u32,
}

impl ScoreEntry {
    /// 记录一次作答
    pub fn record(&mut self, is_correct: bool) {
        self.attempted += 1;
        if is_correct {
            self.correct += 1;
        }
    }

    /// 正确率，未作答时为 `None`
    pub fn accuracy(&self) -> Option<f64> {
        if self.attempted == 0 {
            None
        } else {
            Some(f64::from(self.correct) / f64::from(self.attempted))
        }
    }

    /// 百分比，保留一位小数
    pub fn percent(&self) -> Option<f64> {
        self.accuracy().map(|a| (a * 1000.0).round() / 10.0)
    }

    /// 显示用的百分比文本，如 `66.7%`，未作答时为 `-`
    pub fn percent_label(&self) -> String {
        match self.accuracy() {
            Some(a) => format!("{:.1}%", a * 100.0),
            None => "-".to_string(),
        }
    }
}

impl std::fmt::Display for ScoreEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} ({})",
            self.correct,
            self.attempted,
            self.percent_label()
        )
    }
}

/// 排行榜中的一行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub rank: usize,
    pub player: String,
    pub correct: u32,
    pub attempted: u32,
    pub percent: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_attempts_and_correct() {
        let mut entry = ScoreEntry::default();
        entry.record(true);
        entry.record(false);
        entry.record(true);
        assert_eq!(entry.attempted, 3);
        assert_eq!(entry.correct, 2);
    }

    #[test]
    fn test_percent_rounds_to_one_decimal() {
        let entry = ScoreEntry {
            attempted: 3,
            correct: 2,
        };
        assert_eq!(entry.percent(), Some(66.7));
        assert_eq!(entry.percent_label(), "66.7%");
        assert_eq!(entry.to_string(), "2/3 (66.7%)");
    }

    #[test]
    fn test_no_attempts_has_no_accuracy() {
        let entry = ScoreEntry::default();
        assert_eq!(entry.accuracy(), None);
        assert_eq!(entry.percent_label(), "-");
    }
}
