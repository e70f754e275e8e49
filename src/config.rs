use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;
use crate::workflow::QuestionMode;

/// 默认配置文件名
pub const CONFIG_FILE: &str = "quiz.toml";

/// 程序配置文件
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题库文件所在目录
    pub quiz_folder: PathBuf,
    /// 加载时是否打乱每个测验的题目顺序
    pub shuffle_questions: bool,
    /// 出题方式（顺序 / 随机）
    pub question_mode: QuestionMode,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 排行榜显示的行数
    pub leaderboard_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiz_folder: PathBuf::from("."),
            shuffle_questions: true,
            question_mode: QuestionMode::Sequential,
            verbose_logging: false,
            output_log_file: "quiz_log.txt".to_string(),
            leaderboard_size: 10,
        }
    }
}

impl Config {
    /// 读取 `quiz.toml`（如果存在），再用环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let base = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// 用给定的键值来源覆盖配置，无法解析的值保持原样
    pub fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            quiz_folder: lookup("QUIZ_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(self.quiz_folder),
            shuffle_questions: parse_var(&lookup, "SHUFFLE_QUESTIONS", self.shuffle_questions),
            question_mode: parse_var(&lookup, "QUESTION_MODE", self.question_mode),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", self.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            leaderboard_size: parse_var(&lookup, "LEADERBOARD_SIZE", self.leaderboard_size),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, current: T) -> T {
    match lookup(key) {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("⚠️ 环境变量 {} 的值 '{}' 无法解析，使用当前值", key, value);
            current
        }),
        None => current,
    }
}
