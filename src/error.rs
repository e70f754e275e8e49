use std::path::PathBuf;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("文本提取错误: {0}")]
    Extract(#[from] ExtractError),
    #[error("加载错误: {0}")]
    Load(#[from] LoadError),
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// 文本提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 文件不存在
    #[error("文件不存在: {}", .path.display())]
    NotFound { path: PathBuf },
    /// 读取文件失败
    #[error("读取文件失败 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// PDF 无法打开或解析
    #[error("无法打开PDF ({}): {message}", .path.display())]
    Pdf { path: PathBuf, message: String },
    /// 不支持的文件格式
    #[error("不支持的文件格式: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// 题库加载错误
#[derive(Debug, Error)]
pub enum LoadError {
    /// 目录不存在
    #[error("目录不存在: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },
    /// 读取目录失败
    #[error("无法读取目录 ({}): {source}", .path.display())]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 会话状态机错误（状态保持不变）
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// 名字为空
    #[error("名字不能为空")]
    EmptyName,
    /// 测验不存在
    #[error("测验不存在: {quiz_id}")]
    UnknownQuiz { quiz_id: String },
    /// 测验没有题目
    #[error("测验 {quiz_id} 没有可用的题目")]
    NoQuestions { quiz_id: String },
    /// 选项下标越界
    #[error("选项 {index} 超出范围 [0, {max_index}]")]
    ChoiceOutOfRange { index: usize, max_index: usize },
    /// 当前状态不接受该事件
    #[error("状态 {state} 不接受事件 {event}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("TOML解析失败 ({}): {source}", .path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, AppError>;
