//! 日志工具模块
//!
//! 提供日志初始化、运行日志文件和输出格式化的辅助函数

use std::fs;
use std::io::Write;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 设置了 `RUST_LOG` 时以其为准，否则为 `info`（详细模式下为 `debug`）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化运行日志文件（写入带时间戳的标题）
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n答题日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 向运行日志文件追加一段内容
pub fn append_to_log_file(log_file_path: &str, section: &str, body: &str) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(
        file,
        "[{}] {}\n{}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        section,
        body
    )?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(quiz_folder: &str, mode: &str) {
    info!("{}", "=".repeat(60));
    info!("📖 选择题测验启动");
    info!("📁 题库目录: {}", quiz_folder);
    info!("🔀 出题方式: {}", mode);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("耶稣降生在伯利恒", 4), "耶稣降生...");
    }

    #[test]
    fn test_log_file_header_and_append() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path_str = file.path().to_string_lossy().to_string();

        init_log_file(&path_str).unwrap();
        append_to_log_file(&path_str, "排行榜", "{}").unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert!(content.starts_with(&"=".repeat(60)));
        assert!(content.contains("排行榜"));
    }
}
