use std::path::Path;

use super::TextExtractor;
use crate::error::ExtractError;

/// 纯文本题库（PDF 的文本导出）
///
/// 换页符 `\x0C` 按换行处理
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_lines(&self, _path: &Path, content: &[u8]) -> Result<Vec<String>, ExtractError> {
        let text = String::from_utf8_lossy(content);
        Ok(text
            .split(|c: char| c == '\n' || c == '\x0C')
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect())
    }
}
