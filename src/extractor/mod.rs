//! 文本提取 - 基础设施层
//!
//! 把题库文档变成按阅读顺序排列的文本行（所有页面首尾相接）。
//! 提取器只认识字节和行，不认识题目。

pub mod pdf;
pub mod plain_text;

use std::path::Path;

use crate::error::ExtractError;

pub use pdf::PdfTextExtractor;
pub use plain_text::PlainTextExtractor;

/// 文本提取能力
pub trait TextExtractor: Send + Sync {
    /// 从文档内容中提取全部文本行
    ///
    /// `path` 只用于错误信息
    fn extract_lines(&self, path: &Path, content: &[u8]) -> Result<Vec<String>, ExtractError>;
}

/// 按扩展名选择提取器
pub fn extractor_for(path: &Path) -> Result<&'static dyn TextExtractor, ExtractError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => Ok(&PdfTextExtractor),
        Some("txt") => Ok(&PlainTextExtractor),
        _ => Err(ExtractError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// 读取文件并提取文本行；文件不存在或无法打开时报错
pub fn extract_file(path: &Path) -> Result<Vec<String>, ExtractError> {
    let extractor = extractor_for(path)?;
    let content = read_document(path)?;
    extractor.extract_lines(path, &content)
}

/// 读取文档字节，区分"不存在"与其他 IO 错误
pub fn read_document(path: &Path) -> Result<Vec<u8>, ExtractError> {
    std::fs::read(path).map_err(|source| read_error(path, source))
}

/// 异步读取文档字节
pub async fn read_document_async(path: &Path) -> Result<Vec<u8>, ExtractError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| read_error(path, source))
}

fn read_error(path: &Path, source: std::io::Error) -> ExtractError {
    if source.kind() == std::io::ErrorKind::NotFound {
        ExtractError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        ExtractError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_for_dispatches_on_extension() {
        assert!(extractor_for(Path::new("03_Luke_MC_Questions.pdf")).is_ok());
        assert!(extractor_for(Path::new("Luke_MC_Questions.TXT")).is_ok());
        assert!(matches!(
            extractor_for(Path::new("Luke_MC_Questions.docx")),
            Err(ExtractError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_extract_missing_file_fails_loudly() {
        let result = extract_file(Path::new("definitely/not/here/Luke_MC_Questions.txt"));
        assert!(matches!(result, Err(ExtractError::NotFound { .. })));
    }
}
