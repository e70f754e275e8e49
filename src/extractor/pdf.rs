use std::path::Path;

use lopdf::Document;
use tracing::debug;

use super::TextExtractor;
use crate::error::ExtractError;

/// 基于 lopdf 的 PDF 文本提取
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_lines(&self, path: &Path, content: &[u8]) -> Result<Vec<String>, ExtractError> {
        let pdf_error = |message: String| ExtractError::Pdf {
            path: path.to_path_buf(),
            message,
        };

        let doc = Document::load_mem(content).map_err(|e| pdf_error(e.to_string()))?;

        let mut lines = Vec::new();
        // get_pages() 是 BTreeMap，按页码顺序遍历
        for page_number in doc.get_pages().keys() {
            let text = doc
                .extract_text(&[*page_number])
                .map_err(|e| pdf_error(format!("第 {} 页: {}", page_number, e)))?;
            lines.extend(text.lines().map(str::to_string));
        }

        debug!("{}: 提取到 {} 行文本", path.display(), lines.len());
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let result = PdfTextExtractor.extract_lines(Path::new("broken.pdf"), b"not a pdf");
        assert!(matches!(result, Err(ExtractError::Pdf { .. })));
    }
}
