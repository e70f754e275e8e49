//! 题库加载服务 - 业务能力层
//!
//! 负责"发现文档 → 提取文本 → 解析题目 → 组装目录"，
//! 并按文档内容的 SHA-256 缓存解析结果

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{ExtractError, LoadError};
use crate::extractor::{self, TextExtractor};
use crate::models::{Question, QuestionSet, QuizCatalog};
use crate::parser;

/// 题库文件命名约定：`[序号_]<书名>_MC_Questions.pdf`
static FILE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+_)?([A-Za-z][A-Za-z ]*)_MC_Questions\.(?i:pdf|txt)$").unwrap()
});

/// 从文件名推导测验标识，不符合命名约定时返回 `None`
///
/// `03_Luke_MC_Questions.pdf` → `Luke`
pub fn quiz_id_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let caps = FILE_NAME_RE.captures(file_name)?;
    Some(title_case(caps.get(1)?.as_str()))
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 扫描目录，返回符合命名约定的文档（按文件名排序）
pub async fn discover(folder: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !tokio::fs::try_exists(folder).await.unwrap_or(false) {
        return Err(LoadError::DirectoryNotFound {
            path: folder.to_path_buf(),
        });
    }

    let read_dir_failed = |source| LoadError::ReadDirFailed {
        path: folder.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(folder).await.map_err(read_dir_failed)?;
    let mut documents = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_dir_failed)? {
        let path = entry.path();
        if path.is_file() && quiz_id_from_path(&path).is_some() {
            documents.push(path);
        }
    }

    documents.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(documents)
}

/// 缓存命中统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

struct CachedDocument {
    digest: [u8; 32],
    questions: Arc<Vec<Question>>,
}

/// 题库加载器
///
/// 职责：
/// - 每个文档单独提取和解析，单个文档失败只跳过该文档
/// - 文档内容不变时复用缓存，内容变化时重新解析
/// - 组装 `QuizCatalog`（含 `"All"` 合并题库）
pub struct QuizLoader {
    shuffle_questions: bool,
    extractor: Option<Arc<dyn TextExtractor>>,
    cache: HashMap<PathBuf, CachedDocument>,
    stats: CacheStats,
}

impl QuizLoader {
    /// 创建加载器，按扩展名选择提取器
    pub fn new(shuffle_questions: bool) -> Self {
        Self {
            shuffle_questions,
            extractor: None,
            cache: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// 所有文档都使用指定的提取器
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// 扫描目录并加载全部题库
    pub async fn load_folder(&mut self, folder: &Path) -> Result<QuizCatalog, LoadError> {
        info!("📁 正在扫描题库目录: {}", folder.display());
        let documents = discover(folder).await?;
        if documents.is_empty() {
            warn!("⚠️ 目录 {} 中没有找到题库文件", folder.display());
        }
        Ok(self.load(&documents).await)
    }

    /// 加载给定的文档集合
    ///
    /// 单个文档失败不会中断整批加载；解析出 0 道题的文档保留为空集合。
    pub async fn load(&mut self, paths: &[PathBuf]) -> QuizCatalog {
        let mut sets: Vec<QuestionSet> = Vec::new();

        for path in paths {
            let Some(quiz_id) = quiz_id_from_path(path) else {
                warn!("⚠️ 文件名不符合命名约定，跳过: {}", path.display());
                continue;
            };

            let questions = match self.load_document(path).await {
                Ok(questions) => questions,
                Err(e) => {
                    warn!("⚠️ 加载文件失败 {}: {}", path.display(), e);
                    continue;
                }
            };

            if questions.is_empty() {
                warn!("⚠️ {} 没有解析出任何题目", quiz_id);
            } else {
                info!("✓ {}: 成功加载 {} 道题目", quiz_id, questions.len());
            }

            let mut questions = questions.as_ref().clone();
            if self.shuffle_questions {
                questions.shuffle(&mut rand::thread_rng());
            }

            if let Some(pos) = sets.iter().position(|s| s.quiz_id == quiz_id) {
                warn!("⚠️ 测验标识 {} 重复，使用 {}", quiz_id, path.display());
                sets.remove(pos);
            }
            sets.push(QuestionSet::new(quiz_id, questions));
        }

        QuizCatalog::build(sets, &mut rand::thread_rng())
    }

    /// 加载单个文档的题目（带缓存）
    async fn load_document(&mut self, path: &Path) -> Result<Arc<Vec<Question>>, ExtractError> {
        let content = extractor::read_document_async(path).await?;
        let digest: [u8; 32] = Sha256::digest(&content).into();

        if let Some(cached) = self.cache.get(path) {
            if cached.digest == digest {
                debug!("缓存命中: {}", path.display());
                self.stats.hits += 1;
                return Ok(cached.questions.clone());
            }
            debug!("文件内容已变化，重新解析: {}", path.display());
        }
        self.stats.misses += 1;

        let lines = match &self.extractor {
            Some(extractor) => extractor.extract_lines(path, &content)?,
            None => extractor::extractor_for(path)?.extract_lines(path, &content)?,
        };

        let report = parser::parse_with_report(&lines);
        if report.dropped > 0 {
            debug!(
                "{}: 丢弃了 {} 个格式不完整的候选题目",
                path.display(),
                report.dropped
            );
        }

        let questions = Arc::new(report.questions);
        self.cache.insert(
            path.to_path_buf(),
            CachedDocument {
                digest,
                questions: questions.clone(),
            },
        );
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_id_from_path() {
        assert_eq!(
            quiz_id_from_path(Path::new("03_Luke_MC_Questions.pdf")).as_deref(),
            Some("Luke")
        );
        assert_eq!(
            quiz_id_from_path(Path::new("/tmp/quiz/acts_MC_Questions.PDF")).as_deref(),
            Some("Acts")
        );
        assert_eq!(
            quiz_id_from_path(Path::new("first JOHN_MC_Questions.txt")).as_deref(),
            Some("First John")
        );
        assert_eq!(quiz_id_from_path(Path::new("Luke_Questions.pdf")), None);
        assert_eq!(quiz_id_from_path(Path::new("03_Luke_MC_Questions.docx")), None);
    }

    #[tokio::test]
    async fn test_discover_missing_folder() {
        let result = discover(Path::new("no/such/quiz/folder")).await;
        assert!(matches!(result, Err(LoadError::DirectoryNotFound { .. })));
    }
}
