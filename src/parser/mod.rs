//! PDF 文本 → 选择题 解析

pub mod patterns;
pub mod question_parser;

pub use question_parser::{parse, parse_with_report, ParseReport};
