//! 行分类规则
//!
//! 所有判断都作用于已去除首尾空白的单行文本

use once_cell::sync::Lazy;
use phf::phf_set;
use regex::Regex;

use crate::models::Letter;

/// 题号行：1-3 位数字 + `.` + 空白 + 题干开头
static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3})\.\s+(.*)$").unwrap());

/// 页码残留：整行只有数字
static PAGE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// 独立的选项起始行：`A.` 等，后面不能有其他内容
static OPENER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-D])\.$").unwrap());

/// 答案标记行：`A:B:Lk:`，第三段是不校验的出处代码
static ANSWER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-D]):([^:\s]+):([A-Za-z]+):").unwrap());

/// 答案标记中间段允许的取值
static ANSWER_TAGS: phf::Set<&'static str> = phf_set! { "B", "I", "A" };

/// 匹配题号行，返回题号之后的文本
pub fn match_header(line: &str) -> Option<&str> {
    HEADER_RE
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim())
}

pub fn is_page_number(line: &str) -> bool {
    PAGE_NUMBER_RE.is_match(line)
}

/// 匹配任意字母的选项起始行
pub fn match_opener(line: &str) -> Option<Letter> {
    OPENER_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
        .and_then(Letter::from_char)
}

pub fn is_opener_for(line: &str, letter: Letter) -> bool {
    match_opener(line) == Some(letter)
}

/// 匹配答案标记行，返回正确选项字母
pub fn match_answer(line: &str) -> Option<Letter> {
    let caps = ANSWER_RE.captures(line)?;
    if !ANSWER_TAGS.contains(caps.get(2)?.as_str()) {
        return None;
    }
    caps.get(1)?.as_str().chars().next().and_then(Letter::from_char)
}
