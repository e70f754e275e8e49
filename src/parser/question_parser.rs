//! 题目解析器
//!
//! 对 PDF 提取出的文本行做一次前向扫描（不回溯），恢复出结构化的选择题。
//!
//! 源文本的结构：
//!
//! ```text
//! 3. What town?        <- 题号行，题号本身丢弃
//! A.                   <- 独立的选项起始行
//! Nazareth
//! B.
//! Bethlehem
//! ...
//! A:B:Lk:              <- 答案标记行，结束本题
//! ```
//!
//! 空行和页码行可能出现在任何位置。缺少选项或答案标记的题目直接丢弃，
//! 从当前位置继续寻找下一道题。

use tracing::debug;

use super::patterns::{is_opener_for, is_page_number, match_answer, match_header, match_opener};
use crate::models::{Letter, Question};

/// 解析结果（含丢弃计数）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub questions: Vec<Question>,
    /// 找到题号行但未能组成完整题目的候选数
    pub dropped: usize,
}

/// 解析文本行，返回按文档顺序排列的题目
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Vec<Question> {
    parse_with_report(lines).questions
}

/// 解析文本行，同时统计被丢弃的候选
pub fn parse_with_report<S: AsRef<str>>(lines: &[S]) -> ParseReport {
    let lines: Vec<&str> = lines.iter().map(|l| l.as_ref().trim()).collect();
    let mut scanner = Scanner { lines, pos: 0 };
    let mut report = ParseReport::default();

    while let Some(first_fragment) = scanner.seek_header() {
        match scanner.read_candidate(first_fragment) {
            Some(question) => report.questions.push(question),
            None => report.dropped += 1,
        }
    }

    debug!(
        "解析完成: {} 道题目, 丢弃 {} 个候选",
        report.questions.len(),
        report.dropped
    );
    report
}

struct Scanner<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn current(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// 前进到下一个题号行并越过它，返回题号之后的文本
    fn seek_header(&mut self) -> Option<&'a str> {
        while let Some(line) = self.current() {
            self.pos += 1;
            if let Some(text) = match_header(line) {
                return Some(text);
            }
        }
        None
    }

    /// 从题号行之后读取一道题；结构不完整时返回 `None`
    fn read_candidate(&mut self, first_fragment: &'a str) -> Option<Question> {
        let prompt = self.read_prompt(first_fragment);

        let mut choices: [Option<String>; 4] = Default::default();
        for letter in Letter::ALL {
            match self.current() {
                Some(line) if is_opener_for(line, letter) => {
                    self.pos += 1;
                    choices[letter.index()] = Some(self.read_choice(letter));
                }
                _ => {}
            }
        }

        let correct = match self.current().and_then(match_answer) {
            Some(letter) => {
                self.pos += 1;
                Some(letter)
            }
            None => None,
        };

        let [Some(a), Some(b), Some(c), Some(d)] = choices else {
            debug!("丢弃候选（选项不足 4 个）: {}", prompt);
            return None;
        };
        let Some(correct) = correct else {
            debug!("丢弃候选（缺少答案标记）: {}", prompt);
            return None;
        };

        Some(Question::new(prompt, [a, b, c, d], correct))
    }

    /// 收集题干，跳过空行和页码
    ///
    /// 遇到任何起始行、答案标记或下一个题号行即停止；不是 `A.` 时本题随后被丢弃，
    /// 下一个题号行留给 `seek_header`。
    fn read_prompt(&mut self, first_fragment: &'a str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !first_fragment.is_empty() {
            parts.push(first_fragment);
        }

        while let Some(line) = self.current() {
            if is_block_boundary(line) {
                break;
            }
            if !line.is_empty() && !is_page_number(line) {
                parts.push(line);
            }
            self.pos += 1;
        }

        parts.join(" ")
    }

    /// 收集一个选项的正文，直到下一个起始行、答案标记或题号行
    fn read_choice(&mut self, letter: Letter) -> String {
        let mut parts: Vec<&str> = Vec::new();

        while let Some(line) = self.current() {
            if is_block_boundary(line) {
                break;
            }
            if !line.is_empty() {
                parts.push(line);
            }
            self.pos += 1;
        }

        // 纯数字行只在正文全是数字时保留（答案本身就是数字）；
        // 代价是纯数字答案中夹杂的页码会被并入正文
        if parts.iter().any(|p| !is_page_number(p)) {
            parts.retain(|p| !is_page_number(p));
        }

        format!("{}. {}", letter, parts.join(" "))
            .trim_end()
            .to_string()
    }
}

/// 选项起始行、答案标记或题号行
fn is_block_boundary(line: &str) -> bool {
    match_opener(line).is_some() || match_answer(line).is_some() || match_header(line).is_some()
}
