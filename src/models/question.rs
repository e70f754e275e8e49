/// 选项字母（固定顺序 A、B、C、D）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    /// 按显示顺序排列的全部字母
    pub const ALL: [Letter; 4] = [Letter::A, Letter::B, Letter::C, Letter::D];

    pub fn as_char(self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
        }
    }

    /// 在 `choices` 中的下标
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            _ => None,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 单道选择题
///
/// 只能由解析器构造：`choices` 恰好 4 项且按 A-D 排列，`correct` 一定是其中一项。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub choices: [String; 4],
    pub correct: String,
}

impl Question {
    /// 由已收集齐的四个选项构造题目
    pub fn new(prompt: String, choices: [String; 4], correct: Letter) -> Self {
        let correct = choices[correct.index()].clone();
        Self {
            prompt,
            choices,
            correct,
        }
    }

    /// 正确答案对应的字母
    pub fn correct_letter(&self) -> Option<Letter> {
        self.choices
            .iter()
            .position(|c| *c == self.correct)
            .and_then(Letter::from_index)
    }

    /// 按值比较所选选项与正确答案
    pub fn is_correct(&self, selection: &str) -> bool {
        selection == self.correct
    }

    /// 题干预览（日志用）
    pub fn preview(&self) -> String {
        crate::logger::truncate_text(&self.prompt, 80)
    }
}

/// 某个测验的题目集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    pub quiz_id: String,
    pub questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(quiz_id: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            quiz_id: quiz_id.into(),
            questions,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Question {
        Question::new(
            "What town?".to_string(),
            [
                "A. Nazareth".to_string(),
                "B. Bethlehem".to_string(),
                "C. Capernaum".to_string(),
                "D. Jerusalem".to_string(),
            ],
            Letter::B,
        )
    }

    #[test]
    fn test_correct_is_taken_from_choices() {
        let q = sample();
        assert_eq!(q.correct, "B. Bethlehem");
        assert_eq!(q.correct_letter(), Some(Letter::B));
    }

    #[test]
    fn test_is_correct_compares_by_value() {
        let q = sample();
        assert!(q.is_correct("B. Bethlehem"));
        assert!(!q.is_correct("B."));
        assert!(!q.is_correct("A. Nazareth"));
    }

    #[test]
    fn test_letter_round_trips_through_index() {
        for (i, letter) in Letter::ALL.iter().enumerate() {
            assert_eq!(letter.index(), i);
            assert_eq!(Letter::from_index(i), Some(*letter));
            assert_eq!(Letter::from_char(letter.as_char()), Some(*letter));
        }
        assert_eq!(Letter::from_index(4), None);
        assert_eq!(Letter::from_char('E'), None);
    }
}
