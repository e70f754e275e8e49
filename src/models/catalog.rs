//! 测验目录
//!
//! 测验标识 → 题目集合，外加由所有非空集合合并而成的 `"All"` 题库

use rand::seq::SliceRandom;
use rand::Rng;

use super::question::{Question, QuestionSet};

/// 合并题库的标识
pub const ALL_QUIZ_ID: &str = "All";

#[derive(Debug, Clone, Default)]
pub struct QuizCatalog {
    sets: Vec<QuestionSet>,
}

impl QuizCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由各文档的题目集合构造目录
    ///
    /// 至少有两个非空集合时追加打乱顺序的 `"All"` 题库，排在最后。
    pub fn build<R: Rng + ?Sized>(sets: Vec<QuestionSet>, rng: &mut R) -> Self {
        let mut catalog = Self::new();
        for set in sets {
            catalog.insert(set);
        }

        let non_empty = catalog.sets.iter().filter(|s| !s.is_empty()).count();
        if non_empty >= 2 {
            let mut pool: Vec<Question> = catalog
                .sets
                .iter()
                .flat_map(|s| s.questions.iter().cloned())
                .collect();
            pool.shuffle(rng);
            catalog.insert(QuestionSet::new(ALL_QUIZ_ID, pool));
        }

        catalog
    }

    /// 插入集合；同名标识后写入者覆盖先写入者，位置不变
    pub fn insert(&mut self, set: QuestionSet) -> Option<QuestionSet> {
        match self.sets.iter_mut().find(|s| s.quiz_id == set.quiz_id) {
            Some(existing) => Some(std::mem::replace(existing, set)),
            None => {
                self.sets.push(set);
                None
            }
        }
    }

    pub fn get(&self, quiz_id: &str) -> Option<&QuestionSet> {
        self.sets.iter().find(|s| s.quiz_id == quiz_id)
    }

    pub fn contains(&self, quiz_id: &str) -> bool {
        self.get(quiz_id).is_some()
    }

    /// 按目录顺序的测验标识
    pub fn quiz_ids(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|s| s.quiz_id.as_str())
    }

    pub fn sets(&self) -> &[QuestionSet] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// 所有集合都没有题目（或目录为空）
    pub fn has_no_questions(&self) -> bool {
        self.sets.iter().all(|s| s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Letter;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(prompt: &str) -> Question {
        Question::new(
            prompt.to_string(),
            [
                "A. one".to_string(),
                "B. two".to_string(),
                "C. three".to_string(),
                "D. four".to_string(),
            ],
            Letter::A,
        )
    }

    #[test]
    fn test_all_pool_requires_two_non_empty_sets() {
        let mut rng = StdRng::seed_from_u64(7);
        let catalog = QuizCatalog::build(
            vec![
                QuestionSet::new("Luke", vec![question("q1")]),
                QuestionSet::new("Acts", vec![]),
            ],
            &mut rng,
        );
        assert!(!catalog.contains(ALL_QUIZ_ID));
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("Acts").is_some_and(|s| s.is_empty()));
    }

    #[test]
    fn test_all_pool_is_concatenation_listed_last() {
        let mut rng = StdRng::seed_from_u64(7);
        let catalog = QuizCatalog::build(
            vec![
                QuestionSet::new("Luke", vec![question("q1"), question("q2")]),
                QuestionSet::new("Acts", vec![question("q3")]),
            ],
            &mut rng,
        );
        let ids: Vec<&str> = catalog.quiz_ids().collect();
        assert_eq!(ids, vec!["Luke", "Acts", ALL_QUIZ_ID]);

        let mut prompts: Vec<&str> = catalog
            .get(ALL_QUIZ_ID)
            .unwrap()
            .questions
            .iter()
            .map(|q| q.prompt.as_str())
            .collect();
        prompts.sort();
        assert_eq!(prompts, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_insert_is_last_write_wins() {
        let mut catalog = QuizCatalog::new();
        catalog.insert(QuestionSet::new("Luke", vec![question("old")]));
        let replaced = catalog.insert(QuestionSet::new("Luke", vec![question("new")]));
        assert!(replaced.is_some());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Luke").unwrap().questions[0].prompt, "new");
    }

    #[test]
    fn test_empty_catalog_has_no_questions() {
        assert!(QuizCatalog::new().has_no_questions());
    }
}
