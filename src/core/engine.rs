//! 음운 변화 엔진 공개 API
//!
//! 카테고리 표와 컴파일된 규칙 목록을 보관하고, 단어마다 규칙을 파일 순서대로
//! 적용합니다. 적용 중 상태는 호출 지역 버퍼에만 있으므로 `&self`로 호출할 수 있고
//! 여러 스레드에서 읽기 전용으로 공유할 수 있습니다.

use serde::Serialize;

use super::category::CategoryTable;
use super::compiler::{compile, CompiledLine};
use super::interpreter::apply_rule;
use crate::error::RuleError;

/// 단어를 바꾼 규칙 한 줄의 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    /// 1부터 시작하는 규칙 줄 번호
    pub line: usize,
    pub before: String,
    pub after: String,
}

/// 일괄 적용 시 단어 하나의 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordResult {
    /// 입력 단어
    pub input: String,
    /// 적용 결과 (에러면 None)
    pub output: Option<String>,
    /// 에러 메시지 (성공이면 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 단어를 바꾼 규칙 기록 (`trace` 요청 시에만 채워짐)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceStep>,
}

impl WordResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// 음운 변화 규칙 엔진
#[derive(Debug, Clone, Default)]
pub struct SoundChangeEngine {
    categories: CategoryTable,
    /// `set_rules` 전에는 None
    rules: Option<Vec<CompiledLine>>,
}

impl SoundChangeEngine {
    /// 카테고리 표를 지정하여 엔진 생성
    pub fn new(categories: CategoryTable) -> Self {
        Self {
            categories,
            rules: None,
        }
    }

    /// 카테고리 표 교체
    pub fn configure(&mut self, categories: CategoryTable) {
        self.categories = categories;
    }

    /// 규칙 텍스트를 컴파일하여 현재 규칙 목록을 교체
    ///
    /// 실패하면 기존 규칙 목록은 그대로 유지됩니다.
    pub fn set_rules(&mut self, text: &str) -> Result<(), RuleError> {
        let lines = compile(text)?;
        let total = lines.len();
        self.rules = Some(lines);
        log::debug!("규칙 {}줄 컴파일 (적용 규칙 {}개)", total, self.rule_count());
        Ok(())
    }

    /// 주석이 아닌 규칙 수 (`set_rules` 전이면 0)
    pub fn rule_count(&self) -> usize {
        self.rules.as_deref().map_or(0, |lines| {
            lines
                .iter()
                .filter(|l| matches!(l, CompiledLine::Rule(_)))
                .count()
        })
    }

    /// 단어에 모든 규칙을 순서대로 적용
    ///
    /// # Examples
    /// ```
    /// use soundshift::{CategoryTable, SoundChangeEngine};
    ///
    /// let categories = CategoryTable::new()
    ///     .with('C', ["p", "t", "k"])
    ///     .with('V', ["a", "e", "i"]);
    /// let mut engine = SoundChangeEngine::new(categories);
    /// engine.set_rules("p/b/V_V").unwrap();
    /// assert_eq!(engine.apply_sound_changes("apa").unwrap(), "aba");
    /// ```
    pub fn apply_sound_changes(&self, word: &str) -> Result<String, RuleError> {
        self.run(word, |_| {})
    }

    /// 규칙을 적용하면서 단어를 바꾼 줄을 기록
    pub fn trace(&self, word: &str) -> Result<Vec<TraceStep>, RuleError> {
        let mut steps = Vec::new();
        self.run(word, |step| steps.push(step))?;
        Ok(steps)
    }

    /// 여러 단어에 각각 적용 (단어마다 실패가 분리됨)
    pub fn apply_all<'a, I>(&self, words: I, with_trace: bool) -> Vec<WordResult>
    where
        I: IntoIterator<Item = &'a str>,
    {
        words
            .into_iter()
            .map(|word| {
                let mut trace = Vec::new();
                let outcome = self.run(word, |step| {
                    if with_trace {
                        trace.push(step);
                    }
                });
                match outcome {
                    Ok(output) => WordResult {
                        input: word.to_string(),
                        output: Some(output),
                        error: None,
                        trace,
                    },
                    Err(e) => {
                        log::warn!("'{}' 적용 실패: {}", word, e);
                        WordResult {
                            input: word.to_string(),
                            output: None,
                            error: Some(e.to_string()),
                            trace: Vec::new(),
                        }
                    }
                }
            })
            .collect()
    }

    fn run<F>(&self, word: &str, mut on_change: F) -> Result<String, RuleError>
    where
        F: FnMut(TraceStep),
    {
        let lines = self.rules.as_deref().ok_or(RuleError::RulesNotSet)?;
        let mut current = word.to_string();

        for (i, line) in lines.iter().enumerate() {
            let CompiledLine::Rule(rule) = line else {
                log::trace!("{}행: 주석", i + 1);
                continue;
            };
            let next = apply_rule(rule, &current, &self.categories)
                .map_err(|fault| RuleError::Apply { line: i + 1, fault })?;

            if next != current {
                log::debug!("{}행: {} -> {}", i + 1, current, next);
                on_change(TraceStep {
                    line: i + 1,
                    before: std::mem::replace(&mut current, next.clone()),
                    after: next,
                });
            }
        }

        Ok(current)
    }
}
