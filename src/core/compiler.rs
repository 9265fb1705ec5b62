//! 규칙 텍스트 컴파일러
//!
//! 여러 줄 규칙 텍스트를 줄 단위로 파싱하여 원본 줄 수와 같은 길이의
//! 목록을 만듭니다. 에러 줄 번호가 원본 텍스트 기준으로 유지됩니다.

use super::token::Segment;
use super::tokenizer::{has_separator, parse};
use crate::error::{RuleError, SyntaxError};

/// 컴파일된 규칙 한 줄
///
/// 환경/예외는 "없음"(`None`)과 "있지만 비어 있음"(`Some(빈 세그먼트)`)을 구분합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub target: Segment,
    pub change: Segment,
    pub environment: Option<Segment>,
    pub exception: Option<Segment>,
    pub else_change: Option<Segment>,
}

impl Rule {
    /// 2~5개의 세그먼트로 규칙 생성 (2개 미만이면 None)
    pub fn from_segments(segments: Vec<Segment>) -> Option<Self> {
        let mut iter = segments.into_iter();
        let target = iter.next()?;
        let change = iter.next()?;
        Some(Self {
            target,
            change,
            environment: iter.next(),
            exception: iter.next(),
            else_change: iter.next(),
        })
    }
}

/// 컴파일된 한 줄
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledLine {
    /// 주석 또는 빈 줄 (적용 시 무시)
    Comment,
    Rule(Rule),
}

/// 규칙 텍스트 전체 컴파일
///
/// 첫 번째 문법 에러에서 중단하고 1부터 시작하는 줄 번호를 붙여 반환
pub fn compile(text: &str) -> Result<Vec<CompiledLine>, RuleError> {
    text.split('\n')
        .enumerate()
        .map(|(i, raw)| {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            compile_line(line).map_err(|error| RuleError::Syntax { line: i + 1, error })
        })
        .collect()
}

fn compile_line(line: &str) -> Result<CompiledLine, SyntaxError> {
    if !has_separator(line) {
        return Ok(CompiledLine::Comment);
    }
    let segments = parse(line)?;
    Ok(match Rule::from_segments(segments) {
        Some(rule) => CompiledLine::Rule(rule),
        None => CompiledLine::Comment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_rules() {
        let lines = compile("comment line\np/b/V_V\n\n#/un#/").unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], CompiledLine::Comment);
        assert!(matches!(lines[1], CompiledLine::Rule(_)));
        assert_eq!(lines[2], CompiledLine::Comment);
        assert!(matches!(lines[3], CompiledLine::Rule(_)));
    }

    #[test]
    fn test_absent_vs_empty_segments() {
        let lines = compile("a/b\na/b/\na/b//").unwrap();
        let rules: Vec<&Rule> = lines
            .iter()
            .filter_map(|l| match l {
                CompiledLine::Rule(r) => Some(r),
                CompiledLine::Comment => None,
            })
            .collect();

        assert!(rules[0].environment.is_none());
        assert_eq!(rules[1].environment, Some(Segment::default()));
        assert!(rules[1].exception.is_none());
        assert_eq!(rules[2].exception, Some(Segment::default()));
        assert!(rules[2].else_change.is_none());
    }

    #[test]
    fn test_error_line_number() {
        let err = compile("a/b\n\nx_/y").unwrap_err();
        assert_eq!(
            err,
            RuleError::Syntax {
                line: 3,
                error: SyntaxError::UnderscoreOutsideCondition
            }
        );
    }

    #[test]
    fn test_escape_only_line_is_comment() {
        // `/`가 없으므로 줄 끝 이스케이프도 주석으로 처리
        assert_eq!(compile("word!").unwrap(), vec![CompiledLine::Comment]);
    }

    #[test]
    fn test_crlf_lines() {
        let lines = compile("a/b\r\nc/d").unwrap();
        match &lines[0] {
            CompiledLine::Rule(rule) => assert_eq!(rule.change.literal_text(), "b"),
            CompiledLine::Comment => panic!("규칙이어야 함"),
        }
    }
}
