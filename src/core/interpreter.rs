//! 규칙 한 줄 적용기
//!
//! 대상 세그먼트의 형태에 따라 세 가지 방식으로 적용합니다:
//! - 접사/전역 규칙: 대상에 `#` 하나, 카테고리 없음
//! - 카테고리 규칙: 대상이 카테고리 하나 또는 임시 카테고리
//! - 문자열 규칙: 대상이 일반 문자만으로 구성

use std::iter;

use super::category::CategoryTable;
use super::compiler::Rule;
use super::matcher::{matches_global, matches_local, resolve_branch, Branch};
use super::token::{Segment, Token};
use crate::error::ApplyFault;

/// 카테고리 규칙의 치환 형태
#[derive(Debug, Clone, PartialEq, Eq)]
enum Replacement {
    /// 같은 인덱스의 멤버로 치환
    Members(Vec<String>),
    /// 고정 문자열로 치환
    Text(String),
}

impl Replacement {
    fn for_index(&self, index: usize) -> &str {
        match self {
            Replacement::Members(members) => members.get(index).map(String::as_str).unwrap_or(""),
            Replacement::Text(text) => text,
        }
    }

    fn same_shape(&self, other: &Replacement) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// 분기에 따라 선택된 변화 세그먼트
fn select<'a>(branch: Branch, rule: &'a Rule) -> Option<&'a Segment> {
    match branch {
        Branch::Environment => Some(&rule.change),
        Branch::Exception => rule.else_change.as_ref(),
        Branch::NoMatch => None,
    }
}

/// 카테고리 세그먼트(이름 있는 카테고리 또는 임시 카테고리)의 멤버 목록
fn category_members(segment: &Segment, categories: &CategoryTable) -> Result<Vec<String>, ApplyFault> {
    match segment.single_category() {
        Some(letter) => categories
            .get(letter)
            .map(<[String]>::to_vec)
            .ok_or(ApplyFault::UnknownCategory(letter)),
        None => Ok(segment.temporary_members()),
    }
}

/// 규칙 한 줄을 단어에 적용
pub fn apply_rule(rule: &Rule, word: &str, categories: &CategoryTable) -> Result<String, ApplyFault> {
    let target = &rule.target;

    if target.hashtag_count() == 1 && !target.has_category() {
        return apply_global(rule, word, categories);
    }
    if target.hashtag_count() > 0 {
        return Err(ApplyFault::InvalidTarget);
    }
    if target.is_category_segment() {
        let members = category_members(target, categories)?;
        return apply_category(&members, rule, word, categories);
    }
    if target.is_literal_segment() {
        let needle: Vec<char> = target.tokens().iter().filter_map(Token::literal).collect();
        return apply_literal(&needle, rule, word, categories);
    }

    Err(ApplyFault::InvalidTarget)
}

/// 접사/전역 규칙 적용
fn apply_global(rule: &Rule, word: &str, categories: &CategoryTable) -> Result<String, ApplyFault> {
    let chars: Vec<char> = word.chars().collect();
    let branch = resolve_branch(rule.environment.as_ref(), rule.exception.as_ref(), |alt| {
        matches_global(alt, &chars, categories)
    })?;
    let Some(change) = select(branch, rule) else {
        return Ok(word.to_string());
    };

    if !change
        .tokens()
        .iter()
        .all(|t| matches!(t, Token::Literal(_) | Token::Hashtag))
    {
        return Err(ApplyFault::InvalidChange);
    }

    match change.hashtag_count() {
        0 => apply_anchored(&rule.target, change.literal_text(), word),
        1 => {
            if rule.target.tokens() != [Token::Hashtag] {
                return Err(ApplyFault::AffixTargetNotBare);
            }
            let (prefix, suffix) = split_at_hashtag(change.tokens());
            Ok(format!("{}{}{}", prefix, word, suffix))
        }
        _ => Err(ApplyFault::InvalidChange),
    }
}

/// `#` 앞뒤의 일반 문자열
fn split_at_hashtag(tokens: &[Token]) -> (String, String) {
    let position = tokens.iter().position(Token::is_hashtag).unwrap_or(tokens.len());
    let before = tokens[..position].iter().filter_map(Token::literal).collect();
    let after = tokens
        .get(position + 1..)
        .unwrap_or_default()
        .iter()
        .filter_map(Token::literal)
        .collect();
    (before, after)
}

/// 단어 경계에 고정된 전역 치환
///
/// `#abc`는 접두사, `abc#`는 접미사를 요구하며 일치한 부분만 변화로 바꾸고
/// 나머지는 보존합니다. `#` 단독 대상은 단어 전체를 바꿉니다.
fn apply_anchored(target: &Segment, change: String, word: &str) -> Result<String, ApplyFault> {
    let (before, after) = split_at_hashtag(target.tokens());

    match (before.is_empty(), after.is_empty()) {
        (false, false) => Err(ApplyFault::AnchoredTargetBothSides),
        (true, true) => Ok(change),
        (true, false) => Ok(match word.strip_prefix(after.as_str()) {
            Some(rest) => change + rest,
            None => word.to_string(),
        }),
        (false, true) => Ok(match word.strip_suffix(before.as_str()) {
            Some(rest) => format!("{}{}", rest, change),
            None => word.to_string(),
        }),
    }
}

fn replacement(segment: &Segment, categories: &CategoryTable) -> Result<Replacement, ApplyFault> {
    if segment.is_category_segment() {
        return Ok(Replacement::Members(category_members(segment, categories)?));
    }
    if segment.is_literal_segment() {
        return Ok(Replacement::Text(segment.literal_text()));
    }
    Err(ApplyFault::InvalidChange)
}

/// 카테고리 규칙 적용
///
/// 모든 위치를 규칙 시작 시점의 단어 스냅샷 기준으로 평가하므로
/// 한 줄 안의 치환끼리는 서로 영향을 주지 않습니다.
fn apply_category(
    members: &[String],
    rule: &Rule,
    word: &str,
    categories: &CategoryTable,
) -> Result<String, ApplyFault> {
    let change = replacement(&rule.change, categories)?;
    let else_change = rule
        .else_change
        .as_ref()
        .map(|seg| replacement(seg, categories))
        .transpose()?;
    if let Some(ref other) = else_change {
        if !change.same_shape(other) {
            return Err(ApplyFault::ElseChangeShapeMismatch);
        }
    }

    let snapshot: Vec<char> = word.chars().collect();
    let mut output = String::with_capacity(word.len());

    for (i, &ch) in snapshot.iter().enumerate() {
        let Some(index) = members.iter().position(|m| m.chars().eq(iter::once(ch))) else {
            output.push(ch);
            continue;
        };

        let branch = resolve_branch(rule.environment.as_ref(), rule.exception.as_ref(), |alt| {
            matches_local(alt, &snapshot, i, 1, categories)
        })?;
        let chosen = match branch {
            Branch::Environment => Some(&change),
            Branch::Exception => else_change.as_ref(),
            Branch::NoMatch => None,
        };

        match chosen {
            Some(rep) => output.push_str(rep.for_index(index)),
            None => output.push(ch),
        }
    }

    Ok(output)
}

/// `word[from..]`에서 `needle`이 처음 나오는 위치
fn find_from(word: &[char], needle: &[char], from: usize) -> Option<usize> {
    if from > word.len() || needle.len() > word.len() {
        return None;
    }
    (from..=word.len() - needle.len()).find(|&i| word[i..i + needle.len()] == *needle)
}

fn literal_chars(segment: &Segment) -> Result<Vec<char>, ApplyFault> {
    if !segment.is_literal_segment() {
        return Err(ApplyFault::InvalidChange);
    }
    Ok(segment.tokens().iter().filter_map(Token::literal).collect())
}

/// 문자열 규칙 적용
///
/// 왼쪽에서 오른쪽으로 대상 문자열을 찾아 조건이 맞으면 치환하고 치환된 구간
/// 뒤에서 계속 탐색합니다. 조건이 맞지 않으면 한 글자만 전진하므로 겹치는
/// 후보도 검사됩니다.
fn apply_literal(
    needle: &[char],
    rule: &Rule,
    word: &str,
    categories: &CategoryTable,
) -> Result<String, ApplyFault> {
    let change = literal_chars(&rule.change)?;
    let else_change = rule.else_change.as_ref().map(literal_chars).transpose()?;

    let mut current: Vec<char> = word.chars().collect();
    let mut pos = 0;

    while let Some(index) = find_from(&current, needle, pos) {
        let branch = resolve_branch(rule.environment.as_ref(), rule.exception.as_ref(), |alt| {
            matches_local(alt, &current, index, needle.len(), categories)
        })?;
        let chosen = match branch {
            Branch::Environment => Some(&change),
            Branch::Exception => else_change.as_ref(),
            Branch::NoMatch => None,
        };

        match chosen {
            Some(rep) => {
                current.splice(index..index + needle.len(), rep.iter().copied());
                // 빈 대상은 삽입 후 한 칸 더 전진해야 끝남
                pos = index + rep.len() + usize::from(needle.is_empty());
            }
            None => pos = index + 1,
        }
    }

    Ok(current.into_iter().collect())
}
