//! 환경/예외 조건 매칭
//!
//! 두 가지 모드가 있습니다:
//! - 위치 매칭: `_`를 기준으로 대상 구간 앞뒤 문자를 비교 (카테고리/문자열 대상)
//! - 전역 매칭: 단어 전체에서 연속 구간, 접두사, 접미사 검사 (접사/전역 대상)

use super::category::CategoryTable;
use super::token::{Segment, Token};
use crate::error::ApplyFault;

/// 조건 평가 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// 환경 충족 → 변화 적용
    Environment,
    /// 예외 충족 → 대체 변화 적용 (없으면 매칭 없음)
    Exception,
    NoMatch,
}

/// 토큰 하나가 문자 하나와 일치하는지
fn token_matches(token: &Token, ch: char, categories: &CategoryTable) -> Result<bool, ApplyFault> {
    match token {
        Token::Literal(c) => Ok(*c == ch),
        Token::Category(letter) => {
            let members = categories
                .get(*letter)
                .ok_or(ApplyFault::UnknownCategory(*letter))?;
            Ok(members.iter().any(|m| m.chars().eq(std::iter::once(ch))))
        }
        Token::Hashtag => Err(ApplyFault::MisplacedHashtag),
        Token::Underscore => Err(ApplyFault::UnderscoreInGlobalCondition),
        Token::Comma | Token::Pipe => Ok(false),
    }
}

/// `word[offset..]`가 토큰 나열과 일치하는지 (범위 검사는 호출자 책임)
fn match_run(
    tokens: &[Token],
    word: &[char],
    offset: usize,
    categories: &CategoryTable,
) -> Result<bool, ApplyFault> {
    for (token, &ch) in tokens.iter().zip(&word[offset..offset + tokens.len()]) {
        if !token_matches(token, ch, categories)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// 전역 매칭: 위치와 무관하게 단어 전체를 대상으로 검사
///
/// - `#` 없음: 단어 안 어디든 연속 구간으로 존재
/// - 앞 `#`: 접두사
/// - 뒤 `#`: 접미사
pub fn matches_global(
    alternative: &[Token],
    word: &[char],
    categories: &CategoryTable,
) -> Result<bool, ApplyFault> {
    if alternative.contains(&Token::Underscore) {
        return Err(ApplyFault::UnderscoreInGlobalCondition);
    }
    let hashtags = alternative.iter().filter(|t| t.is_hashtag()).count();
    if hashtags > 1 {
        return Err(ApplyFault::TooManyHashtags);
    }

    match alternative {
        [Token::Hashtag, rest @ ..] => {
            Ok(rest.len() <= word.len() && match_run(rest, word, 0, categories)?)
        }
        [rest @ .., Token::Hashtag] => {
            if rest.len() > word.len() {
                return Ok(false);
            }
            match_run(rest, word, word.len() - rest.len(), categories)
        }
        _ if hashtags > 0 => Err(ApplyFault::MisplacedHashtag),
        _ => {
            if alternative.len() > word.len() {
                return Ok(false);
            }
            for offset in 0..=word.len() - alternative.len() {
                if match_run(alternative, word, offset, categories)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// 위치 매칭: 대상 구간 `[start, start + len)` 주변 문맥 검사
///
/// `_`가 없는 대안은 전역 매칭으로 위임합니다.
pub fn matches_local(
    alternative: &[Token],
    word: &[char],
    start: usize,
    len: usize,
    categories: &CategoryTable,
) -> Result<bool, ApplyFault> {
    let Some(underscore) = alternative.iter().position(|t| *t == Token::Underscore) else {
        return matches_global(alternative, word, categories);
    };

    let last = alternative.len() - 1;
    if alternative
        .iter()
        .enumerate()
        .any(|(i, t)| t.is_hashtag() && i != 0 && i != last)
    {
        return Err(ApplyFault::MisplacedHashtag);
    }

    let (mut before, mut after) = (&alternative[..underscore], &alternative[underscore + 1..]);
    let anchored_start = before.first() == Some(&Token::Hashtag);
    if anchored_start {
        before = &before[1..];
    }
    let anchored_end = after.last() == Some(&Token::Hashtag);
    if anchored_end {
        after = &after[..after.len() - 1];
    }

    // 범위를 벗어나는 문맥은 실패 (에러 아님)
    let end = start + len;
    if before.len() > start || end + after.len() > word.len() {
        return Ok(false);
    }
    if anchored_start && start != before.len() {
        return Ok(false);
    }
    if anchored_end && word.len() - end != after.len() {
        return Ok(false);
    }

    Ok(match_run(before, word, start - before.len(), categories)?
        && match_run(after, word, end, categories)?)
}

/// 환경/예외로 적용 분기 결정
///
/// 예외가 "있지만 비어 있는" 경우, 환경이 충족되지 않을 때와 환경이 비어 있을 때
/// 모두 예외 분기가 됩니다.
pub fn resolve_branch<F>(
    environment: Option<&Segment>,
    exception: Option<&Segment>,
    mut matches: F,
) -> Result<Branch, ApplyFault>
where
    F: FnMut(&[Token]) -> Result<bool, ApplyFault>,
{
    let exception_is_empty = exception.is_some_and(Segment::is_empty);
    let unmatched = if exception_is_empty {
        Branch::Exception
    } else {
        Branch::NoMatch
    };

    if let Some(exception) = exception.filter(|x| !x.is_empty()) {
        for alternative in exception.alternatives() {
            if matches(alternative)? {
                return Ok(Branch::Exception);
            }
        }
    }

    let Some(environment) = environment.filter(|e| !e.is_empty()) else {
        return Ok(if exception_is_empty {
            Branch::Exception
        } else {
            Branch::Environment
        });
    };

    for alternative in environment.alternatives() {
        if matches(alternative)? {
            return Ok(Branch::Environment);
        }
    }
    Ok(unmatched)
}
