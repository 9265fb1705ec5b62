//! 규칙 한 줄 → 세그먼트 분리기
//!
//! 이스케이프되지 않은 `/`로 줄을 나누고 각 문자를 토큰으로 변환합니다.
//! 구조 문자의 위치 검증도 여기서 한 번에 수행합니다.

use super::token::{Segment, Token};
use crate::error::SyntaxError;

/// 한 줄이 가질 수 있는 최대 세그먼트 수
pub const MAX_SEGMENTS: usize = 5;

/// 이스케이프 문자
const ESCAPE: char = '!';

/// 환경(2) 또는 예외(3) 세그먼트인지 (0부터 시작)
fn is_condition_index(index: usize) -> bool {
    index == 2 || index == 3
}

/// 이스케이프되지 않은 `/`가 있는지 확인
///
/// 없으면 그 줄은 주석으로 취급됨
pub fn has_separator(line: &str) -> bool {
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE => {
                chars.next();
            }
            '/' => return true,
            _ => {}
        }
    }
    false
}

/// 규칙 한 줄을 세그먼트 목록으로 분리
pub fn parse(line: &str) -> Result<Vec<Segment>, SyntaxError> {
    let mut segments: Vec<Vec<Token>> = vec![Vec::new()];
    // 현재 대안에 `_`가 이미 나왔는지
    let mut seen_underscore = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        let index = segments.len() - 1;
        let in_condition = is_condition_index(index);

        let token = match c {
            ESCAPE => Token::Literal(chars.next().ok_or(SyntaxError::UnterminatedEscape)?),
            '/' => {
                close_segment(&segments[index], in_condition)?;
                if segments.len() == MAX_SEGMENTS {
                    return Err(SyntaxError::TooManySegments);
                }
                segments.push(Vec::new());
                seen_underscore = false;
                continue;
            }
            ',' => {
                if in_condition {
                    return Err(SyntaxError::CommaInCondition);
                }
                Token::Comma
            }
            '#' => Token::Hashtag,
            '|' => {
                if !in_condition {
                    return Err(SyntaxError::PipeOutsideCondition);
                }
                if matches!(segments[index].last(), None | Some(Token::Pipe)) {
                    return Err(SyntaxError::EmptyAlternative);
                }
                seen_underscore = false;
                Token::Pipe
            }
            '_' => {
                if !in_condition {
                    return Err(SyntaxError::UnderscoreOutsideCondition);
                }
                if seen_underscore {
                    return Err(SyntaxError::MultipleUnderscores);
                }
                seen_underscore = true;
                Token::Underscore
            }
            c if c.is_uppercase() => Token::Category(c),
            c => Token::Literal(c),
        };
        segments[index].push(token);
    }

    let last = segments.len() - 1;
    close_segment(&segments[last], is_condition_index(last))?;

    segments
        .into_iter()
        .map(|tokens| {
            if tokens.contains(&Token::Comma) {
                validate_temporary_category(&tokens)?;
            }
            Ok(Segment::new(tokens))
        })
        .collect()
}

/// 세그먼트 종료 시 검증: 조건이 `|`로 끝나면 빈 대안
fn close_segment(tokens: &[Token], in_condition: bool) -> Result<(), SyntaxError> {
    if in_condition && tokens.last() == Some(&Token::Pipe) {
        return Err(SyntaxError::EmptyAlternative);
    }
    Ok(())
}

/// 쉼표가 들어간 세그먼트는 일반 문자 멤버만 가진 임시 카테고리여야 함
fn validate_temporary_category(tokens: &[Token]) -> Result<(), SyntaxError> {
    for member in tokens.split(|t| *t == Token::Comma) {
        if member.is_empty() {
            return Err(SyntaxError::EmptyCategoryMember);
        }
        if !member.iter().all(Token::is_literal) {
            return Err(SyntaxError::NonLiteralCategoryMember);
        }
    }
    Ok(())
}
