//! 규칙 토큰과 세그먼트 정의
//!
//! 한 줄의 규칙은 `/`로 나뉜 2~5개의 세그먼트로 구성되고,
//! 각 세그먼트는 타입이 있는 토큰의 나열입니다.

/// 규칙 토큰
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// 일반 문자 (`!`로 이스케이프된 구조 문자 포함)
    Literal(char),
    /// 카테고리 참조 (대문자 한 글자)
    Category(char),
    /// 임시 카테고리 구분자 `,`
    Comma,
    /// 단어 경계 `#`
    Hashtag,
    /// 조건 대안 구분자 `|`
    Pipe,
    /// 조건 내 대상 위치 `_`
    Underscore,
}

impl Token {
    /// 일반 문자인 경우 그 문자 반환
    pub fn literal(&self) -> Option<char> {
        match self {
            Token::Literal(c) => Some(*c),
            _ => None,
        }
    }

    /// 카테고리 참조인 경우 문자 반환
    pub fn category(&self) -> Option<char> {
        match self {
            Token::Category(letter) => Some(*letter),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Literal(_))
    }

    pub fn is_hashtag(&self) -> bool {
        matches!(self, Token::Hashtag)
    }
}

/// 규칙의 한 필드 (대상, 변화, 환경, 예외, 대체 변화)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    tokens: Vec<Token>,
}

impl Segment {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// 모든 토큰이 일반 문자인지 (빈 세그먼트 포함)
    pub fn is_literal_segment(&self) -> bool {
        self.tokens.iter().all(Token::is_literal)
    }

    /// 쉼표로 구분된 임시 카테고리인지
    ///
    /// 쉼표가 하나 이상 있고 나머지는 모두 일반 문자여야 함
    pub fn is_temporary_category(&self) -> bool {
        self.tokens.contains(&Token::Comma)
            && self
                .tokens
                .iter()
                .all(|t| matches!(t, Token::Comma | Token::Literal(_)))
    }

    /// 카테고리 하나만 참조하는 세그먼트면 그 문자 반환
    pub fn single_category(&self) -> Option<char> {
        match self.tokens.as_slice() {
            [Token::Category(letter)] => Some(*letter),
            _ => None,
        }
    }

    /// 이름 있는 카테고리 또는 임시 카테고리인지
    pub fn is_category_segment(&self) -> bool {
        self.single_category().is_some() || self.is_temporary_category()
    }

    pub fn has_category(&self) -> bool {
        self.tokens.iter().any(|t| t.category().is_some())
    }

    pub fn hashtag_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_hashtag()).count()
    }

    /// 임시 카테고리 멤버 목록 (쉼표 사이의 문자열)
    pub fn temporary_members(&self) -> Vec<String> {
        self.tokens
            .split(|t| *t == Token::Comma)
            .map(|run| run.iter().filter_map(Token::literal).collect())
            .collect()
    }

    /// 일반 문자들을 이어붙인 문자열
    pub fn literal_text(&self) -> String {
        self.tokens.iter().filter_map(Token::literal).collect()
    }

    /// `|`로 나뉜 조건 대안들
    pub fn alternatives(&self) -> impl Iterator<Item = &[Token]> {
        self.tokens.split(|t| *t == Token::Pipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Vec<Token> {
        s.chars().map(Token::Literal).collect()
    }

    #[test]
    fn test_literal_segment() {
        assert!(Segment::new(lit("abc")).is_literal_segment());
        assert!(Segment::default().is_literal_segment());
        assert!(!Segment::new(vec![Token::Category('C')]).is_literal_segment());
    }

    #[test]
    fn test_temporary_category() {
        let seg = Segment::new(vec![
            Token::Literal('t'),
            Token::Literal('h'),
            Token::Comma,
            Token::Literal('k'),
        ]);
        assert!(seg.is_temporary_category());
        assert!(seg.is_category_segment());
        assert_eq!(seg.temporary_members(), vec!["th".to_string(), "k".to_string()]);

        // 쉼표가 없으면 임시 카테고리가 아님
        assert!(!Segment::new(lit("tk")).is_temporary_category());
    }

    #[test]
    fn test_single_category() {
        assert_eq!(Segment::new(vec![Token::Category('V')]).single_category(), Some('V'));
        assert_eq!(
            Segment::new(vec![Token::Category('V'), Token::Literal('a')]).single_category(),
            None
        );
    }

    #[test]
    fn test_alternatives() {
        let seg = Segment::new(vec![
            Token::Literal('a'),
            Token::Underscore,
            Token::Pipe,
            Token::Underscore,
            Token::Hashtag,
        ]);
        let alts: Vec<&[Token]> = seg.alternatives().collect();
        assert_eq!(alts.len(), 2);
        assert_eq!(alts[1], &[Token::Underscore, Token::Hashtag]);
    }

    #[test]
    fn test_hashtag_count_and_text() {
        let seg = Segment::new(vec![Token::Literal('u'), Token::Literal('n'), Token::Hashtag]);
        assert_eq!(seg.hashtag_count(), 1);
        assert_eq!(seg.literal_text(), "un");
    }
}
