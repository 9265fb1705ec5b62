//! 규칙 컴파일/적용 에러

use std::fmt;

/// 규칙 문법 에러 (규칙 텍스트만으로 결정됨)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// 줄 끝의 `!`
    UnterminatedEscape,
    /// 세그먼트가 5개 초과
    TooManySegments,
    /// 환경/예외 세그먼트 안의 `,`
    CommaInCondition,
    /// 빈 임시 카테고리 멤버 (`,,`, 선행/후행 `,`)
    EmptyCategoryMember,
    /// 임시 카테고리에 일반 문자가 아닌 토큰
    NonLiteralCategoryMember,
    /// 환경/예외 밖의 `|`
    PipeOutsideCondition,
    /// `|` 양쪽 중 한쪽이 빈 대안
    EmptyAlternative,
    /// 환경/예외 밖의 `_`
    UnderscoreOutsideCondition,
    /// 한 대안에 `_`가 둘 이상
    MultipleUnderscores,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SyntaxError::UnterminatedEscape => "Escape character at end of line",
            SyntaxError::TooManySegments => "Too many segments",
            SyntaxError::CommaInCondition => "Comma inside environment or exception",
            SyntaxError::EmptyCategoryMember => "Empty temporary category member",
            SyntaxError::NonLiteralCategoryMember => {
                "Temporary category may only contain literal characters"
            }
            SyntaxError::PipeOutsideCondition => "Pipe outside environment or exception",
            SyntaxError::EmptyAlternative => "Empty condition alternative",
            SyntaxError::UnderscoreOutsideCondition => {
                "Underscore outside environment or exception"
            }
            SyntaxError::MultipleUnderscores => "Multiple underscores in one condition",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for SyntaxError {}

/// 규칙 적용 중 발견되는 에러 (실제 단어에 규칙이 적용될 때만 드러남)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyFault {
    /// 카테고리 표에 없는 문자
    UnknownCategory(char),
    /// 조건의 처음/끝이 아닌 위치의 `#`
    MisplacedHashtag,
    /// 한 대안에 `#`가 둘 이상
    TooManyHashtags,
    /// 위치 없는(전역) 조건 안의 `_`
    UnderscoreInGlobalCondition,
    /// 처리할 수 없는 대상 형태
    InvalidTarget,
    /// 대상 형태와 맞지 않는 변화 형태
    InvalidChange,
    /// 대체 변화와 변화의 형태 불일치
    ElseChangeShapeMismatch,
    /// 접사 규칙의 대상이 `#` 하나가 아님
    AffixTargetNotBare,
    /// 전역 대상의 `#` 양쪽에 모두 문자가 있음
    AnchoredTargetBothSides,
}

impl fmt::Display for ApplyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyFault::UnknownCategory(letter) => write!(f, "Unknown category '{}'", letter),
            ApplyFault::MisplacedHashtag => {
                f.write_str("Hashtag must be the first or last token of a condition")
            }
            ApplyFault::TooManyHashtags => f.write_str("Too many hashtags in one condition"),
            ApplyFault::UnderscoreInGlobalCondition => {
                f.write_str("Underscore in a word-level condition")
            }
            ApplyFault::InvalidTarget => f.write_str("Invalid target"),
            ApplyFault::InvalidChange => f.write_str("Change does not fit the target"),
            ApplyFault::ElseChangeShapeMismatch => {
                f.write_str("Else-change must have the same shape as the change")
            }
            ApplyFault::AffixTargetNotBare => {
                f.write_str("Affix rule target must be a single hashtag")
            }
            ApplyFault::AnchoredTargetBothSides => {
                f.write_str("Target has characters on both sides of the hashtag")
            }
        }
    }
}

impl std::error::Error for ApplyFault {}

/// 엔진 공개 API 에러 (1부터 시작하는 줄 번호 포함)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// `set_rules` 문법 에러
    Syntax { line: usize, error: SyntaxError },
    /// `apply_sound_changes` 적용 에러
    Apply { line: usize, fault: ApplyFault },
    /// `set_rules` 전에 적용 호출
    RulesNotSet,
}

impl RuleError {
    /// 에러가 발생한 규칙 줄 번호
    pub fn line(&self) -> Option<usize> {
        match self {
            RuleError::Syntax { line, .. } | RuleError::Apply { line, .. } => Some(*line),
            RuleError::RulesNotSet => None,
        }
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::Syntax { line, error } => write!(f, "{} on line {}", error, line),
            RuleError::Apply { line, fault } => write!(f, "{} on line {}", fault, line),
            RuleError::RulesNotSet => f.write_str("Rules must be set before applying them"),
        }
    }
}

impl std::error::Error for RuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuleError::Syntax { error, .. } => Some(error),
            RuleError::Apply { fault, .. } => Some(fault),
            RuleError::RulesNotSet => None,
        }
    }
}

/// 카테고리 정의 로드/파싱 에러
#[derive(Debug)]
pub enum CategoryError {
    /// 파일 읽기 실패
    IoError(std::io::Error),
    /// JSON 파싱 실패
    ParseError(String),
    /// 정의 형식 오류
    FormatError(String),
}

impl fmt::Display for CategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryError::IoError(e) => write!(f, "파일 읽기 오류: {}", e),
            CategoryError::ParseError(s) => write!(f, "JSON 파싱 오류: {}", s),
            CategoryError::FormatError(s) => write!(f, "카테고리 정의 형식 오류: {}", s),
        }
    }
}

impl std::error::Error for CategoryError {}

impl From<std::io::Error> for CategoryError {
    fn from(e: std::io::Error) -> Self {
        CategoryError::IoError(e)
    }
}
