//! 카테고리 표
//!
//! 대문자 한 글자 → 순서 있는 멤버 목록. 멤버 순서는 두 카테고리 사이의
//! 위치 대응(같은 인덱스끼리 치환)을 결정합니다.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CategoryError;

/// 카테고리 표
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct CategoryTable {
    categories: HashMap<char, Vec<String>>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 카테고리 추가 (같은 문자가 있으면 교체)
    pub fn insert<I, S>(&mut self, letter: char, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .insert(letter, members.into_iter().map(Into::into).collect());
    }

    /// 빌더 형태로 카테고리 추가
    pub fn with<I, S>(mut self, letter: char, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(letter, members);
        self
    }

    pub fn get(&self, letter: char) -> Option<&[String]> {
        self.categories.get(&letter).map(Vec::as_slice)
    }

    pub fn contains(&self, letter: char) -> bool {
        self.categories.contains_key(&letter)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// 다른 표의 카테고리를 합침 (같은 문자는 `other` 쪽으로 교체)
    pub fn merge(&mut self, other: CategoryTable) {
        self.categories.extend(other.categories);
    }

    /// 정의된 카테고리 문자 (정렬됨)
    pub fn letters(&self) -> Vec<char> {
        let mut letters: Vec<char> = self.categories.keys().copied().collect();
        letters.sort_unstable();
        letters
    }

    /// JSON 파일에서 로드
    ///
    /// # 파일 형식
    /// ```json
    /// { "C": ["p", "t", "k"], "V": ["a", "e", "i"] }
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CategoryError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| CategoryError::ParseError(e.to_string()))
    }

    /// JSON 문자열에서 로드
    pub fn from_json(json_str: &str) -> Result<Self, CategoryError> {
        serde_json::from_str(json_str).map_err(|e| CategoryError::ParseError(e.to_string()))
    }

    /// 텍스트 정의에서 로드
    ///
    /// 한 줄에 하나씩 `C=ptk` 형식. 멤버에 쉼표가 있으면 쉼표로 나눔 (`T=th,sh,k`).
    /// 빈 줄은 무시합니다.
    pub fn from_definitions(text: &str) -> Result<Self, CategoryError> {
        let mut table = Self::new();

        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let (name, members) = line.split_once('=').ok_or_else(|| {
                CategoryError::FormatError(format!("line {}: 'X=멤버' 형식이 아님", i + 1))
            })?;
            let letter = parse_letter(name.trim())
                .map_err(|msg| CategoryError::FormatError(format!("line {}: {}", i + 1, msg)))?;

            let members = members.trim();
            if members.contains(',') {
                table.insert(letter, members.split(',').map(str::trim));
            } else {
                table.insert(letter, members.chars().map(String::from));
            }
        }

        Ok(table)
    }
}

/// 카테고리 이름은 대문자 한 글자
fn parse_letter(name: &str) -> Result<char, String> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_uppercase() => Ok(c),
        _ => Err(format!("카테고리 이름 '{}'은(는) 대문자 한 글자여야 함", name)),
    }
}

impl TryFrom<HashMap<String, Vec<String>>> for CategoryTable {
    type Error = CategoryError;

    fn try_from(raw: HashMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        let mut table = Self::new();
        for (name, members) in raw {
            let letter = parse_letter(&name).map_err(CategoryError::FormatError)?;
            table.insert(letter, members);
        }
        Ok(table)
    }
}

impl From<CategoryTable> for BTreeMap<String, Vec<String>> {
    fn from(table: CategoryTable) -> Self {
        table
            .categories
            .into_iter()
            .map(|(letter, members)| (letter.to_string(), members))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let table = CategoryTable::new()
            .with('C', ["p", "t", "k"])
            .with('V', ["a", "e", "i"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get('C').unwrap(), &["p", "t", "k"]);
        assert!(table.get('X').is_none());
        assert_eq!(table.letters(), vec!['C', 'V']);
    }

    #[test]
    fn test_from_json() {
        let table = CategoryTable::from_json(r#"{ "C": ["p", "t"], "V": ["a"] }"#).unwrap();
        assert_eq!(table.get('C').unwrap(), &["p", "t"]);
        assert!(table.contains('V'));
    }

    #[test]
    fn test_from_json_rejects_bad_letter() {
        assert!(CategoryTable::from_json(r#"{ "CC": ["p"] }"#).is_err());
        assert!(CategoryTable::from_json(r#"{ "c": ["p"] }"#).is_err());
        assert!(CategoryTable::from_json("not json").is_err());
    }

    #[test]
    fn test_json_serialize() {
        let table = CategoryTable::new().with('C', ["p"]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"C":["p"]}"#);
        let parsed = CategoryTable::from_json(&json).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        std::fs::write(&path, r#"{ "C": ["p", "t", "k"], "V": ["a"] }"#).unwrap();

        let table = CategoryTable::load(&path).unwrap();
        assert_eq!(table.get('C').unwrap(), &["p", "t", "k"]);
        assert_eq!(table.letters(), vec!['C', 'V']);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = CategoryTable::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, CategoryError::IoError(_)));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        let bad = CategoryTable::load(&path).unwrap_err();
        assert!(matches!(bad, CategoryError::ParseError(_)));
    }

    #[test]
    fn test_merge_replaces_same_letter() {
        let mut table = CategoryTable::new().with('C', ["p"]).with('V', ["a"]);
        table.merge(CategoryTable::new().with('C', ["t", "k"]));
        assert_eq!(table.get('C').unwrap(), &["t", "k"]);
        assert_eq!(table.get('V').unwrap(), &["a"]);
    }

    #[test]
    fn test_from_definitions() {
        let table = CategoryTable::from_definitions("C=ptk\n\nT = th, sh ,k\n").unwrap();
        assert_eq!(table.get('C').unwrap(), &["p", "t", "k"]);
        assert_eq!(table.get('T').unwrap(), &["th", "sh", "k"]);
    }

    #[test]
    fn test_from_definitions_errors() {
        let err = CategoryTable::from_definitions("C=ptk\nV aei").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(CategoryTable::from_definitions("c=ptk").is_err());
    }
}
