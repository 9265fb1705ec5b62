//! 설정 파일 로드/저장 (JSON)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::category::CategoryTable;

/// soundshift 설정
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SoundShiftConfig {
    /// 카테고리 표 (문자 → 멤버 목록)
    #[serde(default)]
    pub categories: CategoryTable,
    /// 카테고리 JSON 파일 경로 (같은 문자는 파일 쪽이 우선)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories_path: Option<PathBuf>,
    /// 규칙 텍스트 (`rules_path`가 있으면 무시)
    #[serde(default)]
    pub rules: String,
    /// 규칙 파일 경로 (설정 파일 기준 상대 경로 허용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<PathBuf>,
    /// 단어마다 규칙 적용 기록 출력
    #[serde(default)]
    pub trace: bool,
}

/// 상대 경로는 설정 파일 디렉토리 기준
fn resolve(path: &Path, base_dir: Option<&Path>) -> PathBuf {
    match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

impl SoundShiftConfig {
    /// 실제로 사용할 규칙 텍스트
    ///
    /// `rules_path`가 상대 경로면 `base_dir` 기준으로 해석합니다.
    pub fn rules_text(&self, base_dir: Option<&Path>) -> Result<String, String> {
        let Some(path) = &self.rules_path else {
            return Ok(self.rules.clone());
        };
        let resolved = resolve(path, base_dir);
        fs::read_to_string(&resolved)
            .map_err(|e| format!("failed to read rules file {}: {}", resolved.display(), e))
    }

    /// 실제로 사용할 카테고리 표
    ///
    /// 설정에 적힌 카테고리에 `categories_path` 파일의 카테고리를 합칩니다.
    pub fn category_table(&self, base_dir: Option<&Path>) -> Result<CategoryTable, String> {
        let mut table = self.categories.clone();
        if let Some(path) = &self.categories_path {
            let resolved = resolve(path, base_dir);
            let loaded = CategoryTable::load(&resolved)
                .map_err(|e| format!("{}: {}", resolved.display(), e))?;
            table.merge(loaded);
        }
        Ok(table)
    }
}

/// 기본 설정 파일 경로: $XDG_CONFIG_HOME/soundshift/config.json 또는 ~/.config/soundshift/config.json
pub fn config_path() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
    {
        return dir.join("soundshift").join("config.json");
    }
    let home = std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .filter(|p| p.is_absolute() && p.is_dir())
        .unwrap_or_else(|| {
            // HOME 미설정이거나 유효하지 않으면 /var/tmp 폴백
            PathBuf::from("/var/tmp")
        });
    home.join(".config").join("soundshift").join("config.json")
}

/// 설정 파일 로드
pub fn load_config(path: &Path) -> Result<SoundShiftConfig, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("invalid config {}: {}", path.display(), e))
}

/// 설정 파일 저장
pub fn save_config(path: &Path, config: &SoundShiftConfig) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("failed to create config directory: {}", e))?;
    }
    let json = serde_json::to_string_pretty(config).map_err(|e| format!("serialization failed: {}", e))?;
    fs::write(path, json).map_err(|e| format!("failed to write config: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SoundShiftConfig::default();
        assert!(config.categories.is_empty());
        assert!(config.rules.is_empty());
        assert!(!config.trace);
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{
            "categories": { "C": ["p", "t", "k"], "V": ["a", "e", "i"] },
            "rules": "p/b/V_V"
        }"#;
        let config: SoundShiftConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.categories.get('C').unwrap().len(), 3);
        assert_eq!(config.rules, "p/b/V_V");
        assert!(config.rules_path.is_none());
        assert!(!config.trace);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: SoundShiftConfig = serde_json::from_str(r#"{"trace": true}"#).unwrap();
        assert!(config.trace);
        assert!(config.categories.is_empty());
    }

    #[test]
    fn test_invalid_category_name_rejected() {
        let json = r#"{ "categories": { "cons": ["p"] } }"#;
        assert!(serde_json::from_str::<SoundShiftConfig>(json).is_err());
    }

    #[test]
    fn test_rules_text_inline() {
        let config = SoundShiftConfig {
            rules: "a/b".into(),
            ..Default::default()
        };
        assert_eq!(config.rules_text(None).unwrap(), "a/b");
    }

    #[test]
    fn test_save_load_and_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("rules.txt"), "C/D\n").unwrap();

        let config = SoundShiftConfig {
            categories: CategoryTable::new().with('C', ["p"]).with('D', ["b"]),
            rules_path: Some(PathBuf::from("rules.txt")),
            ..Default::default()
        };
        let path = dir.path().join("soundshift").join("config.json");
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.rules_text(Some(dir.path())).unwrap(), "C/D\n");
        assert!(loaded.rules_text(path.parent()).is_err());
    }

    #[test]
    fn test_categories_file_merged() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("categories.json"), r#"{ "C": ["t", "k"], "N": ["m"] }"#).unwrap();

        let config: SoundShiftConfig = serde_json::from_str(
            r#"{ "categories": { "C": ["p"], "V": ["a"] }, "categories_path": "categories.json" }"#,
        )
        .unwrap();
        let table = config.category_table(Some(dir.path())).unwrap();
        assert_eq!(table.get('C').unwrap(), &["t", "k"]);
        assert_eq!(table.get('V').unwrap(), &["a"]);
        assert_eq!(table.get('N').unwrap(), &["m"]);
    }

    #[test]
    fn test_categories_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = SoundShiftConfig {
            categories_path: Some(PathBuf::from("missing.json")),
            ..Default::default()
        };
        let err = config.category_table(Some(dir.path())).unwrap_err();
        assert!(err.contains("missing.json"));
        assert!(SoundShiftConfig::default().category_table(None).unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/soundshift.json")).unwrap_err();
        assert!(err.contains("failed to read config"));
    }
}
