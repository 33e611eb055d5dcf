use crate::core::ConfigProvider;
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_output_formats, validate_path, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const SUPPORTED_FORMATS: [&str; 2] = ["csv", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub batch: BatchSection,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub processing: Option<ProcessingConfig>,
    pub environment: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSection {
    pub name: String,
    pub description: Option<String>,
    pub working_directory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
    pub include_schedule: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub skip_invalid: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| CalcError::ConfigError {
                message: format!(
                    "Cannot read config file '{}': {}",
                    path.as_ref().display(),
                    e
                ),
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let declared = Self::declared_environment(content);
        let processed_content = Self::substitute_env_vars(content, &declared)?;
        let config = toml::from_str(&processed_content)?;
        Ok(config)
    }

    /// 讀取檔案內 [environment] 表，作為環境變數缺漏時的預設值
    fn declared_environment(content: &str) -> HashMap<String, String> {
        let Ok(table) = toml::from_str::<toml::Table>(content) else {
            // 語法錯誤留給最終解析回報
            return HashMap::new();
        };

        table
            .get("environment")
            .and_then(|value| value.as_table())
            .map(|env| {
                env.iter()
                    .filter_map(|(key, value)| {
                        value.as_str().map(|v| (key.clone(), v.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})
    ///
    /// 先查行程環境變數，再查 [environment] 表；都找不到則保留原文。
    fn substitute_env_vars(content: &str, declared: &HashMap<String, String>) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CalcError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name)
                .ok()
                .or_else(|| declared.get(var_name).cloned())
                .unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("batch.name", &self.batch.name)?;
        validate_path("input.file", &self.input.file)?;
        validate_path("output.path", &self.output.path)?;
        validate_output_formats("output.formats", &self.output.formats, &SUPPORTED_FORMATS)?;

        if let Some(dir) = &self.batch.working_directory {
            validate_path("batch.working_directory", dir)?;
        }

        let unresolved = [
            Some(self.input.file.as_str()),
            Some(self.output.path.as_str()),
            self.batch.working_directory.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|value| value.contains("${"));

        if unresolved {
            return Err(CalcError::ConfigValidationError {
                field: "environment".to_string(),
                message: "Unresolved ${VAR} placeholder; set the variable before running"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// 所有相對路徑的根目錄，預設為目前目錄
    pub fn working_directory(&self) -> &str {
        self.batch.working_directory.as_deref().unwrap_or(".")
    }
}

impl ConfigProvider for TomlConfig {
    fn batch_name(&self) -> &str {
        &self.batch.name
    }

    fn input_file(&self) -> &str {
        &self.input.file
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn include_schedule(&self) -> bool {
        self.output.include_schedule.unwrap_or(false)
    }

    fn skip_invalid(&self) -> bool {
        self.processing
            .as_ref()
            .and_then(|p| p.skip_invalid)
            .unwrap_or(true)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[batch]
name = "q3-quotes"
description = "Quarterly quotes"

[input]
file = "loans.csv"

[output]
path = "./output"
formats = ["csv", "json"]
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.batch_name(), "q3-quotes");
        assert_eq!(config.input_file(), "loans.csv");
        assert_eq!(config.output_formats(), ["csv", "json"]);
        assert_eq!(config.working_directory(), ".");
        assert!(!config.include_schedule());
        assert!(config.skip_invalid());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_processing_overrides() {
        let toml_content = format!(
            "{}include_schedule = true\n\n[processing]\nskip_invalid = false\n",
            BASIC
        );
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();

        assert!(config.include_schedule());
        assert!(!config.skip_invalid());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MORTGAGE_TEST_OUTPUT_DIR", "/tmp/quotes");

        let toml_content = r#"
[batch]
name = "env"

[input]
file = "loans.csv"

[output]
path = "${MORTGAGE_TEST_OUTPUT_DIR}"
formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "/tmp/quotes");

        std::env::remove_var("MORTGAGE_TEST_OUTPUT_DIR");
    }

    #[test]
    fn test_unresolved_placeholder_fails_validation() {
        let toml_content = r#"
[batch]
name = "env"

[input]
file = "${MORTGAGE_TEST_SURELY_UNSET}/loans.csv"

[output]
path = "./output"
formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(CalcError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_unresolved_working_directory_fails_validation() {
        let toml_content = BASIC.replace(
            "description = \"Quarterly quotes\"",
            "working_directory = \"${MORTGAGE_TEST_SURELY_UNSET_DIR}\"",
        );
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.working_directory(), "${MORTGAGE_TEST_SURELY_UNSET_DIR}");
        assert!(matches!(
            config.validate(),
            Err(CalcError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_environment_table_is_substitution_fallback() {
        let toml_content = r#"
[batch]
name = "env-table"
working_directory = "${MORTGAGE_TEST_TABLE_ONLY_ROOT}"

[input]
file = "${MORTGAGE_TEST_TABLE_ONLY_INPUT}"

[output]
path = "./output"
formats = ["csv"]

[environment]
MORTGAGE_TEST_TABLE_ONLY_ROOT = "/srv/quotes"
MORTGAGE_TEST_TABLE_ONLY_INPUT = "loans-q3.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.working_directory(), "/srv/quotes");
        assert_eq!(config.input_file(), "loans-q3.csv");
        assert_eq!(config.environment.as_ref().map(|env| env.len()), Some(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_process_environment_overrides_table() {
        std::env::set_var("MORTGAGE_TEST_OVERRIDDEN_INPUT", "from-env.csv");

        let toml_content = r#"
[batch]
name = "env-precedence"

[input]
file = "${MORTGAGE_TEST_OVERRIDDEN_INPUT}"

[output]
path = "./output"
formats = ["csv"]

[environment]
MORTGAGE_TEST_OVERRIDDEN_INPUT = "from-table.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input_file(), "from-env.csv");

        std::env::remove_var("MORTGAGE_TEST_OVERRIDDEN_INPUT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = BASIC.replace(r#"["csv", "json"]"#, r#"["xlsx"]"#);
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(CalcError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_missing_section_is_toml_error() {
        let result = TomlConfig::from_toml_str("[batch]\nname = \"x\"\n");
        assert!(matches!(result, Err(CalcError::TomlError(_))));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.batch.name, "q3-quotes");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = TomlConfig::from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(CalcError::ConfigError { .. })));
    }
}
