use serde_derive::Deserialize;

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct CheckConfig {
    #[serde(default)]
    pub files: FileNames,

    #[serde(default)]
    pub grammar: GrammarOptions,

    #[serde(default)]
    pub output: OutputOptions,
}

/// Names the submission files are expected to have.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileNames {
    pub lexicon: String,
    pub grammar: String,
    pub sentences: String,
    pub parse_trees: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            lexicon: "Lexicon".to_string(),
            grammar: "Grammar".to_string(),
            sentences: "Sentences".to_string(),
            parse_trees: "ParseTrees".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GrammarOptions {
    pub start_symbol: String,
}

impl Default for GrammarOptions {
    fn default() -> Self {
        Self {
            start_symbol: "S".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputOptions {
    /// width below which a tree is written on a single line
    pub margin: usize,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self { margin: 70 }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigReadError {
    #[error("failed to read config: {0}")]
    ReadError(std::io::Error),
    #[error("invalid config: {0}")]
    ParseError(toml::de::Error),
}

pub fn load_config<P: AsRef<std::path::Path>>(path: P) -> Result<CheckConfig, ConfigReadError> {
    let config = std::fs::read_to_string(path).map_err(ConfigReadError::ReadError)?;

    parse_config(&config)
}

pub fn parse_config(content: &str) -> Result<CheckConfig, ConfigReadError> {
    toml::from_str::<CheckConfig>(content).map_err(ConfigReadError::ParseError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, CheckConfig::default());
        assert_eq!(config.files.lexicon, "Lexicon");
        assert_eq!(config.grammar.start_symbol, "S");
        assert_eq!(config.output.margin, 70);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [files]
            lexicon = "lexicon.txt"

            [output]
            margin = 40
            "#,
        )
        .unwrap();

        assert_eq!(config.files.lexicon, "lexicon.txt");
        assert_eq!(config.files.grammar, "Grammar");
        assert_eq!(config.output.margin, 40);
        assert_eq!(config.grammar.start_symbol, "S");
    }

    #[test]
    fn wrong_types_are_reported() {
        assert!(matches!(
            parse_config("[output]\nmargin = \"wide\""),
            Err(ConfigReadError::ParseError(_))
        ));
    }
}
