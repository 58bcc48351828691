use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A chat-completion model identifier.
///
/// Models we have pricing for are `Known`; everything else (self-hosted
/// models, other providers behind a compatible endpoint) is carried verbatim
/// as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier
    Custom(String),
}

/// Models with a known price.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// GPT-4o mini
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,

    /// GPT-4o
    #[serde(rename = "gpt-4o")]
    Gpt4o,

    /// o3-mini
    #[serde(rename = "o3-mini")]
    O3Mini,
}

impl KnownModel {
    /// All known models.
    pub const ALL: [KnownModel; 3] = [KnownModel::Gpt4oMini, KnownModel::Gpt4o, KnownModel::O3Mini];

    /// The identifier the API expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownModel::Gpt4oMini => "gpt-4o-mini",
            KnownModel::Gpt4o => "gpt-4o",
            KnownModel::O3Mini => "o3-mini",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{known_model}"),
            Model::Custom(custom) => write!(f, "{custom}"),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(KnownModel::ALL
            .into_iter()
            .find(|known| known.as_str() == s)
            .map(Model::Known)
            .unwrap_or_else(|| Model::Custom(s.to_string())))
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        let Ok(parsed) = model.parse::<Model>();
        parsed
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Model::from(model.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_model_serialization() {
        let model = Model::Known(KnownModel::Gpt4oMini);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""gpt-4o-mini""#);

        let model = Model::Known(KnownModel::O3Mini);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""o3-mini""#);
    }

    #[test]
    fn model_deserialization() {
        let model: Model = serde_json::from_str(r#""gpt-4o""#).unwrap();
        assert_eq!(model, Model::Known(KnownModel::Gpt4o));

        let model: Model = serde_json::from_str(r#""llama3.1:8b""#).unwrap();
        assert_eq!(model, Model::Custom("llama3.1:8b".to_string()));
    }

    #[test]
    fn parse_never_fails() {
        assert_eq!(
            "gpt-4o-mini".parse::<Model>().unwrap(),
            Model::Known(KnownModel::Gpt4oMini)
        );
        assert_eq!(
            " my-model ".parse::<Model>().unwrap(),
            Model::Custom("my-model".to_string())
        );
        assert_eq!(Model::from("o3-mini"), Model::Known(KnownModel::O3Mini));
    }

    #[test]
    fn display() {
        assert_eq!(Model::Known(KnownModel::Gpt4o).to_string(), "gpt-4o");
        assert_eq!(Model::Custom("mine".to_string()).to_string(), "mine");
    }
}
