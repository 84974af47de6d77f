use serde::{Deserialize, Serialize};

/// Query parameters understood by the GET side of an action view.
///
/// `data` stays raw JSON text here; the dispatcher parses it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionQuery {
    pub action: Option<String>,
    pub data: Option<String>,
}

impl ActionQuery {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            data: None,
        }
    }

    pub fn with_data(mut self, data: &serde_json::Value) -> Self {
        self.data = Some(data.to_string());
        self
    }

    /// Pick `action` and `data` out of decoded query pairs. A repeated key keeps its
    /// last value; other keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "action" => query.action = Some(value.into()),
                "data" => query.data = Some(value.into()),
                _ => {}
            }
        }
        query
    }
}

/// Body of a POST action request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEnvelope<T = serde_json::Value> {
    pub action: String,
    pub data: T,
}

impl<T> ActionEnvelope<T> {
    pub fn new(action: impl Into<String>, data: T) -> Self {
        Self {
            action: action.into(),
            data,
        }
    }
}
