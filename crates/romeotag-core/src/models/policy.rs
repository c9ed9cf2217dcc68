use serde::{Deserialize, Serialize};

/// Self-archiving policy of one publisher, as reported by RoMEO.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub pre_archiving: String,
    pub post_archiving: String,
    pub pdf_archiving: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romeo_colour: Option<String>,
}

impl Publisher {
    pub fn new(
        pre_archiving: impl Into<String>,
        post_archiving: impl Into<String>,
        pdf_archiving: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            pre_archiving: pre_archiving.into(),
            post_archiving: post_archiving.into(),
            pdf_archiving: pdf_archiving.into(),
            romeo_colour: None,
        }
    }
}

/// Result of one registry query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyLookup {
    /// The ISSN or title the registry was queried with.
    pub source_key: String,
    pub publishers: Vec<Publisher>,
    pub hits: u32,
}
