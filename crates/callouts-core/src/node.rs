use serde::{Deserialize, Serialize};

/// A rendered child of a callout, as handed over by the external parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentNode {
    /// Plain text; escaped when rendered.
    Text(String),
    /// Markup already produced (and cooked) by the parser; emitted verbatim.
    Html(String),
}

/// One callout occurrence in authored content. Read-only to this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCalloutNode {
    #[serde(rename = "type", default)]
    pub callout_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// `Some("-")` starts collapsed, any other present value starts open, `None` is not
    /// collapsible.
    #[serde(default)]
    pub fold: Option<String>,
    #[serde(default)]
    pub children: Vec<ContentNode>,
}

impl ParsedCalloutNode {
    pub fn new(callout_type: impl Into<String>) -> Self {
        Self {
            callout_type: Some(callout_type.into()),
            ..Default::default()
        }
    }

    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        serde_json::from_str(text).map_err(|e| crate::Error::InvalidNodeJson {
            message: e.to_string(),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_fold(mut self, fold: impl Into<String>) -> Self {
        self.fold = Some(fold.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(ContentNode::Text(text.into()));
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.children.push(ContentNode::Html(html.into()));
        self
    }
}
