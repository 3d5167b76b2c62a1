use crate::alias::{AliasIndex, CalloutEntry};
use crate::node::ParsedCalloutNode;
use crate::resolve::{ResolvedCallout, compute};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One configured callout kind, as authored in the theme settings.
///
/// `alias` is a pipe-delimited list (`"caution|attention"`); it is only split when the settings are
/// indexed, see [`CalloutEntry::from_definition`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalloutDefinition {
    #[serde(rename = "type", default)]
    pub callout_type: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub color: String,
}

impl CalloutDefinition {
    pub fn new(callout_type: impl Into<String>) -> Self {
        Self {
            callout_type: callout_type.into(),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Process-wide fallbacks consulted when a token does not match any definition (or the matched
/// definition leaves a field empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalloutDefaults {
    #[serde(rename = "callout_fallback_type", default)]
    pub fallback_type: Option<String>,
    #[serde(rename = "callout_fallback_icon", default)]
    pub fallback_icon: Option<String>,
    #[serde(rename = "callout_fallback_color", default)]
    pub fallback_color: Option<String>,
    /// Background opacity in percent (0-100). `None` means 20.
    #[serde(rename = "callout_background_opacity", default)]
    pub background_opacity_percent: Option<f64>,
}

impl CalloutDefaults {
    pub const DEFAULT_BACKGROUND_OPACITY_PERCENT: f64 = 20.0;

    /// Background alpha in `0..=1`.
    pub fn background_opacity(&self) -> f64 {
        self.background_opacity_percent
            .unwrap_or(Self::DEFAULT_BACKGROUND_OPACITY_PERCENT)
            / 100.0
    }

    fn normalized(mut self) -> Self {
        if let Some(pct) = self.background_opacity_percent {
            if !pct.is_finite() {
                tracing::warn!(
                    opacity = pct,
                    "non-finite callout_background_opacity, using default"
                );
                self.background_opacity_percent = None;
            } else if !(0.0..=100.0).contains(&pct) {
                tracing::warn!(opacity = pct, "callout_background_opacity out of 0-100, clamping");
                self.background_opacity_percent = Some(pct.clamp(0.0, 100.0));
            }
        }
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    callouts: Vec<CalloutDefinition>,
    #[serde(flatten)]
    defaults: CalloutDefaults,
}

/// Loaded, indexed callout configuration. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct CalloutSettings {
    index: AliasIndex,
    defaults: CalloutDefaults,
}

impl CalloutSettings {
    pub fn new(definitions: Vec<CalloutDefinition>, defaults: CalloutDefaults) -> Self {
        Self {
            index: AliasIndex::from_definitions(definitions),
            defaults: defaults.normalized(),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let file: SettingsFile =
            serde_json::from_str(text).map_err(|e| Error::InvalidSettingsJson {
                message: e.to_string(),
            })?;
        Ok(Self::new(file.callouts, file.defaults))
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let file: SettingsFile =
            serde_json::from_value(value).map_err(|e| Error::InvalidSettingsJson {
                message: e.to_string(),
            })?;
        Ok(Self::new(file.callouts, file.defaults))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let file: SettingsFile =
            serde_yaml::from_str(text).map_err(|e| Error::InvalidSettingsYaml {
                message: e.to_string(),
            })?;
        Ok(Self::new(file.callouts, file.defaults))
    }

    pub fn index(&self) -> &AliasIndex {
        &self.index
    }

    pub fn defaults(&self) -> &CalloutDefaults {
        &self.defaults
    }

    pub fn find(&self, token: Option<&str>) -> Option<&CalloutEntry> {
        self.index.resolve(token)
    }

    /// Looks up `node.callout_type` and runs the fallback chains.
    pub fn resolve(&self, node: &ParsedCalloutNode) -> ResolvedCallout {
        let matched = self.find(node.callout_type.as_deref());
        if matched.is_none() {
            tracing::debug!(
                token = node.callout_type.as_deref().unwrap_or_default(),
                "callout type not configured, using fallbacks"
            );
        }
        compute(matched, node, &self.defaults)
    }
}
