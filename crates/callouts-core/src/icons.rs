use crate::sanitize::{DEFAULT_ICON_SIZE, create_safe_svg};
use htmlize::escape_attribute;
use serde::Serialize;

/// Prefix that marks a configured icon as raw inline SVG rather than a glyph key.
pub const INLINE_SVG_MARKER: &str = "<svg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IconSource {
    /// A key into the glyph registry (e.g. `triangle-exclamation`).
    Glyph(String),
    /// Author-supplied SVG markup; untrusted until sanitized.
    InlineSvg(String),
}

impl IconSource {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with(INLINE_SVG_MARKER) {
            Self::InlineSvg(raw.to_string())
        } else {
            Self::Glyph(raw.to_string())
        }
    }
}

/// Glyph key → markup. Implementations are trusted: keys only ever come from configuration.
pub trait IconRegistry {
    fn icon_html(&self, key: &str) -> String;
}

impl<F> IconRegistry for F
where
    F: Fn(&str) -> String,
{
    fn icon_html(&self, key: &str) -> String {
        self(key)
    }
}

/// Emits references into an SVG sprite sheet, in the markup shape Discourse's `iconHTML` uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteIconRegistry;

impl IconRegistry for SpriteIconRegistry {
    fn icon_html(&self, key: &str) -> String {
        let key = escape_attribute(key);
        format!(
            r##"<svg class="fa d-icon d-icon-{key} svg-icon svg-string" xmlns="http://www.w3.org/2000/svg"><use href="#{key}"></use></svg>"##
        )
    }
}

/// Renders an icon source. Inline SVG goes through [`create_safe_svg`] and yields `None` when
/// nothing safe is left; glyph keys are delegated to `registry`.
pub fn render_icon(source: &IconSource, registry: &dyn IconRegistry) -> Option<String> {
    match source {
        IconSource::Glyph(key) => Some(registry.icon_html(key)),
        IconSource::InlineSvg(markup) => create_safe_svg(markup, DEFAULT_ICON_SIZE),
    }
}
