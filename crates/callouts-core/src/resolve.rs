use crate::alias::CalloutEntry;
use crate::color::hex_to_rgba;
use crate::config::CalloutDefaults;
use crate::icons::{IconRegistry, IconSource, render_icon};
use crate::node::ParsedCalloutNode;
use crate::utils::{capitalize_first_letter, null_if_empty};
use serde::Serialize;

pub const LITERAL_FALLBACK_TYPE: &str = "note";
pub const LITERAL_FALLBACK_TITLE: &str = "Note";
pub const LITERAL_FALLBACK_ICON: &str = "pencil";
pub const LITERAL_FALLBACK_COLOR: &str = "#ff0000";

/// Everything needed to render one callout occurrence. Recomputed per render, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCallout {
    pub canonical_type: String,
    /// Value of `data-callout-type`: the authored token when it matched a definition (so aliases
    /// keep their spelling), the canonical type otherwise.
    pub display_type: String,
    pub title: String,
    pub icon: IconSource,
    pub color: String,
    pub background_color: String,
    pub is_collapsible: bool,
    pub initially_collapsed: bool,
}

impl ResolvedCallout {
    pub fn background_style(&self) -> String {
        format!("background-color: {}", self.background_color)
    }

    pub fn icon_markup(&self, registry: &dyn IconRegistry) -> Option<String> {
        render_icon(&self.icon, registry)
    }
}

/// Runs the independent fallback chains for one node.
///
/// `matched` is the result of the alias lookup for `node.callout_type`; each chain picks the first
/// non-empty candidate.
pub fn compute(
    matched: Option<&CalloutEntry>,
    node: &ParsedCalloutNode,
    defaults: &CalloutDefaults,
) -> ResolvedCallout {
    let definition = matched.map(|entry| &entry.definition);

    let canonical_type = matched
        .and_then(|entry| null_if_empty(Some(entry.canonical_type())))
        .or_else(|| null_if_empty(defaults.fallback_type.as_deref()))
        .unwrap_or(LITERAL_FALLBACK_TYPE)
        .to_string();

    let display_type = match matched {
        Some(_) => node
            .callout_type
            .clone()
            .unwrap_or_else(|| canonical_type.clone()),
        None => canonical_type.clone(),
    };

    let title = null_if_empty(node.title.as_deref())
        .or_else(|| null_if_empty(definition.map(|d| d.title.as_str())))
        .map(str::to_string)
        .or_else(|| capitalize_first_letter(Some(display_type.as_str())))
        .unwrap_or_else(|| LITERAL_FALLBACK_TITLE.to_string());

    let icon_raw = null_if_empty(definition.map(|d| d.icon.as_str()))
        .or_else(|| null_if_empty(defaults.fallback_icon.as_deref()))
        .unwrap_or(LITERAL_FALLBACK_ICON);

    let color = null_if_empty(definition.map(|d| d.color.as_str()))
        .or_else(|| null_if_empty(defaults.fallback_color.as_deref()))
        .unwrap_or(LITERAL_FALLBACK_COLOR)
        .to_string();
    let background_color = hex_to_rgba(&color, defaults.background_opacity());

    let is_collapsible = node.fold.is_some() && !node.children.is_empty();
    let initially_collapsed = is_collapsible && node.fold.as_deref().map(str::trim) == Some("-");

    ResolvedCallout {
        canonical_type,
        display_type,
        title,
        icon: IconSource::parse(icon_raw),
        color,
        background_color,
        is_collapsible,
        initially_collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CalloutDefinition, CalloutSettings};

    fn theme_settings() -> CalloutSettings {
        CalloutSettings::new(
            vec![
                CalloutDefinition::new("note")
                    .with_icon("far-pen-to-square")
                    .with_color("#086ddd"),
                CalloutDefinition::new("warning")
                    .with_alias("caution|attention")
                    .with_icon("triangle-exclamation")
                    .with_title("Custom Warning")
                    .with_color("#ec7500"),
                CalloutDefinition::new("tip")
                    .with_alias("hint")
                    .with_icon("fire-flame-curved")
                    .with_title("Pro Tip")
                    .with_color("#00bfbc"),
                CalloutDefinition::new("example")
                    .with_icon("list")
                    .with_color("#7852ee"),
            ],
            CalloutDefaults {
                fallback_type: Some("note".to_string()),
                fallback_icon: Some("far-pen-to-square".to_string()),
                fallback_color: Some("#027aff".to_string()),
                background_opacity_percent: None,
            },
        )
    }

    #[test]
    fn alias_resolves_to_definition_and_keeps_authored_spelling() {
        let node = ParsedCalloutNode::new("caution")
            .with_fold("")
            .with_text("This is a warning callout");
        let resolved = theme_settings().resolve(&node);

        assert_eq!(resolved.display_type, "caution");
        assert_eq!(resolved.canonical_type, "warning");
        assert_eq!(resolved.title, "Custom Warning");
        assert_eq!(
            resolved.icon,
            IconSource::Glyph("triangle-exclamation".to_string())
        );
        assert_eq!(resolved.background_color, "rgba(236,117,0, 0.2)");
        assert!(resolved.is_collapsible);
        assert!(!resolved.initially_collapsed);
    }

    #[test]
    fn unknown_type_falls_back_to_configured_defaults() {
        let node = ParsedCalloutNode::new("unknown-type").with_text("This should use fallback");
        let resolved = theme_settings().resolve(&node);

        assert_eq!(resolved.display_type, "note");
        assert_eq!(resolved.canonical_type, "note");
        assert_eq!(resolved.title, "Note");
        assert_eq!(
            resolved.icon,
            IconSource::Glyph("far-pen-to-square".to_string())
        );
        assert_eq!(resolved.color, "#027aff");
    }

    #[test]
    fn literal_fallbacks_apply_without_any_configuration() {
        let resolved = CalloutSettings::default().resolve(&ParsedCalloutNode::new("whatever"));
        assert_eq!(resolved.canonical_type, "note");
        assert_eq!(resolved.display_type, "note");
        assert_eq!(resolved.title, "Note");
        assert_eq!(resolved.icon, IconSource::Glyph("pencil".to_string()));
        assert_eq!(resolved.color, "#ff0000");
        assert_eq!(resolved.background_color, "rgba(255,0,0, 0.2)");
        assert_eq!(
            resolved.background_style(),
            "background-color: rgba(255,0,0, 0.2)"
        );
    }

    #[test]
    fn custom_fallback_type_drives_title_when_unmatched() {
        let settings = CalloutSettings::new(
            Vec::new(),
            CalloutDefaults {
                fallback_type: Some("info".to_string()),
                ..Default::default()
            },
        );
        let resolved = settings.resolve(&ParsedCalloutNode::default());
        assert_eq!(resolved.canonical_type, "info");
        assert_eq!(resolved.display_type, "info");
        assert_eq!(resolved.title, "Info");
    }

    #[test]
    fn title_precedence_inline_then_definition_then_type() {
        let settings = theme_settings();

        let inline = settings.resolve(&ParsedCalloutNode::new("tip").with_title("  My Custom Title "));
        assert_eq!(inline.title, "My Custom Title");

        let blank_inline = settings.resolve(&ParsedCalloutNode::new("tip").with_title("   "));
        assert_eq!(blank_inline.title, "Pro Tip");

        let from_type = settings.resolve(&ParsedCalloutNode::new("example"));
        assert_eq!(from_type.title, "Example");

        let aliased = settings.resolve(&ParsedCalloutNode::new("hint"));
        assert_eq!(aliased.display_type, "hint");
        assert_eq!(aliased.title, "Pro Tip");
    }

    #[test]
    fn matched_type_keeps_authored_case_for_display() {
        let resolved = theme_settings().resolve(&ParsedCalloutNode::new("Example"));
        assert_eq!(resolved.canonical_type, "example");
        assert_eq!(resolved.display_type, "Example");
        assert_eq!(resolved.title, "Example");
    }

    #[test]
    fn empty_definition_fields_fall_through_to_defaults() {
        let settings = CalloutSettings::new(
            vec![CalloutDefinition::new("bare")],
            CalloutDefaults {
                fallback_icon: Some("circle-info".to_string()),
                fallback_color: Some("#abc".to_string()),
                background_opacity_percent: Some(50.0),
                ..Default::default()
            },
        );
        let resolved = settings.resolve(&ParsedCalloutNode::new("bare"));
        assert_eq!(resolved.canonical_type, "bare");
        assert_eq!(resolved.title, "Bare");
        assert_eq!(resolved.icon, IconSource::Glyph("circle-info".to_string()));
        assert_eq!(resolved.background_color, "rgba(170,187,204, 0.5)");
    }

    #[test]
    fn definition_with_inline_svg_icon_is_detected() {
        let settings = CalloutSettings::new(
            vec![CalloutDefinition::new("bolt").with_icon("<svg viewBox=\"0 0 1 1\"></svg>")],
            CalloutDefaults::default(),
        );
        let resolved = settings.resolve(&ParsedCalloutNode::new("bolt"));
        assert!(matches!(resolved.icon, IconSource::InlineSvg(_)));
    }

    #[test]
    fn absent_fold_is_never_collapsible() {
        let settings = theme_settings();
        let with_children = ParsedCalloutNode::new("note").with_text("x").with_html("<p>y</p>");
        let resolved = settings.resolve(&with_children);
        assert!(!resolved.is_collapsible);
        assert!(!resolved.initially_collapsed);
    }

    #[test]
    fn fold_without_children_is_not_collapsible() {
        let resolved = theme_settings().resolve(&ParsedCalloutNode::new("note").with_fold("-"));
        assert!(!resolved.is_collapsible);
        assert!(!resolved.initially_collapsed);
    }

    #[test]
    fn fold_directive_picks_initial_state() {
        let settings = theme_settings();
        let collapsed = settings.resolve(&ParsedCalloutNode::new("note").with_fold("-").with_text("x"));
        assert!(collapsed.is_collapsible);
        assert!(collapsed.initially_collapsed);

        let open = settings.resolve(&ParsedCalloutNode::new("note").with_fold("+").with_text("x"));
        assert!(open.is_collapsible);
        assert!(!open.initially_collapsed);
    }

    #[test]
    fn compute_is_usable_without_settings_wrapper() {
        let entry = CalloutEntry::from_definition(
            CalloutDefinition::new("warning").with_title("Careful").with_color("f00"),
        );
        let node = ParsedCalloutNode::new("WARNING");
        let resolved = compute(Some(&entry), &node, &CalloutDefaults::default());
        assert_eq!(resolved.display_type, "WARNING");
        assert_eq!(resolved.title, "Careful");
        assert_eq!(resolved.background_color, "rgba(255,0,0, 0.2)");
    }
}
