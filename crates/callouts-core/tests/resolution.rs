use callouts_core::color::hex_to_rgba;
use callouts_core::sanitize::{DEFAULT_ICON_SIZE, create_safe_svg};
use callouts_core::utils::capitalize_first_letter;
use callouts_core::{CalloutSettings, IconSource, ParsedCalloutNode};

const THEME_SETTINGS: &str = r##"{
    "callouts": [
        {"type": "note", "alias": "", "icon": "far-pen-to-square", "title": "", "color": "#086ddd"},
        {"type": "warning", "alias": "caution|attention", "icon": "triangle-exclamation",
         "title": "Custom Warning", "color": "#ec7500"},
        {"type": "tip", "alias": "hint", "icon": "fire-flame-curved", "title": "Pro Tip", "color": "#00bfbc"},
        {"type": "example", "alias": "", "icon": "list", "title": "", "color": "#7852ee"}
    ],
    "callout_fallback_type": "note",
    "callout_fallback_icon": "far-pen-to-square",
    "callout_fallback_color": "#027aff"
}"##;

fn settings() -> CalloutSettings {
    CalloutSettings::from_json_str(THEME_SETTINGS).expect("valid settings")
}

#[test]
fn documented_color_and_title_examples() {
    assert_eq!(hex_to_rgba("#f00", 0.2), "rgba(255,0,0, 0.2)");
    assert_eq!(hex_to_rgba("086ddd", 0.2), "rgba(8,109,221, 0.2)");
    assert_eq!(capitalize_first_letter(Some("note")).as_deref(), Some("Note"));
}

#[test]
fn warning_alias_scenario() {
    let node = ParsedCalloutNode::new("caution")
        .with_fold("")
        .with_html("<p>This is a warning callout</p>");
    let resolved = settings().resolve(&node);
    assert_eq!(resolved.display_type, "caution");
    assert_eq!(resolved.canonical_type, "warning");
    assert_eq!(resolved.title, "Custom Warning");
    assert!(resolved.is_collapsible);
    assert!(!resolved.initially_collapsed);
}

#[test]
fn every_configured_token_resolves_to_its_definition() {
    let settings = settings();
    for entry in settings.index().entries() {
        for token in entry.types() {
            let resolved = settings.resolve(&ParsedCalloutNode::new(token.to_uppercase()));
            assert_eq!(resolved.canonical_type, entry.canonical_type());
            assert_eq!(resolved.display_type, token.to_uppercase());
        }
    }
}

#[test]
fn unconfigured_tokens_fall_through_to_fallback_type() {
    let settings = settings();
    for token in ["unknown-type", "notes", "warn", "tipp"] {
        assert!(settings.find(Some(token)).is_none());
        let resolved = settings.resolve(&ParsedCalloutNode::new(token));
        assert_eq!(resolved.canonical_type, "note");
        assert_eq!(resolved.display_type, "note");
        assert_eq!(resolved.icon, IconSource::Glyph("far-pen-to-square".to_string()));
    }
}

#[test]
fn sanitized_icons_never_carry_script() {
    let hostile = [
        r#"<svg><script>alert(1)</script><path d="M0 0"/></svg>"#,
        r#"<svg onclick="alert(1)"><path d="M0 0"/></svg>"#,
        r#"<svg><path onclick="alert(1)" d="M0 0"/></svg>"#,
        r#"<svg><g><SCRIPT>alert(1)</SCRIPT></g></svg>"#,
    ];
    for markup in hostile {
        let out = create_safe_svg(markup, DEFAULT_ICON_SIZE).expect("svg root survives");
        let lc = out.to_ascii_lowercase();
        assert!(!lc.contains("script"), "{out}");
        assert!(!lc.contains("onclick"), "{out}");
        assert!(!lc.contains("alert"), "{out}");
    }
}

#[test]
fn markup_without_root_svg_is_rejected() {
    for markup in ["<svg", "<p>hi</p>", "<svgfoo></svgfoo>", "<script></script>"] {
        assert_eq!(create_safe_svg(markup, DEFAULT_ICON_SIZE), None, "{markup}");
    }
}
