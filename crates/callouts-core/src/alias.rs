use crate::config::CalloutDefinition;
use rustc_hash::FxHashMap;

/// A [`CalloutDefinition`] with its lookup tokens expanded.
///
/// `types` always starts with the canonical type, followed by the split aliases, so canonical and
/// alias lookups share one code path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutEntry {
    pub definition: CalloutDefinition,
    types: Vec<String>,
}

impl CalloutEntry {
    pub fn from_definition(definition: CalloutDefinition) -> Self {
        let mut types = vec![definition.callout_type.trim().to_lowercase()];
        types.extend(
            definition
                .alias
                .split('|')
                .map(|alias| alias.trim().to_lowercase())
                .filter(|alias| !alias.is_empty()),
        );
        Self { definition, types }
    }

    pub fn canonical_type(&self) -> &str {
        self.types.first().map_or("", String::as_str)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.types.iter().skip(1).map(String::as_str)
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// `token` must already be lower-cased.
    fn matches(&self, token: &str) -> bool {
        self.types.iter().any(|t| !t.is_empty() && t == token)
    }
}

fn normalize_token(token: Option<&str>) -> Option<String> {
    let token = token?.to_lowercase();
    (!token.is_empty()).then_some(token)
}

/// Linear lookup over already expanded entries, in configured order.
pub fn find_callout_setting<'a>(
    entries: &'a [CalloutEntry],
    token: Option<&str>,
) -> Option<&'a CalloutEntry> {
    let token = normalize_token(token)?;
    entries.iter().find(|entry| entry.matches(&token))
}

/// Token → definition lookup built once when configuration loads.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    entries: Vec<CalloutEntry>,
    by_token: FxHashMap<String, usize>,
}

impl AliasIndex {
    pub fn from_definitions(definitions: impl IntoIterator<Item = CalloutDefinition>) -> Self {
        let entries: Vec<CalloutEntry> = definitions
            .into_iter()
            .map(CalloutEntry::from_definition)
            .collect();

        let mut by_token: FxHashMap<String, usize> = FxHashMap::default();
        for (pos, entry) in entries.iter().enumerate() {
            for token in entry.types().iter().filter(|t| !t.is_empty()) {
                // First definition in configured order wins.
                if let Some(&owner) = by_token.get(token) {
                    if owner != pos {
                        tracing::warn!(
                            token = token.as_str(),
                            kept = entries[owner].canonical_type(),
                            ignored = entry.canonical_type(),
                            "callout token configured more than once"
                        );
                    }
                    continue;
                }
                by_token.insert(token.clone(), pos);
            }
        }

        Self { entries, by_token }
    }

    pub fn resolve(&self, token: Option<&str>) -> Option<&CalloutEntry> {
        let token = normalize_token(token)?;
        self.by_token.get(&token).map(|&pos| &self.entries[pos])
    }

    pub fn entries(&self) -> &[CalloutEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
