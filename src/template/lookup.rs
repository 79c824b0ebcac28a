//! Definition storage and use-site resolution.
//!
//! Definitions live in one `Vec` owned by the [`DefinitionTable`]; the
//! name indices hold [`DefId`] positions rather than references, so
//! registering new definitions mid-scan never invalidates anything.

use rustc_hash::FxHashMap;

use crate::template::TemplateDefinition;

/// Index of a definition inside a [`DefinitionTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefId(usize);

/// All template definitions captured from one file, with name indices.
#[derive(Default)]
pub struct DefinitionTable {
    defs: Vec<TemplateDefinition>,
    by_full_name: FxHashMap<String, DefId>,
    by_short_name: FxHashMap<String, Vec<DefId>>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition; its `scope_path` must already be stamped.
    pub fn insert(&mut self, def: TemplateDefinition) -> DefId {
        let id = DefId(self.defs.len());
        self.by_full_name.insert(def.full_name(), id);
        self.by_short_name
            .entry(def.name.clone())
            .or_default()
            .push(id);
        self.defs.push(def);
        id
    }

    pub fn get(&self, id: DefId) -> &TemplateDefinition {
        &self.defs[id.0]
    }

    pub fn get_mut(&mut self, id: DefId) -> &mut TemplateDefinition {
        &mut self.defs[id.0]
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Resolve a use-site token against the registered definitions.
    ///
    /// A fully qualified token that exactly matches a definition's full
    /// name wins outright. Otherwise every definition sharing the token's
    /// short name is scored and the best strictly-positive score wins;
    /// ties keep the earliest-registered candidate, and iteration stops
    /// early once an exact-prefix match (score ≥ 1000) is seen.
    pub fn resolve(&self, token: &str, current_scope: &str) -> Option<DefId> {
        let (prefix, base) = match token.rfind('.') {
            Some(dot) => (&token[..dot], &token[dot + 1..]),
            None => ("", token),
        };

        if !prefix.is_empty() {
            if let Some(&id) = self.by_full_name.get(token) {
                return Some(id);
            }
        }

        let candidates = self.by_short_name.get(base)?;

        let mut best = None;
        let mut best_score = 0;
        for &id in candidates {
            let score = score_candidate(self.get(id), prefix, current_scope);
            if score > best_score {
                best_score = score;
                best = Some(id);
            }
            if score >= 1000 {
                break;
            }
        }
        best
    }
}

/// Score one candidate definition for a use site.
///
/// Higher wins. Zero means the candidate is not visible from the use site
/// at all.
fn score_candidate(def: &TemplateDefinition, prefix: &str, current_scope: &str) -> usize {
    let scope = def.scope_path.as_str();

    if !prefix.is_empty() {
        if scope == prefix {
            return 1000 + scope.len();
        }
        if scope.len() > prefix.len() && scope.ends_with(prefix) {
            let boundary = scope.len() - prefix.len();
            if scope.as_bytes()[boundary - 1] == b'.' {
                return 700 + prefix.len();
            }
        }
    }

    if scope == current_scope {
        return 800 + scope.len();
    }

    if !scope.is_empty()
        && current_scope.len() > scope.len()
        && current_scope.starts_with(scope)
        && current_scope.as_bytes()[scope.len()] == b'.'
    {
        return 400 + scope.len();
    }

    if scope.is_empty() {
        return 100;
    }

    0
}
