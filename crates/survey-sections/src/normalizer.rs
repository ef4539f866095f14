//! Section-name canonicalization.
//!
//! Section names are free-form and human-authored, so the same section shows
//! up with stray whitespace, typos and near-duplicate spellings across
//! sources. Canonicalization runs in three phases over every distinct raw
//! name: whitespace stripping, explicit alias substitution, and a fuzzy
//! merge of near-duplicates that prefers the reference source's spelling.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use survey_compare::similarity;
use survey_model::Question;

/// Section name used for questions without one.
pub const DEFAULT_SECTION_NAME: &str = "Other";

/// Similarity at or above which two section names are merged.
pub const SECTION_MERGE_THRESHOLD: f64 = 0.92;

/// One canonical section with the normalized question codes it groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionGroup {
    pub name: String,
    pub codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
}

/// Union-find over canonical-name candidates. Redirect chains collapse
/// through `find`, so merges stay transitive no matter the pair order.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut index: usize) -> usize {
        while self.parent[index] != index {
            self.parent[index] = self.parent[self.parent[index]];
            index = self.parent[index];
        }
        index
    }

    fn union_into(&mut self, loser: usize, winner: usize) {
        let loser_root = self.find(loser);
        let winner_root = self.find(winner);
        if loser_root != winner_root {
            self.parent[loser_root] = winner_root;
        }
    }
}

/// Normalizes raw section names to canonical ones and groups question codes
/// by section in reference-source order.
#[derive(Debug, Clone)]
pub struct SectionNormalizer {
    name_map: BTreeMap<String, String>,
    alias_display: BTreeMap<String, Vec<String>>,
    reference_source: String,
}

impl SectionNormalizer {
    /// Build a normalizer from every source's question list.
    ///
    /// Names are collected reference source first, then the remaining
    /// sources in their given order, each in question order; that ordering
    /// decides which spelling survives a merge when neither side comes from
    /// the reference. `aliases` maps raw or stripped variant names to their
    /// canonical replacement.
    pub fn build(
        all_sources: &[(String, Vec<Question>)],
        reference_source: &str,
        aliases: &BTreeMap<String, String>,
    ) -> Self {
        let source_order = ordered_source_indices(all_sources, reference_source);

        // Distinct raw names per source, in question order.
        let mut raw_names_by_source: Vec<Vec<String>> = vec![Vec::new(); all_sources.len()];
        for &index in &source_order {
            let (_, questions) = &all_sources[index];
            let seen = &mut raw_names_by_source[index];
            for question in questions {
                let name = raw_section_name(question);
                if !seen.contains(&name) {
                    seen.push(name);
                }
            }
        }

        // Globally distinct raw names in processing order.
        let mut ordered_raws: Vec<String> = Vec::new();
        for &index in &source_order {
            for raw in &raw_names_by_source[index] {
                if !ordered_raws.contains(raw) {
                    ordered_raws.push(raw.clone());
                }
            }
        }

        // Phase 1: strip whitespace.
        let mut name_map: BTreeMap<String, String> = BTreeMap::new();
        for raw in &ordered_raws {
            name_map.insert(raw.clone(), raw.trim().to_string());
        }

        // Phase 2: explicit aliases. The stripped candidate is checked
        // first; the raw name as authored is the fallback key.
        for raw in &ordered_raws {
            let candidate = name_map[raw].clone();
            if let Some(target) = aliases.get(&candidate) {
                name_map.insert(raw.clone(), target.clone());
            } else if let Some(target) = aliases.get(raw) {
                name_map.insert(raw.clone(), target.clone());
            }
        }

        // Distinct canonical candidates in processing order.
        let mut canonical_names: Vec<String> = Vec::new();
        for raw in &ordered_raws {
            let canonical = &name_map[raw];
            if !canonical_names.contains(canonical) {
                canonical_names.push(canonical.clone());
            }
        }
        let canonical_index: BTreeMap<&str, usize> = canonical_names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index))
            .collect();

        // Canonical names contributed by the reference source.
        let reference_names: BTreeSet<String> = all_sources
            .iter()
            .position(|(name, _)| name == reference_source)
            .map(|position| {
                raw_names_by_source[position]
                    .iter()
                    .map(|raw| name_map[raw].clone())
                    .collect()
            })
            .unwrap_or_default();

        // Phase 3: fuzzy merge of near-duplicates.
        let mut sets = DisjointSet::new(canonical_names.len());
        for i in 0..canonical_names.len() {
            for j in (i + 1)..canonical_names.len() {
                if sets.find(i) == sets.find(j) {
                    continue;
                }
                let score = similarity(
                    &canonical_names[i].to_lowercase(),
                    &canonical_names[j].to_lowercase(),
                );
                if score < SECTION_MERGE_THRESHOLD {
                    continue;
                }
                let i_is_reference = reference_names.contains(&canonical_names[i]);
                let j_is_reference = reference_names.contains(&canonical_names[j]);
                let (loser, winner) = if j_is_reference && !i_is_reference {
                    (i, j)
                } else {
                    // Reference spelling wins; otherwise the later name
                    // merges into the earlier one.
                    (j, i)
                };
                debug!(
                    from = %canonical_names[loser],
                    into = %canonical_names[winner],
                    score,
                    "merging section names"
                );
                sets.union_into(loser, winner);
            }
        }

        // Resolve redirects transitively into the final raw -> canonical map.
        for raw in &ordered_raws {
            let candidate = name_map[raw].as_str();
            let root = sets.find(canonical_index[candidate]);
            name_map.insert(raw.clone(), canonical_names[root].clone());
        }

        // Variant names for reporting: every stripped spelling that ended up
        // under a different canonical name.
        let mut alias_display: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for raw in &ordered_raws {
            let canonical = &name_map[raw];
            let stripped = raw.trim();
            if stripped != canonical {
                let variants = alias_display.entry(canonical.clone()).or_default();
                if !variants.iter().any(|v| v == stripped) {
                    variants.push(stripped.to_string());
                }
            }
        }

        Self {
            name_map,
            alias_display,
            reference_source: reference_source.to_string(),
        }
    }

    /// Canonical section name for a raw one. Names never seen during the
    /// build fall back to their stripped spelling.
    pub fn normalize(&self, raw_name: &str) -> String {
        self.name_map
            .get(raw_name)
            .cloned()
            .unwrap_or_else(|| raw_name.trim().to_string())
    }

    /// Variant names that collapsed into `canonical_name`.
    pub fn aliases_for(&self, canonical_name: &str) -> &[String] {
        self.alias_display
            .get(canonical_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All canonical names that absorbed at least one variant.
    pub fn all_aliases(&self) -> &BTreeMap<String, Vec<String>> {
        &self.alias_display
    }

    /// Group normalized question codes by canonical section.
    ///
    /// Sections appear in reference-source order (sections only found in
    /// other sources are appended at first encounter), questions within a
    /// source in `section_index` order. Each normalized code lands in
    /// exactly one section: the first one it is seen under.
    pub fn ordered_sections(&self, all_sources: &[(String, Vec<Question>)]) -> Vec<SectionGroup> {
        let source_order = ordered_source_indices(all_sources, &self.reference_source);

        let mut section_order: Vec<String> = Vec::new();
        let mut section_codes: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut seen_codes: BTreeSet<String> = BTreeSet::new();

        for &index in &source_order {
            let (_, questions) = &all_sources[index];
            let mut ordered: Vec<&Question> = questions.iter().collect();
            ordered.sort_by_key(|q| q.section_index);
            for question in ordered {
                let canonical = self.normalize(&raw_section_name(question));
                if !section_order.contains(&canonical) {
                    section_order.push(canonical.clone());
                    section_codes.insert(canonical.clone(), Vec::new());
                }
                let code = question.normalized_code();
                if seen_codes.insert(code.clone()) {
                    section_codes
                        .get_mut(&canonical)
                        .expect("section registered above")
                        .push(code);
                }
            }
        }

        section_order
            .into_iter()
            .map(|name| {
                let aliases = self.aliases_for(&name);
                SectionGroup {
                    codes: section_codes.remove(&name).unwrap_or_default(),
                    aliases: if aliases.is_empty() {
                        None
                    } else {
                        Some(aliases.to_vec())
                    },
                    name,
                }
            })
            .collect()
    }
}

fn raw_section_name(question: &Question) -> String {
    question
        .section_name
        .clone()
        .unwrap_or_else(|| DEFAULT_SECTION_NAME.to_string())
}

/// Source indices with the reference source first, the rest in given order.
fn ordered_source_indices(sources: &[(String, Vec<Question>)], reference: &str) -> Vec<usize> {
    let mut order: Vec<usize> = Vec::with_capacity(sources.len());
    if let Some(position) = sources.iter().position(|(name, _)| name == reference) {
        order.push(position);
    }
    for (position, (name, _)) in sources.iter().enumerate() {
        if name != reference {
            order.push(position);
        }
    }
    order
}
