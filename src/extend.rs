//! Extend engine
//!
//! `@extend` declarations collected during evaluation are keyed into a
//! subset map: key = the extended compound, value = the extending complex
//! selector. Propagation rewrites each rule's selector list by replacing
//! the matched part of a compound with the extender, threaded through the
//! extender's chain, and iterates to a fixed point. Provenance sources
//! carried on every compound stop an extender from extending through
//! itself.

use crate::context::Context;
use crate::error::{CompilerError, Result};
use crate::position::SourceSpan;
use crate::selector::{Complex, Compound, SelectorList};
use crate::selector_ops::{compound_minus, naive_trim, unify_compound};
use std::collections::{HashMap, HashSet};

/// Propagation rounds before the engine gives up; the sources provenance
/// makes this unreachable for well-formed input.
const MAX_EXTEND_ITERATIONS: usize = 100;

/// One `@extend` collected during evaluation: `extender { @extend target }`.
#[derive(Debug, Clone)]
pub struct Extension {
    pub span: SourceSpan,
    /// The selector named by the `@extend`
    pub target: SelectorList,
    /// Selector list of the rule the `@extend` appeared in
    pub extender: SelectorList,
}

#[derive(Debug, Clone)]
pub struct MapEntry {
    pub key: Compound,
    pub extender: Complex,
    pub span: SourceSpan,
}

/// Map from compound keys to extenders supporting subset lookup: a query
/// compound matches every key that is a subset of it.
#[derive(Debug, Default)]
pub struct SubsetMap {
    entries: Vec<MapEntry>,
    index: HashMap<String, Vec<usize>>,
}

impl SubsetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: Compound, extender: Complex, span: SourceSpan) {
        let idx = self.entries.len();
        for text in key.sorted_texts() {
            self.index.entry(text).or_default().push(idx);
        }
        self.entries.push(MapEntry {
            key,
            extender,
            span,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    /// Indices of every entry whose key is a subset of `compound`, in
    /// insertion order.
    pub fn get_kv(&self, compound: &Compound) -> Vec<usize> {
        let texts: HashSet<String> = compound.simples().iter().map(|s| s.to_string()).collect();
        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for text in &texts {
            if let Some(indices) = self.index.get(text) {
                for &i in indices {
                    if seen.insert(i)
                        && self.entries[i]
                            .key
                            .sorted_texts()
                            .iter()
                            .all(|t| texts.contains(t))
                    {
                        hits.push(i);
                    }
                }
            }
        }
        hits.sort_unstable();
        hits
    }
}

/// Runs `@extend` propagation over rule selector lists.
#[derive(Debug, Default)]
pub struct Extender {
    map: SubsetMap,
    matched: HashSet<usize>,
}

impl Extender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the subset map from collected extensions. An `@extend` target
    /// must be a single compound selector.
    pub fn from_extensions(extensions: &[Extension]) -> Result<Self> {
        let mut map = SubsetMap::new();
        for extension in extensions {
            for target in &extension.target.items {
                if target.tail.is_some() {
                    return Err(CompilerError::extend(
                        extension.span,
                        format!("can't extend complex selector \"{}\"", target),
                    ));
                }
                for extender in &extension.extender.items {
                    map.put(target.head.clone(), extender.clone(), extension.span);
                }
            }
        }
        Ok(Self {
            map,
            matched: HashSet::new(),
        })
    }

    /// Alternatives produced by applying one matching extension at one
    /// compound position of `complex`.
    fn apply_extensions(&mut self, complex: &Complex) -> Vec<Complex> {
        let links = complex.to_links();
        let mut out = Vec::new();
        for (pos, (compound, combinator)) in links.iter().enumerate() {
            let hits: Vec<(usize, Compound, Complex)> = self
                .map
                .get_kv(compound)
                .into_iter()
                .map(|i| {
                    let entry = &self.map.entries()[i];
                    (i, entry.key.clone(), entry.extender.clone())
                })
                .collect();
            for (idx, key, extender) in hits {
                let extender_text = extender.to_string();
                if compound.sources.contains(&extender_text) {
                    log::debug!("skipping cyclic extension of {} by {}", compound, extender);
                    continue;
                }
                self.matched.insert(idx);

                let diff = compound_minus(compound, &key);
                let extender_links = extender.to_links();
                let (extender_last, extender_init) = extender_links.split_last().unwrap();
                let merged = match unify_compound(&diff, &extender_last.0) {
                    Some(merged) => merged,
                    None => continue,
                };

                let mut merged = merged;
                merged.merge_sources(&compound.sources);
                merged.merge_sources(&extender.sources());
                merged.sources.insert(extender_text);

                let mut new_links = links[..pos].to_vec();
                new_links.extend(extender_init.to_vec());
                new_links.push((merged, *combinator));
                new_links.extend(links[pos + 1..].to_vec());
                if let Some(new_complex) = Complex::from_links(complex.span, new_links) {
                    out.push(new_complex);
                }
            }
        }
        out
    }

    /// Augment one rule's selector list with extended alternatives,
    /// iterating to a fixed point, then trim duplicates.
    pub fn extend_list(&mut self, list: &SelectorList) -> SelectorList {
        let mut items = list.items.clone();
        for iteration in 1.. {
            let mut added = false;
            let snapshot = items.clone();
            for complex in &snapshot {
                for new_complex in self.apply_extensions(complex) {
                    if !items.contains(&new_complex) {
                        items.push(new_complex);
                        added = true;
                    }
                }
            }
            if !added {
                break;
            }
            if iteration >= MAX_EXTEND_ITERATIONS {
                log::warn!("extend propagation stopped after {} rounds", iteration);
                break;
            }
        }

        let mut result = SelectorList::of(list.span, naive_trim(items));
        result.media_context = list.media_context;
        result
    }

    /// Surface extensions whose target never matched any rule: a warning
    /// by default, an error under `strict_extend`.
    pub fn report_unmatched(&self, ctx: &mut Context) -> Result<()> {
        for (i, entry) in self.map.entries().iter().enumerate() {
            if self.matched.contains(&i) {
                continue;
            }
            let message = format!(
                "\"{}\" failed to @extend \"{}\": the target selector was not found",
                entry.extender, entry.key
            );
            if ctx.options.strict_extend {
                return Err(CompilerError::extend(entry.span, message));
            }
            ctx.warn(entry.span, message);
        }
        Ok(())
    }
}

/// Propagate `@extend` across a rule list and drop alternatives that still
/// carry a placeholder from the emission lists.
pub fn extend(
    rules: Vec<SelectorList>,
    extensions: &[Extension],
    ctx: &mut Context,
) -> Result<Vec<SelectorList>> {
    let mut extender = Extender::from_extensions(extensions)?;
    let mut extended: Vec<SelectorList> = rules
        .iter()
        .map(|rule| extender.extend_list(rule))
        .collect();
    extender.report_unmatched(ctx)?;

    for list in &mut extended {
        list.items.retain(|c| !c.contains_placeholder());
    }
    Ok(extended)
}
