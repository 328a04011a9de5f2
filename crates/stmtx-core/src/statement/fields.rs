//! Account field extraction via ordered pattern chains.
//!
//! Each field has a priority list of patterns. The first pattern that matches
//! and selects a non-empty value wins; when none does, the field's default is
//! used. Layouts describe their chains as static tables so adding a layout
//! means adding data, not control flow.

use std::collections::BTreeMap;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::models::account::{AccountExtraction, AccountField, AccountInfo, Provenance};

use super::Result;

/// Which part of a match becomes the field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSelector {
    /// One capture group, trimmed.
    Group(usize),
    /// Several capture groups, trimmed, empties dropped, joined with a separator.
    JoinNonEmpty(&'static [usize], &'static str),
    /// The whole match, trimmed.
    Whole,
}

impl GroupSelector {
    fn select(&self, caps: &Captures<'_>) -> Option<String> {
        let value = match self {
            GroupSelector::Group(i) => caps.get(*i)?.as_str().trim().to_string(),
            GroupSelector::JoinNonEmpty(groups, sep) => groups
                .iter()
                .filter_map(|i| caps.get(*i))
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(sep),
            GroupSelector::Whole => caps.get(0)?.as_str().trim().to_string(),
        };

        (!value.is_empty()).then_some(value)
    }
}

/// A pattern in a field's chain.
#[derive(Debug, Clone, Copy)]
pub struct FieldPattern {
    pub pattern: &'static str,
    pub selector: GroupSelector,
}

impl FieldPattern {
    pub const fn group(pattern: &'static str, group: usize) -> Self {
        Self {
            pattern,
            selector: GroupSelector::Group(group),
        }
    }

    pub const fn join(pattern: &'static str, groups: &'static [usize], sep: &'static str) -> Self {
        Self {
            pattern,
            selector: GroupSelector::JoinNonEmpty(groups, sep),
        }
    }
}

/// Extraction rule for one field: patterns in priority order, then a default.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: AccountField,
    pub patterns: &'static [FieldPattern],
    pub default: &'static str,
}

struct CompiledPattern {
    regex: Regex,
    selector: GroupSelector,
}

struct CompiledRule {
    field: AccountField,
    patterns: Vec<CompiledPattern>,
    default: String,
}

/// Compiled pattern chains for one layout.
pub struct FieldExtractor {
    rules: Vec<CompiledRule>,
}

impl FieldExtractor {
    /// Compile a layout's chains, appending extra patterns keyed by field name.
    ///
    /// Extra patterns use their first capture group, or the whole match when
    /// they have none. Unknown field names are ignored.
    pub fn build(rules: &[FieldRule], extra: &BTreeMap<&str, &[String]>) -> Result<Self> {
        for key in extra.keys() {
            if AccountField::from_key(key).is_none() {
                warn!("Ignoring patterns for unknown account field {:?}", key);
            }
        }

        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let mut patterns = Vec::with_capacity(rule.patterns.len());

            for p in rule.patterns {
                patterns.push(CompiledPattern {
                    regex: compile(rule.field, p.pattern)?,
                    selector: p.selector,
                });
            }

            if let Some(extra_patterns) = extra.get(rule.field.key()) {
                for pattern in extra_patterns.iter() {
                    let regex = compile(rule.field, pattern)?;
                    let selector = if regex.captures_len() > 1 {
                        GroupSelector::Group(1)
                    } else {
                        GroupSelector::Whole
                    };
                    patterns.push(CompiledPattern { regex, selector });
                }
            }

            compiled.push(CompiledRule {
                field: rule.field,
                patterns,
                default: rule.default.to_string(),
            });
        }

        Ok(Self { rules: compiled })
    }

    /// Run every chain over the text. Fields without a rule keep the `Not Found` sentinel.
    pub fn extract(&self, text: &str) -> AccountExtraction {
        let mut info = AccountInfo::default();
        let mut provenance: BTreeMap<AccountField, Provenance> = AccountField::ALL
            .iter()
            .map(|f| (*f, Provenance::Default))
            .collect();

        for rule in &self.rules {
            let matched = rule.patterns.iter().find_map(|p| {
                p.regex
                    .captures(text)
                    .and_then(|caps| p.selector.select(&caps))
            });

            match matched {
                Some(value) => {
                    info.set(rule.field, value);
                    provenance.insert(rule.field, Provenance::Matched);
                }
                None => {
                    debug!("No match for {}, using {:?}", rule.field.key(), rule.default);
                    info.set(rule.field, rule.default.clone());
                }
            }
        }

        AccountExtraction {
            info,
            provenance,
            degraded: false,
        }
    }
}

fn compile(field: AccountField, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ExtractionError::InvalidPattern {
        field: field.key().to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

/// Extract account fields, reverting to `fallback` when the chains cannot be built.
pub fn extract_account(
    rules: &[FieldRule],
    extra: &BTreeMap<&str, &[String]>,
    fallback: AccountInfo,
    text: &str,
) -> AccountExtraction {
    match FieldExtractor::build(rules, extra) {
        Ok(extractor) => extractor.extract(text),
        Err(e) => {
            warn!("Account field extraction failed, using fallback values: {}", e);
            AccountExtraction::fallback(fallback)
        }
    }
}
