//! Resource filter
//!
//! Decides whether a discovered resource should be processed based on the
//! include/exclude lists of resource types and the explicit targets.

use crate::error::{Result, SiftError};
use crate::tag::Tag;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Separator between the resource type and the ID of a target
pub const TARGET_SEPARATOR: char = '.';

/// Target IDs grouped by resource type, in first-seen order
pub type TargetGroups = HashMap<String, Vec<String>>;

/// All the filters that can be applied to the discovered resources
///
/// The membership sets behind [`Filter::is_included`] and
/// [`Filter::is_excluded`] are built on first use and never rebuilt, so
/// `include`/`exclude` must not be mutated after the first query. The
/// `with_*` builders reset them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    pub tags: Vec<Tag>,

    /// Resource types to process; empty means all
    pub include: Vec<String>,

    /// Resource types to skip; empty means none
    pub exclude: Vec<String>,

    /// Specific resources, formatted as `<type>.<id>`
    pub targets: Vec<String>,

    #[serde(skip)]
    include_set: OnceLock<HashSet<String>>,

    #[serde(skip)]
    exclude_set: OnceLock<HashSet<String>>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    pub fn with_include<S: Into<String>>(mut self, include: impl IntoIterator<Item = S>) -> Self {
        self.include = include.into_iter().map(Into::into).collect();
        self.include_set = OnceLock::new();
        self
    }

    pub fn with_exclude<S: Into<String>>(mut self, exclude: impl IntoIterator<Item = S>) -> Self {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self.exclude_set = OnceLock::new();
        self
    }

    pub fn with_targets<S: Into<String>>(mut self, targets: impl IntoIterator<Item = S>) -> Self {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if every one of `types` is on the exclude list
    ///
    /// An empty exclude list never excludes anything. With a non-empty list,
    /// an empty `types` is excluded.
    pub fn is_excluded<I, S>(&self, types: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.exclude.is_empty() {
            return false;
        }

        let set = self.exclude_set.get_or_init(|| to_set(&self.exclude));
        types.into_iter().all(|t| set.contains(t.as_ref()))
    }

    /// Returns true if every one of `types` is on the include list
    ///
    /// An empty include list includes everything.
    pub fn is_included<I, S>(&self, types: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.include.is_empty() {
            return true;
        }

        let set = self.include_set.get_or_init(|| to_set(&self.include));
        types.into_iter().all(|t| set.contains(t.as_ref()))
    }

    /// Checks that every target has at least the `<type>.<id>` shape
    ///
    /// IDs may contain `.` themselves, so only the presence of a separator
    /// is checked.
    pub fn validate(&self) -> Result<()> {
        if let Some(target) = self
            .targets
            .iter()
            .find(|t| !t.contains(TARGET_SEPARATOR))
        {
            return Err(SiftError::FilterTargetsInvalid {
                target: target.clone(),
            });
        }

        Ok(())
    }

    /// Groups the target IDs by resource type
    ///
    /// Duplicated targets are dropped. Targets without a separator are
    /// skipped; [`Filter::validate`] reports them.
    pub fn targets_types_with_ids(&self) -> TargetGroups {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut groups = TargetGroups::new();

        for (ty, id) in self
            .targets
            .iter()
            .filter_map(|t| t.split_once(TARGET_SEPARATOR))
        {
            if seen.insert((ty, id)) {
                groups.entry(ty.to_string()).or_default().push(id.to_string());
            }
        }

        groups
    }
}

fn to_set(values: &[String]) -> HashSet<String> {
    values.iter().cloned().collect()
}

fn join<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tags:    [{}]", join(&self.tags))?;
        writeln!(f, "Include: [{}]", join(&self.include))?;
        writeln!(f, "Exclude: [{}]", join(&self.exclude))?;
        write!(f, "Targets: [{}]", join(&self.targets))
    }
}
