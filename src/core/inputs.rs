//! Native build inputs and their platform-conditional composition.
//!
//! Inputs come in two categories that are never merged:
//! - `native`: tools needed only while building (pkg-config, cmake, ...)
//! - `libs`: libraries the artifact links against
//!
//! Each category is declared as a base list plus one extension list per
//! platform. [`compose`] picks the extensions by matching on
//! [`PlatformFact`]; it is the only place that does.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::platform::PlatformFact;

/// Name of a native input (a build tool or a library).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputName(String);

impl InputName {
    pub fn new(name: impl Into<String>) -> Self {
        InputName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InputName {
    fn from(s: &str) -> Self {
        InputName::new(s)
    }
}

/// Base list plus per-platform extensions for one input category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformTable {
    /// Always included
    pub base: Vec<InputName>,

    /// Included on Linux hosts
    pub linux: Vec<InputName>,

    /// Included on macOS hosts
    pub macos: Vec<InputName>,
}

impl PlatformTable {
    /// Entries selected for `fact`.
    fn select(&self, fact: PlatformFact) -> impl Iterator<Item = &InputName> {
        let extension: &[InputName] = match fact {
            PlatformFact::Linux => &self.linux,
            PlatformFact::Macos => &self.macos,
            PlatformFact::Other => &[],
        };
        self.base.iter().chain(extension)
    }

    /// Every name mentioned anywhere in the table.
    pub fn all(&self) -> impl Iterator<Item = &InputName> {
        self.base.iter().chain(&self.linux).chain(&self.macos)
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.linux.is_empty() && self.macos.is_empty()
    }
}

/// Declared inputs of both categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputTables {
    /// Build-time tools
    pub native: PlatformTable,

    /// Link-time libraries
    pub libs: PlatformTable,
}

impl InputTables {
    /// Names declared as both a build tool and a library.
    pub fn category_conflicts(&self) -> Vec<InputName> {
        let native: BTreeSet<&InputName> = self.native.all().collect();
        let libs: BTreeSet<&InputName> = self.libs.all().collect();
        native.intersection(&libs).map(|n| (*n).clone()).collect()
    }
}

/// Optional input tables keyed by feature name.
pub type FeatureTables = BTreeMap<String, InputTables>;

/// The resolved set of native inputs for one platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSet {
    /// Build-time tools; never part of the artifact's link set
    pub native: BTreeSet<InputName>,

    /// Libraries the artifact links against
    pub libs: BTreeSet<InputName>,
}

impl InputSet {
    /// Total number of entries across both categories.
    pub fn len(&self) -> usize {
        self.native.len() + self.libs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.native.is_empty() && self.libs.is_empty()
    }

    /// Whether `name` appears in either category.
    pub fn contains(&self, name: &str) -> bool {
        let name = InputName::new(name);
        self.native.contains(&name) || self.libs.contains(&name)
    }

    fn extend_from(&mut self, tables: &InputTables, fact: PlatformFact) {
        self.native.extend(tables.native.select(fact).cloned());
        self.libs.extend(tables.libs.select(fact).cloned());
    }
}

/// Compose the input set for `fact`.
///
/// Starts from the base entries, adds the extension entries for `fact`
/// (none for [`PlatformFact::Other`]), then does the same for each enabled
/// feature table. Enabled features without a table contribute nothing;
/// callers validate feature names beforehand.
pub fn compose<'a>(
    fact: PlatformFact,
    tables: &InputTables,
    features: &FeatureTables,
    enabled: impl IntoIterator<Item = &'a str>,
) -> InputSet {
    let mut set = InputSet::default();
    set.extend_from(tables, fact);

    for feature in enabled {
        if let Some(feature_tables) = features.get(feature) {
            set.extend_from(feature_tables, fact);
        }
    }

    tracing::debug!(
        "composed {} native tools and {} libraries for {}",
        set.native.len(),
        set.libs.len(),
        fact
    );

    set
}
