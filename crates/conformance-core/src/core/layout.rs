// crates/conformance-core/src/core/layout.rs
// ============================================================================
// Module: Report Layout
// Description: Declared category and feature ordering for conformance reports.
// Purpose: Fix report order to the external structure the corpus mirrors.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ReportLayout`] lists categories in display order, each with its
//! features in display order, plus the set of feature keys that are out of
//! scope. Report order is taken from here only, never from discovery order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::FeatureKey;

// ============================================================================
// SECTION: Layout Types
// ============================================================================

/// One report section with its ordered features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLayout {
    /// Section heading.
    pub title: String,
    /// Optional link to the external chapter the section mirrors.
    pub link: Option<String>,
    /// Features in display order.
    pub features: Vec<FeatureKey>,
}

/// Declared report ordering plus out-of-scope features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLayout {
    /// Categories in display order.
    pub categories: Vec<CategoryLayout>,
    /// Features excluded from conformance scoring.
    pub out_of_scope: BTreeSet<FeatureKey>,
}

impl ReportLayout {
    /// Iterates over every declared feature in display order.
    pub fn features(&self) -> impl Iterator<Item = &FeatureKey> {
        self.categories.iter().flat_map(|category| category.features.iter())
    }

    /// Returns true when the feature is declared in some category.
    #[must_use]
    pub fn contains(&self, key: &FeatureKey) -> bool {
        self.features().any(|feature| feature == key)
    }

    /// Returns true when the feature is excluded from scoring.
    #[must_use]
    pub fn is_out_of_scope(&self, key: &FeatureKey) -> bool {
        self.out_of_scope.contains(key)
    }
}
