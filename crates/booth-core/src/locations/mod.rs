//! Bangladesh's four-tier administrative hierarchy.
//!
//! Division → district → upazila → union. Nodes of every tier are held as
//! flat lists linked by `parent_id`; [`AddressCascade`] tracks the
//! customer's selection through the tiers.

mod cascade;
mod document;

use serde::{Deserialize, Serialize};

pub use cascade::{AddressCascade, Applied, CascadeError, TierRequest};
pub use document::{parse_nested, parse_tier, LocationDataError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationTier {
    Division,
    District,
    Upazila,
    Union,
}

impl LocationTier {
    pub const ALL: [LocationTier; 4] = [
        LocationTier::Division,
        LocationTier::District,
        LocationTier::Upazila,
        LocationTier::Union,
    ];

    #[must_use]
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Division => None,
            Self::District => Some(Self::Division),
            Self::Upazila => Some(Self::District),
            Self::Union => Some(Self::Upazila),
        }
    }

    #[must_use]
    pub fn child(self) -> Option<Self> {
        match self {
            Self::Division => Some(Self::District),
            Self::District => Some(Self::Upazila),
            Self::Upazila => Some(Self::Union),
            Self::Union => None,
        }
    }

    /// This tier and every tier below it.
    #[must_use]
    pub fn and_descendants(self) -> &'static [LocationTier] {
        &Self::ALL[self.index()..]
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Division => 0,
            Self::District => 1,
            Self::Upazila => 2,
            Self::Union => 3,
        }
    }

    /// Key of this tier's list in a keyed document, e.g. `"districts"`.
    #[must_use]
    pub fn collection_key(self) -> &'static str {
        match self {
            Self::Division => "divisions",
            Self::District => "districts",
            Self::Upazila => "upazilas",
            Self::Union => "unions",
        }
    }

    /// Name of the flat static file holding this tier.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Division => "bd-divisions.json",
            Self::District => "bd-districts.json",
            Self::Upazila => "bd-upazilas.json",
            Self::Union => "bd-unions.json",
        }
    }
}

impl std::fmt::Display for LocationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Division => "division",
            Self::District => "district",
            Self::Upazila => "upazila",
            Self::Union => "union",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: String,
    /// Id of the node one tier up; `None` for divisions.
    pub parent_id: Option<String>,
    pub name: String,
    pub bn_name: String,
}

impl LocationNode {
    /// Option label, e.g. `Dhaka (ঢাকা)`.
    #[must_use]
    pub fn label(&self) -> String {
        if self.bn_name.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.bn_name)
        }
    }
}

/// Every node of every tier, as loaded from the static location data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationDirectory {
    tiers: [Vec<LocationNode>; 4],
}

impl LocationDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tier(&self, tier: LocationTier) -> &[LocationNode] {
        &self.tiers[tier.index()]
    }

    pub fn set_tier(&mut self, tier: LocationTier, nodes: Vec<LocationNode>) {
        self.tiers[tier.index()] = nodes;
    }

    /// Nodes of `tier` under `parent_id`. Divisions have no parent, so the
    /// whole division list is returned for that tier.
    #[must_use]
    pub fn children_of(&self, tier: LocationTier, parent_id: Option<&str>) -> Vec<LocationNode> {
        self.tier(tier)
            .iter()
            .filter(|n| tier.parent().is_none() || n.parent_id.as_deref() == parent_id)
            .cloned()
            .collect()
    }

    /// Nodes answering a cascade request.
    #[must_use]
    pub fn fulfil(&self, request: &TierRequest) -> Vec<LocationNode> {
        self.children_of(request.tier, request.parent_id.as_deref())
    }

    #[must_use]
    pub fn find(&self, tier: LocationTier, id: &str) -> Option<&LocationNode> {
        self.tier(tier).iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn name_of(&self, tier: LocationTier, id: &str) -> Option<&str> {
        self.find(tier, id).map(|n| n.name.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.iter().all(Vec::is_empty)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }
}
