use thiserror::Error;

use super::{LocationNode, LocationTier};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CascadeError {
    #[error("{id} is not an available {tier} option")]
    UnknownOption { tier: LocationTier, id: String },
}

/// A pending load of one tier's options.
///
/// `generation` identifies the request; only the newest request for a tier
/// may fill it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierRequest {
    pub tier: LocationTier,
    pub parent_id: Option<String>,
    pub generation: u64,
}

/// Result of handing a response to [`AddressCascade::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The response was current; the tier now offers `options` entries.
    Accepted { options: usize },
    /// A newer request for the tier was issued; the response was dropped.
    Stale,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TierState {
    options: Vec<LocationNode>,
    selected: Option<String>,
    generation: u64,
}

/// Division → district → upazila → union selection state.
///
/// Selecting at one tier clears the selection and options of every tier
/// below it and returns the [`TierRequest`] that loads the next tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressCascade {
    tiers: [TierState; 4],
}

impl AddressCascade {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request for the division list, invalidating any earlier one.
    pub fn start(&mut self) -> TierRequest {
        self.reset_from(LocationTier::Division);
        self.issue(LocationTier::Division, None)
    }

    /// # Errors
    ///
    /// [`CascadeError::UnknownOption`] when `id` is not among the loaded
    /// divisions. State is unchanged in that case.
    pub fn select_division(&mut self, id: &str) -> Result<TierRequest, CascadeError> {
        self.select(LocationTier::Division, id)
    }

    /// # Errors
    ///
    /// See [`AddressCascade::select_division`].
    pub fn select_district(&mut self, id: &str) -> Result<TierRequest, CascadeError> {
        self.select(LocationTier::District, id)
    }

    /// # Errors
    ///
    /// See [`AddressCascade::select_division`].
    pub fn select_upazila(&mut self, id: &str) -> Result<TierRequest, CascadeError> {
        self.select(LocationTier::Upazila, id)
    }

    /// # Errors
    ///
    /// See [`AddressCascade::select_division`].
    pub fn select_union(&mut self, id: &str) -> Result<(), CascadeError> {
        self.ensure_option(LocationTier::Union, id)?;
        self.tiers[LocationTier::Union.index()].selected = Some(id.to_string());
        Ok(())
    }

    fn select(&mut self, tier: LocationTier, id: &str) -> Result<TierRequest, CascadeError> {
        self.ensure_option(tier, id)?;
        self.tiers[tier.index()].selected = Some(id.to_string());

        let child = tier.child().unwrap_or(tier);
        self.reset_from(child);
        Ok(self.issue(child, Some(id.to_string())))
    }

    fn ensure_option(&self, tier: LocationTier, id: &str) -> Result<(), CascadeError> {
        if self.tiers[tier.index()].options.iter().any(|n| n.id == id) {
            Ok(())
        } else {
            Err(CascadeError::UnknownOption {
                tier,
                id: id.to_string(),
            })
        }
    }

    /// Clear `tier` and every tier below it, invalidating requests in flight.
    fn reset_from(&mut self, tier: LocationTier) {
        for t in tier.and_descendants() {
            let state = &mut self.tiers[t.index()];
            state.options.clear();
            state.selected = None;
            state.generation += 1;
        }
    }

    fn issue(&mut self, tier: LocationTier, parent_id: Option<String>) -> TierRequest {
        TierRequest {
            tier,
            parent_id,
            generation: self.tiers[tier.index()].generation,
        }
    }

    fn is_current(&self, request: &TierRequest) -> bool {
        self.tiers[request.tier.index()].generation == request.generation
    }

    /// Fill a tier with the response to `request`. Nodes whose parent does
    /// not match the request are ignored, so a loader may hand over a whole
    /// unfiltered tier.
    pub fn apply(&mut self, request: &TierRequest, nodes: Vec<LocationNode>) -> Applied {
        if !self.is_current(request) {
            tracing::debug!(
                tier = %request.tier,
                generation = request.generation,
                "discarding stale location response"
            );
            return Applied::Stale;
        }
        let filtered: Vec<LocationNode> = match request.tier.parent() {
            None => nodes,
            Some(_) => nodes
                .into_iter()
                .filter(|n| n.parent_id == request.parent_id)
                .collect(),
        };
        let count = filtered.len();
        self.tiers[request.tier.index()].options = filtered;
        Applied::Accepted { options: count }
    }

    /// Record a failed load: the tier and its descendants are left empty.
    pub fn fail(&mut self, request: &TierRequest) -> Applied {
        if !self.is_current(request) {
            return Applied::Stale;
        }
        for t in request.tier.and_descendants() {
            let state = &mut self.tiers[t.index()];
            state.options.clear();
            state.selected = None;
        }
        Applied::Accepted { options: 0 }
    }

    #[must_use]
    pub fn options(&self, tier: LocationTier) -> &[LocationNode] {
        &self.tiers[tier.index()].options
    }

    #[must_use]
    pub fn selected_id(&self, tier: LocationTier) -> Option<&str> {
        self.tiers[tier.index()].selected.as_deref()
    }

    #[must_use]
    pub fn selected(&self, tier: LocationTier) -> Option<&LocationNode> {
        let id = self.selected_id(tier)?;
        self.options(tier).iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>) -> LocationNode {
        LocationNode {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            name: format!("Place {id}"),
            bn_name: String::new(),
        }
    }

    /// Cascade with Dhaka (1) → Gazipur (10) → Kaliakair (100) → Atabaha (1000) selected.
    fn fully_selected() -> AddressCascade {
        let mut c = AddressCascade::new();
        let req = c.start();
        c.apply(&req, vec![node("1", None), node("2", None)]);
        let req = c.select_division("1").unwrap();
        c.apply(&req, vec![node("10", Some("1")), node("20", Some("2"))]);
        let req = c.select_district("10").unwrap();
        c.apply(&req, vec![node("100", Some("10"))]);
        let req = c.select_upazila("100").unwrap();
        c.apply(&req, vec![node("1000", Some("100"))]);
        c.select_union("1000").unwrap();
        c
    }

    #[test]
    fn apply_filters_by_parent() {
        let c = fully_selected();
        let districts = c.options(LocationTier::District);
        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].id, "10");
    }

    #[test]
    fn new_division_resets_lower_tiers() {
        let mut c = fully_selected();
        let req = c.select_division("2").unwrap();
        assert_eq!(req.tier, LocationTier::District);
        assert_eq!(req.parent_id.as_deref(), Some("2"));
        for tier in [LocationTier::District, LocationTier::Upazila, LocationTier::Union] {
            assert!(c.selected_id(tier).is_none(), "{tier} still selected");
            assert!(c.options(tier).is_empty(), "{tier} still has options");
        }
        assert_eq!(c.selected_id(LocationTier::Division), Some("2"));
    }

    #[test]
    fn new_district_keeps_division() {
        let mut c = fully_selected();
        c.select_district("10").unwrap();
        assert_eq!(c.selected_id(LocationTier::Division), Some("1"));
        assert!(c.selected_id(LocationTier::Upazila).is_none());
        assert!(c.selected_id(LocationTier::Union).is_none());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut c = fully_selected();
        let first = c.select_division("1").unwrap();
        let second = c.select_division("1").unwrap();

        assert_eq!(
            c.apply(&second, vec![node("10", Some("1"))]),
            Applied::Accepted { options: 1 }
        );
        assert_eq!(
            c.apply(&first, vec![node("11", Some("1")), node("12", Some("1"))]),
            Applied::Stale
        );
        assert_eq!(c.options(LocationTier::District)[0].id, "10");
    }

    #[test]
    fn parent_change_invalidates_grandchild_requests() {
        let mut c = fully_selected();
        let union_req = c.select_upazila("100").unwrap();
        c.select_division("1").unwrap();
        assert_eq!(c.apply(&union_req, vec![node("1000", Some("100"))]), Applied::Stale);
    }

    #[test]
    fn failure_empties_tier_and_descendants() {
        let mut c = fully_selected();
        let req = c.select_division("1").unwrap();
        assert_eq!(c.fail(&req), Applied::Accepted { options: 0 });
        assert!(c.options(LocationTier::District).is_empty());
        assert!(c.options(LocationTier::Union).is_empty());
        assert_eq!(c.selected_id(LocationTier::Division), Some("1"));
    }

    #[test]
    fn unknown_option_leaves_state_unchanged() {
        let mut c = fully_selected();
        let before = c.clone();
        let err = c.select_district("20").unwrap_err();
        assert_eq!(
            err,
            CascadeError::UnknownOption {
                tier: LocationTier::District,
                id: "20".to_string()
            }
        );
        assert_eq!(c, before);
    }

    #[test]
    fn selected_returns_node() {
        let c = fully_selected();
        assert_eq!(
            c.selected(LocationTier::Union).map(|n| n.name.as_str()),
            Some("Place 1000")
        );
    }
}
