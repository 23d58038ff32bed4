use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::{LocationDirectory, LocationNode, LocationTier};

#[derive(Debug, Error)]
pub enum LocationDataError {
    #[error("no {tier} list found in location document")]
    MissingList { tier: LocationTier },

    #[error("malformed {tier} entry: {source}")]
    Entry {
        tier: LocationTier,
        #[source]
        source: serde_json::Error,
    },
}

/// Ids arrive as numbers in some exports and strings in others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: RawId,
    #[serde(default)]
    name: String,
    #[serde(default, alias = "bnName")]
    bn_name: String,
    #[serde(default)]
    division_id: Option<RawId>,
    #[serde(default)]
    district_id: Option<RawId>,
    #[serde(default, alias = "upazilla_id")]
    upazila_id: Option<RawId>,
    #[serde(default)]
    districts: Vec<RawNode>,
    #[serde(default, alias = "upazillas")]
    upazilas: Vec<RawNode>,
    #[serde(default)]
    unions: Vec<RawNode>,
}

impl RawNode {
    fn into_node(self, tier: LocationTier, inherited_parent: Option<&str>) -> LocationNode {
        let declared = match tier {
            LocationTier::Division => None,
            LocationTier::District => self.division_id,
            LocationTier::Upazila => self.district_id,
            LocationTier::Union => self.upazila_id,
        };
        let parent_id = declared
            .map(RawId::into_string)
            .or_else(|| inherited_parent.map(str::to_string));
        LocationNode {
            id: self.id.into_string(),
            parent_id,
            name: self.name,
            bn_name: self.bn_name,
        }
    }
}

/// Locate the node array for `tier` inside a flat document.
///
/// Accepted shapes: `{"districts": [...]}`, a database export array whose
/// table entry carries `{"data": [...]}`, or a bare array of nodes.
fn tier_array(tier: LocationTier, doc: &Value) -> Option<&Vec<Value>> {
    match doc {
        Value::Object(map) => map
            .get(tier.collection_key())
            .or_else(|| map.get("data"))
            .and_then(Value::as_array),
        Value::Array(items) => {
            let export_table = items
                .iter()
                .filter_map(|item| item.get("data").and_then(Value::as_array))
                .next();
            match export_table {
                Some(rows) => Some(rows),
                None if items.iter().all(|i| i.get("id").is_some()) => Some(items),
                None => None,
            }
        }
        _ => None,
    }
}

/// Parse one tier from a flat document.
///
/// # Errors
///
/// [`LocationDataError::MissingList`] when the document holds no node list,
/// [`LocationDataError::Entry`] when an entry lacks an id.
pub fn parse_tier(
    tier: LocationTier,
    doc: &Value,
) -> Result<Vec<LocationNode>, LocationDataError> {
    let rows = tier_array(tier, doc).ok_or(LocationDataError::MissingList { tier })?;
    rows.iter()
        .map(|row| {
            RawNode::deserialize(row)
                .map(|raw| raw.into_node(tier, None))
                .map_err(|source| LocationDataError::Entry { tier, source })
        })
        .collect()
}

/// Parse a consolidated `{"divisions": [{..., "districts": [...]}]}`
/// document into flat tier lists. Children without an explicit parent key
/// take the id of the node they are nested under.
///
/// # Errors
///
/// [`LocationDataError::MissingList`] when there is no division list,
/// [`LocationDataError::Entry`] when an entry lacks an id.
pub fn parse_nested(doc: &Value) -> Result<LocationDirectory, LocationDataError> {
    let tier = LocationTier::Division;
    let divisions = doc
        .get(tier.collection_key())
        .and_then(Value::as_array)
        .ok_or(LocationDataError::MissingList { tier })?;

    let mut directory = LocationDirectory::new();
    let mut lists: [Vec<LocationNode>; 4] = Default::default();
    for row in divisions {
        let raw = RawNode::deserialize(row)
            .map_err(|source| LocationDataError::Entry { tier, source })?;
        flatten(raw, tier, None, &mut lists);
    }
    for (tier, nodes) in LocationTier::ALL.into_iter().zip(lists) {
        directory.set_tier(tier, nodes);
    }
    Ok(directory)
}

fn flatten(
    mut raw: RawNode,
    tier: LocationTier,
    parent: Option<&str>,
    lists: &mut [Vec<LocationNode>; 4],
) {
    let children = match tier {
        LocationTier::Division => std::mem::take(&mut raw.districts),
        LocationTier::District => std::mem::take(&mut raw.upazilas),
        LocationTier::Upazila => std::mem::take(&mut raw.unions),
        LocationTier::Union => Vec::new(),
    };
    let node = raw.into_node(tier, parent);
    let id = node.id.clone();
    lists[tier.index()].push(node);

    if let Some(child_tier) = tier.child() {
        for child in children {
            flatten(child, child_tier, Some(&id), lists);
        }
    }
}
