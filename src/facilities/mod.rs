//! Facility Tree - Asset → Pex → WellHeadPlatform → Well containment
//!
//! Nodes live in a flat arena addressed by [`NodeId`]. Each node stores its
//! parent and its children in declaration order; upward navigation
//! (`platform_of`, `pex_of`, `asset_of`) walks parent links and is never
//! stored on the node.
//!
//! Containment is checked at insertion: a pex only goes under the asset, a
//! platform only under a pex, a well only under a platform. A rejected
//! insertion leaves the tree untouched.

mod well;

pub use well::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::types::FacilityKind;

// ============================================================================
// Node Types
// ============================================================================

/// Index of a node in a [`FacilityTree`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Debug)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        NodeId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Root of the hierarchy (the field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
}

/// Grouping of wellhead platforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pex {
    pub name: String,
}

/// Physical platform with a fixed number of well slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellHeadPlatform {
    pub name: String,
    pub well_slots: usize,
}

impl Asset {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Pex {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl WellHeadPlatform {
    pub fn new(name: impl Into<String>, well_slots: usize) -> Self {
        Self {
            name: name.into(),
            well_slots,
        }
    }
}

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Facility {
    Asset(Asset),
    Pex(Pex),
    Platform(WellHeadPlatform),
    Well(Well),
}

impl Facility {
    pub fn kind(&self) -> FacilityKind {
        match self {
            Facility::Asset(_) => FacilityKind::Asset,
            Facility::Pex(_) => FacilityKind::Pex,
            Facility::Platform(_) => FacilityKind::WellHeadPlatform,
            Facility::Well(well) => well.kind(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Facility::Asset(a) => &a.name,
            Facility::Pex(p) => &p.name,
            Facility::Platform(w) => &w.name,
            Facility::Well(w) => &w.name,
        }
    }
}

impl From<Asset> for Facility {
    fn from(asset: Asset) -> Self {
        Facility::Asset(asset)
    }
}

impl From<Pex> for Facility {
    fn from(pex: Pex) -> Self {
        Facility::Pex(pex)
    }
}

impl From<WellHeadPlatform> for Facility {
    fn from(whp: WellHeadPlatform) -> Self {
        Facility::Platform(whp)
    }
}

impl From<Well> for Facility {
    fn from(well: Well) -> Self {
        Facility::Well(well)
    }
}

#[derive(Debug, Clone)]
struct Node {
    facility: Facility,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Names of the facilities a well belongs to, from the asset down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lineage {
    pub asset: String,
    pub pex: String,
    pub whp: String,
    pub well: String,
}

impl Lineage {
    /// Same lineage with every label lower-cased.
    pub fn normalized(&self) -> Self {
        Self {
            asset: self.asset.to_lowercase(),
            pex: self.pex.to_lowercase(),
            whp: self.whp.to_lowercase(),
            well: self.well.to_lowercase(),
        }
    }
}

// ============================================================================
// Facility Tree
// ============================================================================

#[derive(Debug, Clone)]
pub struct FacilityTree {
    nodes: Vec<Node>,
}

impl FacilityTree {
    /// Create a tree holding only the asset.
    pub fn new(asset: Asset) -> Self {
        Self {
            nodes: vec![Node {
                facility: Facility::Asset(asset),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Build the asset, its pexes and platforms, and every existing well.
    ///
    /// Existing wells start producing on the forecast start date.
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        let facilities = &config.facilities;
        let defaults = &config.defaults.well;
        let start_date = config.start_date();

        let mut tree = Self::new(Asset::new(facilities.asset.clone()));
        let root = tree.root();

        for pex_config in &facilities.pexes {
            let pex = tree.add_pex(root, Pex::new(pex_config.name.clone()))?;
            for whp_config in &pex_config.platforms {
                let whp = tree.add_platform(
                    pex,
                    WellHeadPlatform::new(whp_config.name.clone(), whp_config.slots),
                )?;
                for entry in &whp_config.wells {
                    let well = Well::existing(entry, start_date, defaults)?;
                    if facilities.enforce_slot_capacity {
                        tree.add_well_checked(whp, well)?;
                    } else {
                        tree.add_well(whp, well)?;
                    }
                }
            }
        }

        info!(
            asset = %facilities.asset,
            pexes = tree.pexes(root).len(),
            platforms = tree.platforms(root).len(),
            wells = tree.wells(root).len(),
            "Facility tree built"
        );
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, asset included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get(&self, id: NodeId) -> Option<&Facility> {
        self.node(id).map(|n| &n.facility)
    }

    pub fn kind(&self, id: NodeId) -> Option<FacilityKind> {
        self.get(id).map(Facility::kind)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(Facility::name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Direct children in insertion order; empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn well(&self, id: NodeId) -> Option<&Well> {
        match self.get(id) {
            Some(Facility::Well(well)) => Some(well),
            _ => None,
        }
    }

    pub fn platform(&self, id: NodeId) -> Option<&WellHeadPlatform> {
        match self.get(id) {
            Some(Facility::Platform(whp)) => Some(whp),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Containment
    // ------------------------------------------------------------------------

    pub fn add_pex(&mut self, asset: NodeId, pex: impl Into<Facility>) -> Result<NodeId> {
        self.attach(asset, pex.into(), FacilityKind::Asset, "Pex", |k| k == FacilityKind::Pex)
    }

    pub fn add_platform(&mut self, pex: NodeId, whp: impl Into<Facility>) -> Result<NodeId> {
        self.attach(pex, whp.into(), FacilityKind::Pex, "WellHeadPlatform", |k| {
            k == FacilityKind::WellHeadPlatform
        })
    }

    /// Insert a well under a platform without looking at slot capacity.
    pub fn add_well(&mut self, whp: NodeId, well: impl Into<Facility>) -> Result<NodeId> {
        self.attach(whp, well.into(), FacilityKind::WellHeadPlatform, "Well", |k| k.is_well())
    }

    /// Insert a well, failing with `CapacityExceeded` when the platform is full.
    pub fn add_well_checked(&mut self, whp: NodeId, well: impl Into<Facility>) -> Result<NodeId> {
        if let (Some(platform), Some(remaining)) = (self.platform(whp), self.remaining_slots(whp)) {
            if remaining <= 0 {
                return Err(ForecastError::CapacityExceeded {
                    platform: platform.name.clone(),
                    capacity: platform.well_slots,
                });
            }
        }
        self.add_well(whp, well)
    }

    fn attach(
        &mut self,
        parent: NodeId,
        child: Facility,
        parent_kind: FacilityKind,
        expected_child: &'static str,
        accepts: impl Fn(FacilityKind) -> bool,
    ) -> Result<NodeId> {
        let parent_node = self.node(parent).ok_or(ForecastError::UnknownNode(parent))?;
        let found_parent = parent_node.facility.kind();
        if found_parent != parent_kind {
            return Err(ForecastError::TypeMismatch {
                parent: parent_node.facility.name().to_string(),
                expected: kind_label(parent_kind),
                found: found_parent,
            });
        }
        if !accepts(child.kind()) {
            return Err(ForecastError::TypeMismatch {
                parent: parent_node.facility.name().to_string(),
                expected: expected_child,
                found: child.kind(),
            });
        }

        let id = NodeId(self.nodes.len());
        debug!(node = %id, kind = %child.kind(), name = %child.name(), parent = %parent, "Facility added");
        self.nodes.push(Node {
            facility: child,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Depth-first pre-order walk from `from` (inclusive), children in
    /// declaration order.
    fn walk(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if self.node(from).is_none() {
            return order;
        }
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    fn filter(&self, from: NodeId, wanted: impl Fn(FacilityKind) -> bool) -> Vec<NodeId> {
        self.walk(from)
            .into_iter()
            .filter(|&id| self.kind(id).is_some_and(&wanted))
            .collect()
    }

    pub fn pexes(&self, from: NodeId) -> Vec<NodeId> {
        self.filter(from, |k| k == FacilityKind::Pex)
    }

    pub fn platforms(&self, from: NodeId) -> Vec<NodeId> {
        self.filter(from, |k| k == FacilityKind::WellHeadPlatform)
    }

    pub fn wells(&self, from: NodeId) -> Vec<NodeId> {
        self.filter(from, |k| k.is_well())
    }

    /// First platform named `name`, searching the whole tree.
    pub fn find_platform(&self, name: &str) -> Option<NodeId> {
        self.platforms(self.root())
            .into_iter()
            .find(|&id| self.name(id) == Some(name))
    }

    /// First well named `name`, searching the whole tree.
    pub fn find_well(&self, name: &str) -> Option<NodeId> {
        self.wells(self.root())
            .into_iter()
            .find(|&id| self.name(id) == Some(name))
    }

    fn ancestor_of_kind(&self, id: NodeId, kind: FacilityKind) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.kind(node)? == kind {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// The platform holding `id` (or `id` itself if it is a platform).
    pub fn platform_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestor_of_kind(id, FacilityKind::WellHeadPlatform)
    }

    pub fn pex_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestor_of_kind(id, FacilityKind::Pex)
    }

    pub fn asset_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestor_of_kind(id, FacilityKind::Asset)
    }

    /// Asset, pex, platform and well names for a well node.
    pub fn lineage(&self, well: NodeId) -> Option<Lineage> {
        let well_name = self.well(well)?.name.clone();
        let name_of = |id: Option<NodeId>| id.and_then(|id| self.name(id)).map(str::to_string);
        Some(Lineage {
            asset: name_of(self.asset_of(well))?,
            pex: name_of(self.pex_of(well))?,
            whp: name_of(self.platform_of(well))?,
            well: well_name,
        })
    }

    /// `capacity - wells`; negative once a platform is over-drilled.
    pub fn remaining_slots(&self, whp: NodeId) -> Option<i64> {
        let platform = self.platform(whp)?;
        let wells = self
            .children(whp)
            .iter()
            .filter(|&&id| self.kind(id).is_some_and(|k| k.is_well()))
            .count();
        Some(platform.well_slots as i64 - wells as i64)
    }
}

fn kind_label(kind: FacilityKind) -> &'static str {
    match kind {
        FacilityKind::Asset => "Asset",
        FacilityKind::Pex => "Pex",
        FacilityKind::WellHeadPlatform => "WellHeadPlatform",
        FacilityKind::OilWell => "OilWell",
        FacilityKind::GasWell => "GasWell",
    }
}

// ============================================================================
// Tests
// ============================================================================
