//! Merged collider regions and their box geometry

use serde::{Deserialize, Serialize};

use crate::catalog::classification::{Classification, Interaction};
use crate::spatial::coords::{Orientation, TileRef};

/// Box collider placement in world units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    /// Extent (width, height)
    pub size: [f32; 2],
    /// Centre offset from `position`
    pub offset: [f32; 2],
    /// World position of the anchor member
    pub position: [f32; 2],
}

impl Geometry {
    /// Box covering a straight run of `count` members
    ///
    /// Size grows linearly with `count` along the run's axis and shrinks with
    /// the sprite subdivision. The offset moves the centre from the anchor
    /// (lowest member) to the middle of the run. Point regions are sized as
    /// horizontal runs of one.
    pub fn for_run(
        orientation: Option<Orientation>,
        count: usize,
        amount: [u32; 2],
        unit: [f32; 2],
        anchor: [f32; 2],
    ) -> Self {
        let n = count.max(1) as f32;
        let ux = amount[0].max(1) as f32;
        let uy = amount[1].max(1) as f32;
        let (width, height) = (unit[0] / ux, unit[1] / uy);

        let (size, offset) = match orientation {
            Some(Orientation::Vertical) => ([width, height * n], [0.0, height / 2.0 * (n - 1.0)]),
            Some(Orientation::Horizontal) | None => {
                ([width * n, height], [width / 2.0 * (n - 1.0), 0.0])
            }
        };

        Self {
            size,
            offset,
            position: anchor,
        }
    }
}

/// Ordered run of tiles backing one collision or trigger volume
///
/// Members are kept in ascending order along the region's axis, so the first
/// and last members are the two ends of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub(crate) name: String,
    pub(crate) members: Vec<TileRef>,
    pub(crate) head_idx: usize,
    pub(crate) orientation: Option<Orientation>,
    pub(crate) trigger: bool,
    pub(crate) tag: Classification,
    pub(crate) interaction: Interaction,
    pub(crate) amount: [u32; 2],
    pub(crate) geometry: Geometry,
}

impl Region {
    /// Create an untagged solid region
    pub fn new(members: Vec<TileRef>, orientation: Option<Orientation>, amount: [u32; 2]) -> Self {
        let mut region = Self {
            name: String::new(),
            members,
            head_idx: 0,
            orientation,
            trigger: false,
            tag: Classification::None,
            interaction: Interaction::None,
            amount,
            geometry: Geometry::default(),
        };
        region.sort_members();
        region
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in axis order
    pub fn members(&self) -> &[TileRef] {
        &self.members
    }

    /// Number of members
    pub const fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the region has no members left
    pub const fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Index of the anchor member
    pub const fn head_idx(&self) -> usize {
        self.head_idx
    }

    /// Anchor member
    pub fn head(&self) -> Option<TileRef> {
        self.members.get(self.head_idx).copied()
    }

    /// Lowest member along the axis
    pub fn first(&self) -> Option<TileRef> {
        self.members.first().copied()
    }

    /// Highest member along the axis
    pub fn last(&self) -> Option<TileRef> {
        self.members.last().copied()
    }

    /// Growth axis, `None` for point regions
    pub const fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Whether the collider is a trigger volume
    pub const fn is_trigger(&self) -> bool {
        self.trigger
    }

    /// Classification tag of the collider
    pub const fn tag(&self) -> Classification {
        self.tag
    }

    /// Interaction fired by the collider
    pub const fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Subdivision count inherited from the first member
    pub const fn amount(&self) -> [u32; 2] {
        self.amount
    }

    /// Current box geometry
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Position of `tile` in the member list
    pub fn position_of(&self, tile: TileRef) -> Option<usize> {
        self.members.iter().position(|&member| member == tile)
    }

    /// Whether `tile` is a member
    pub fn contains(&self, tile: TileRef) -> bool {
        self.members.contains(&tile)
    }

    /// Whether members form one gap-free straight run on a single layer
    pub fn is_contiguous(&self) -> bool {
        let Some(first) = self.first() else {
            return true;
        };
        if self.members.len() == 1 {
            return true;
        }
        let Some(axis) = self.orientation else {
            return false;
        };

        self.members.iter().enumerate().all(|(i, member)| {
            let same_line = match axis {
                Orientation::Horizontal => member.row == first.row,
                Orientation::Vertical => member.col == first.col,
            };
            same_line
                && member.layer == first.layer
                && axis.coordinate(*member) == axis.coordinate(first) + i
        })
    }

    pub(crate) fn sort_members(&mut self) {
        match self.orientation {
            Some(Orientation::Vertical) => self.members.sort_by_key(|m| (m.row, m.col)),
            Some(Orientation::Horizontal) | None => self.members.sort_by_key(|m| (m.col, m.row)),
        }
        self.reanchor();
    }

    /// Point the anchor at the lowest member along the axis
    pub(crate) fn reanchor(&mut self) {
        let axis = self.orientation.unwrap_or(Orientation::Horizontal);
        self.head_idx = self
            .members
            .iter()
            .enumerate()
            .min_by_key(|(_, member)| axis.coordinate(**member))
            .map_or(0, |(i, _)| i);
    }

    pub(crate) fn remove_first(&mut self) -> Option<TileRef> {
        if self.members.is_empty() {
            return None;
        }
        let removed = self.members.remove(0);
        self.reanchor();
        Some(removed)
    }

    pub(crate) fn remove_last(&mut self) -> Option<TileRef> {
        let removed = self.members.pop();
        self.reanchor();
        removed
    }

    pub(crate) fn resize(&mut self, unit: [f32; 2], anchor: [f32; 2]) {
        self.geometry = Geometry::for_run(
            self.orientation,
            self.members.len(),
            self.amount,
            unit,
            anchor,
        );
    }
}
