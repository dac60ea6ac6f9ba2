//! Per-node classification and context.

use std::fmt;

/// Role of a grid node, assigned once by the driver's geometry setup.
///
/// The kernels match on this once per invocation to pick a branch; nothing
/// here ever changes a node's class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum NodeClass {
    /// Interior fluid node.
    #[default]
    Fluid,
    /// Node inside an immersed solid body; every kernel leaves it untouched.
    ImmersedSolid,
    /// Wall node (bounce-back handled by the driver).
    Wall,
    /// Fluid node on a periodic boundary driven by a mean pressure drop.
    MdPeriodic,
    /// Velocity or pressure inlet.
    Inlet,
    /// Outflow node.
    Outlet,
    /// Symmetry plane.
    Symmetry,
}

impl NodeClass {
    /// Fluid and periodic nodes: the ones that carry forcing and the staged
    /// contribution through collision.
    #[inline]
    pub const fn is_flowing(self) -> bool {
        matches!(self, Self::Fluid | Self::MdPeriodic)
    }

    /// Immersed solid nodes.
    #[inline]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::ImmersedSolid)
    }

    /// Short name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fluid => "fluid",
            Self::ImmersedSolid => "immersed-solid",
            Self::Wall => "wall",
            Self::MdPeriodic => "md-periodic",
            Self::Inlet => "inlet",
            Self::Outlet => "outlet",
            Self::Symmetry => "symmetry",
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grid coordinates of a node, reported when a kernel fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeCoords {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl NodeCoords {
    /// Coordinates of a node in a 3D grid.
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Coordinates of a node in a 2D grid (z = 0).
    pub const fn planar(x: i64, y: i64) -> Self {
        Self { x, y, z: 0 }
    }
}

impl fmt::Display for NodeCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Everything a kernel needs to know about the node it is working on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeContext {
    /// Grid coordinates (diagnostics only)
    pub coords: NodeCoords,
    /// Node classification
    pub class: NodeClass,
    /// Time step
    pub dt: f64,
}

impl NodeContext {
    /// Create a new node context.
    pub fn new(coords: NodeCoords, class: NodeClass, dt: f64) -> Self {
        Self { coords, class, dt }
    }

    /// A fluid node at the origin with unit time step.
    pub fn fluid() -> Self {
        Self::new(NodeCoords::default(), NodeClass::Fluid, 1.0)
    }

    /// Same node with a different classification.
    pub fn with_class(mut self, class: NodeClass) -> Self {
        self.class = class;
        self
    }

    /// Same node with a different time step.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }
}
