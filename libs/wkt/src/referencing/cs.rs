use crate::error::{Error, Result};
use meridian_units::Unit;
use smallvec::SmallVec;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    East,
    West,
    North,
    South,
    Up,
    Down,
    Other,
}

impl AxisDirection {
    pub const ALL: [AxisDirection; 7] = [
        AxisDirection::East,
        AxisDirection::West,
        AxisDirection::North,
        AxisDirection::South,
        AxisDirection::Up,
        AxisDirection::Down,
        AxisDirection::Other,
    ];

    /// Case-insensitive lookup of the WKT spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            AxisDirection::East => "EAST",
            AxisDirection::West => "WEST",
            AxisDirection::North => "NORTH",
            AxisDirection::South => "SOUTH",
            AxisDirection::Up => "UP",
            AxisDirection::Down => "DOWN",
            AxisDirection::Other => "OTHER",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            AxisDirection::East => AxisDirection::West,
            AxisDirection::West => AxisDirection::East,
            AxisDirection::North => AxisDirection::South,
            AxisDirection::South => AxisDirection::North,
            AxisDirection::Up => AxisDirection::Down,
            AxisDirection::Down => AxisDirection::Up,
            AxisDirection::Other => AxisDirection::Other,
        }
    }

    /// Direction with the sign removed (`WEST` becomes `EAST`).
    pub fn absolute(self) -> Self {
        match self {
            AxisDirection::West | AxisDirection::South | AxisDirection::Down => self.opposite(),
            _ => self,
        }
    }

    /// `OTHER` is treated as orthogonal to every direction.
    pub fn is_orthogonal_to(self, other: AxisDirection) -> bool {
        self == AxisDirection::Other
            || other == AxisDirection::Other
            || self.absolute() != other.absolute()
    }
}

impl fmt::Display for AxisDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    name: String,
    direction: AxisDirection,
    unit: Unit,
}

impl Axis {
    pub fn new(name: impl Into<String>, direction: AxisDirection, unit: Unit) -> Self {
        Self {
            name: name.into(),
            direction,
            unit,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> AxisDirection {
        self.direction
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }
}

/// Ordered sequence of one to three mutually orthogonal axes.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSystem {
    axes: SmallVec<[Axis; 3]>,
}

impl CoordinateSystem {
    pub fn new(axes: impl IntoIterator<Item = Axis>) -> Result<Self> {
        let axes: SmallVec<[Axis; 3]> = axes.into_iter().collect();
        if axes.is_empty() || axes.len() > 3 {
            return Err(Error::InvalidObject(format!(
                "a coordinate system needs 1 to 3 axes, got {}",
                axes.len()
            )));
        }
        for (i, a) in axes.iter().enumerate() {
            for b in &axes[i + 1..] {
                if !a.direction.is_orthogonal_to(b.direction) {
                    return Err(Error::InvalidObject(format!(
                        "axes '{}' ({}) and '{}' ({}) are not orthogonal",
                        a.name, a.direction, b.name, b.direction
                    )));
                }
            }
        }
        Ok(Self { axes })
    }

    /// Axes of several systems side by side, as in a compound CRS. No
    /// orthogonality or size check applies across the parts.
    pub fn concatenated<'a>(parts: impl IntoIterator<Item = &'a CoordinateSystem>) -> Self {
        Self {
            axes: parts
                .into_iter()
                .flat_map(|cs| cs.axes.iter().cloned())
                .collect(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn axis(&self, index: usize) -> Option<&Axis> {
        self.axes.get(index)
    }
}
