//! Axis-order normalization between a CRS's native axes and east-north-up.

use std::fmt;
use std::str::FromStr;

use crate::error::CrsError;
use crate::point::Point;

/// Direction of one coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisDir {
    East,
    West,
    North,
    South,
    Up,
    Down,
}

impl AxisDir {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'e' => Some(Self::East),
            'w' => Some(Self::West),
            'n' => Some(Self::North),
            's' => Some(Self::South),
            'u' => Some(Self::Up),
            'd' => Some(Self::Down),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Self::East => 'e',
            Self::West => 'w',
            Self::North => 'n',
            Self::South => 's',
            Self::Up => 'u',
            Self::Down => 'd',
        }
    }

    /// Canonical slot (0 = x, 1 = y, 2 = z) and sign of this direction.
    fn canonical(self) -> (usize, f64) {
        match self {
            Self::East => (0, 1.0),
            Self::West => (0, -1.0),
            Self::North => (1, 1.0),
            Self::South => (1, -1.0),
            Self::Up => (2, 1.0),
            Self::Down => (2, -1.0),
        }
    }
}

/// A 3-letter axis code such as `enu` or `neu`.
///
/// Each of the east/west, north/south and up/down pairs appears exactly once,
/// and up/down always sits in the third slot so 2-D points carry no vertical
/// component in x or y.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisOrder([AxisDir; 3]);

impl AxisOrder {
    pub const ENU: AxisOrder = AxisOrder([AxisDir::East, AxisDir::North, AxisDir::Up]);

    pub fn new(dirs: [AxisDir; 3]) -> Result<Self, CrsError> {
        let mut seen = [false; 3];
        for dir in dirs {
            let (slot, _) = dir.canonical();
            if seen[slot] {
                return Err(CrsError::Configuration(format!(
                    "axis order {} repeats a direction",
                    AxisOrder(dirs)
                )));
            }
            seen[slot] = true;
        }
        if dirs[2].canonical().0 != 2 {
            return Err(CrsError::Configuration(format!(
                "axis order {} puts a vertical direction in a horizontal slot",
                AxisOrder(dirs)
            )));
        }
        Ok(Self(dirs))
    }

    pub fn dirs(&self) -> [AxisDir; 3] {
        self.0
    }

    pub fn is_enu(&self) -> bool {
        *self == Self::ENU
    }

    /// Reorder/negate native components into east-north-up.
    pub fn normalize(&self, point: &mut Point) {
        let input = [point.x, point.y, point.height()];
        let mut out = [0.0; 3];
        for (value, dir) in input.iter().zip(self.0) {
            let (slot, sign) = dir.canonical();
            out[slot] = sign * value;
        }
        point.x = out[0];
        point.y = out[1];
        if point.z.is_some() {
            point.z = Some(out[2]);
        }
    }

    /// Map east-north-up components back to native order.
    ///
    /// A point without height keeps no height: the third native slot is
    /// left unwritten.
    pub fn denormalize(&self, point: &mut Point) {
        let input = [point.x, point.y, point.height()];
        let mut out = [0.0; 3];
        for (i, dir) in self.0.iter().enumerate() {
            let (slot, sign) = dir.canonical();
            out[i] = sign * input[slot];
        }
        point.x = out[0];
        point.y = out[1];
        if point.z.is_some() {
            point.z = Some(out[2]);
        }
    }
}

impl Default for AxisOrder {
    fn default() -> Self {
        Self::ENU
    }
}

impl FromStr for AxisOrder {
    type Err = CrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 3 {
            return Err(CrsError::Configuration(format!(
                "axis order must have 3 letters, got '{s}'"
            )));
        }
        let mut dirs = [AxisDir::East; 3];
        for (dir, c) in dirs.iter_mut().zip(chars) {
            *dir = AxisDir::from_char(c).ok_or_else(|| {
                CrsError::Configuration(format!("illegal axis letter '{c}' in '{s}'"))
            })?;
        }
        Self::new(dirs)
    }
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|d| write!(f, "{}", d.as_char()))
    }
}
