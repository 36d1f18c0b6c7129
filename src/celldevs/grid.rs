use super::scenario::{CellId, CellMap, Scenario};
use crate::core::errors::CompositionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coordinate of a cell in an n-dimensional lattice
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellPosition(Vec<i32>);

impl CellPosition {
    pub fn new(coords: Vec<i32>) -> Self {
        Self(coords)
    }

    pub fn coords(&self) -> &[i32] {
        &self.0
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    /// Position shifted by `offset`, or `None` when the dimensions differ
    pub fn offset(&self, offset: &[i32]) -> Option<CellPosition> {
        if offset.len() != self.0.len() {
            return None;
        }
        Some(CellPosition(self.0.iter().zip(offset).map(|(a, b)| a + b).collect()))
    }
}

impl CellId for CellPosition {
    fn name_fragment(&self) -> String {
        self.0
            .iter()
            .map(|coord| coord.to_string())
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl std::fmt::Display for CellPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, coord) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", coord)?;
        }
        write!(f, ")")
    }
}

impl From<Vec<i32>> for CellPosition {
    fn from(coords: Vec<i32>) -> Self {
        Self(coords)
    }
}

impl<const N: usize> From<[i32; N]> for CellPosition {
    fn from(coords: [i32; N]) -> Self {
        Self(coords.to_vec())
    }
}

/// Relative neighborhood shared by every cell of a grid.
///
/// Moore and von Neumann neighborhoods include the cell itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Neighborhood<V> {
    /// Chebyshev distance up to `range`
    Moore { range: u32, weight: V },
    /// Manhattan distance up to `range`
    VonNeumann { range: u32, weight: V },
    /// Explicit relative offsets with their own weights
    Custom { offsets: Vec<(Vec<i32>, V)> },
}

impl<V: Clone> Neighborhood<V> {
    /// Relative offsets and weights for a lattice of `dimensions` dimensions
    pub fn offsets(&self, dimensions: usize) -> Vec<(Vec<i32>, V)> {
        match self {
            Neighborhood::Moore { range, weight } => box_offsets(dimensions, *range as i32)
                .into_iter()
                .map(|offset| (offset, weight.clone()))
                .collect(),
            Neighborhood::VonNeumann { range, weight } => box_offsets(dimensions, *range as i32)
                .into_iter()
                .filter(|offset| offset.iter().map(|d| d.abs()).sum::<i32>() <= *range as i32)
                .map(|offset| (offset, weight.clone()))
                .collect(),
            Neighborhood::Custom { offsets } => offsets.clone(),
        }
    }
}

/// Every offset with each coordinate in `-range..=range`
fn box_offsets(dimensions: usize, range: i32) -> Vec<Vec<i32>> {
    let mut offsets = vec![Vec::new()];
    for _ in 0..dimensions {
        offsets = offsets
            .into_iter()
            .flat_map(|prefix| {
                (-range..=range).map(move |d| {
                    let mut next = prefix.clone();
                    next.push(d);
                    next
                })
            })
            .collect();
    }
    offsets
}

/// Lattice scenario: a shape, a shared neighborhood and initial states.
///
/// Deserialized grids go through the same checks as [`GridScenario::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "GridScenarioData<S, V>",
    into = "GridScenarioData<S, V>",
    bound(
        serialize = "S: Serialize + Clone, V: Serialize + Clone",
        deserialize = "S: Deserialize<'de> + Clone, V: Deserialize<'de> + Clone"
    )
)]
pub struct GridScenario<S, V> {
    shape: Vec<usize>,
    /// Toroidal borders
    wrapped: bool,
    default_state: S,
    states: BTreeMap<CellPosition, S>,
    neighborhood: Neighborhood<V>,
}

/// Serialized form of a [`GridScenario`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, V: Serialize",
    deserialize = "S: Deserialize<'de>, V: Deserialize<'de>"
))]
pub struct GridScenarioData<S, V> {
    pub shape: Vec<usize>,
    #[serde(default)]
    pub wrapped: bool,
    pub default_state: S,
    /// Cells whose initial state differs from `default_state`
    #[serde(default)]
    pub states: Vec<(CellPosition, S)>,
    pub neighborhood: Neighborhood<V>,
}

impl<S: Clone, V: Clone> TryFrom<GridScenarioData<S, V>> for GridScenario<S, V> {
    type Error = CompositionError;

    fn try_from(data: GridScenarioData<S, V>) -> Result<Self, CompositionError> {
        let mut grid = GridScenario::new(data.shape, data.default_state, data.neighborhood)?.with_wrapping(data.wrapped);
        for (position, state) in data.states {
            grid.set_state(position, state)?;
        }
        Ok(grid)
    }
}

impl<S, V> From<GridScenario<S, V>> for GridScenarioData<S, V> {
    fn from(grid: GridScenario<S, V>) -> Self {
        GridScenarioData {
            shape: grid.shape,
            wrapped: grid.wrapped,
            default_state: grid.default_state,
            states: grid.states.into_iter().collect(),
            neighborhood: grid.neighborhood,
        }
    }
}

impl<S: Clone, V: Clone> GridScenario<S, V> {
    pub fn new(shape: Vec<usize>, default_state: S, neighborhood: Neighborhood<V>) -> Result<Self, CompositionError> {
        if shape.is_empty() || shape.contains(&0) {
            return Err(CompositionError::InvalidScenario(format!(
                "grid shape {:?} has no cells",
                shape
            )));
        }

        if let Neighborhood::Custom { offsets } = &neighborhood {
            if let Some((offset, _)) = offsets.iter().find(|(offset, _)| offset.len() != shape.len()) {
                return Err(CompositionError::InvalidScenario(format!(
                    "neighbor offset {:?} does not match {} dimensions",
                    offset,
                    shape.len()
                )));
            }
        }

        Ok(Self {
            shape,
            wrapped: false,
            default_state,
            states: BTreeMap::new(),
            neighborhood,
        })
    }

    /// Enable or disable toroidal borders
    pub fn with_wrapping(mut self, wrapped: bool) -> Self {
        self.wrapped = wrapped;
        self
    }

    /// Set the initial state of one cell
    pub fn set_state(&mut self, position: impl Into<CellPosition>, state: S) -> Result<(), CompositionError> {
        let position = position.into();
        if !self.contains(&position) {
            return Err(CompositionError::InvalidScenario(format!(
                "position {} is outside grid {:?}",
                position, self.shape
            )));
        }
        self.states.insert(position, state);
        Ok(())
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    pub fn neighborhood(&self) -> &Neighborhood<V> {
        &self.neighborhood
    }

    /// Initial state of a cell, falling back to the default state
    pub fn state(&self, position: &CellPosition) -> &S {
        self.states.get(position).unwrap_or(&self.default_state)
    }

    pub fn contains(&self, position: &CellPosition) -> bool {
        position.dimensions() == self.shape.len()
            && position
                .coords()
                .iter()
                .zip(&self.shape)
                .all(|(coord, size)| *coord >= 0 && (*coord as usize) < *size)
    }

    /// Every position of the grid, in row-major order
    pub fn positions(&self) -> Vec<CellPosition> {
        let mut positions = vec![Vec::new()];
        for size in &self.shape {
            positions = positions
                .into_iter()
                .flat_map(|prefix: Vec<i32>| {
                    (0..*size as i32).map(move |coord| {
                        let mut next = prefix.clone();
                        next.push(coord);
                        next
                    })
                })
                .collect();
        }
        positions.into_iter().map(CellPosition).collect()
    }

    /// Neighbor of `position` at `offset`, if it lies inside the grid.
    ///
    /// `None` as well when `position` or `offset` do not have the grid's
    /// dimensions.
    pub fn neighbor(&self, position: &CellPosition, offset: &[i32]) -> Option<CellPosition> {
        if position.dimensions() != self.shape.len() {
            return None;
        }
        let shifted = position.offset(offset)?;
        if self.wrapped {
            let coords = shifted
                .coords()
                .iter()
                .zip(&self.shape)
                .map(|(coord, size)| coord.rem_euclid(*size as i32))
                .collect();
            Some(CellPosition(coords))
        } else if self.contains(&shifted) {
            Some(shifted)
        } else {
            None
        }
    }

    /// Neighbor location -> weight for one cell.
    ///
    /// On a wrapped grid several offsets can fold onto the same neighbor;
    /// that neighbor keeps the weight of the first such offset.
    pub fn vicinity(&self, position: &CellPosition) -> BTreeMap<CellPosition, V> {
        let mut vicinity = BTreeMap::new();
        for (offset, weight) in self.neighborhood.offsets(self.shape.len()) {
            if let Some(neighbor) = self.neighbor(position, &offset) {
                vicinity.entry(neighbor).or_insert(weight);
            }
        }
        vicinity
    }
}

impl<S: Clone, V: Clone> Scenario<CellPosition, S, V> for GridScenario<S, V> {
    fn cells(&self) -> Vec<CellPosition> {
        self.positions()
    }

    fn cell_map(&self, cell: &CellPosition) -> Result<CellMap<CellPosition, S, V>, CompositionError> {
        if !self.contains(cell) {
            return Err(CompositionError::MissingCellData(cell.to_string()));
        }

        let vicinity = self.vicinity(cell);
        let neighbors = vicinity
            .keys()
            .map(|neighbor| (neighbor.clone(), self.state(neighbor).clone()))
            .collect();

        Ok(CellMap {
            location: cell.clone(),
            state: self.state(cell).clone(),
            vicinity,
            neighbors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_naming_and_display() {
        let position = CellPosition::from([2, 0, 7]);
        assert_eq!(position.name_fragment(), "2_0_7");
        assert_eq!(position.to_string(), "(2, 0, 7)");
        assert_eq!(position.offset(&[-1, 1, 0]), Some(CellPosition::from([1, 1, 7])));
        assert_eq!(position.offset(&[0, 1]), None);
    }

    #[test]
    fn test_neighborhood_offsets() {
        let moore = Neighborhood::Moore { range: 1, weight: 1 };
        assert_eq!(moore.offsets(2).len(), 9);

        let von_neumann = Neighborhood::VonNeumann { range: 1, weight: 1 };
        let offsets: Vec<Vec<i32>> = von_neumann.offsets(2).into_iter().map(|(o, _)| o).collect();
        assert_eq!(offsets.len(), 5);
        assert!(offsets.contains(&vec![0, 0]));
        assert!(!offsets.contains(&vec![1, 1]));

        assert_eq!(Neighborhood::VonNeumann { range: 2, weight: () }.offsets(2).len(), 13);
    }

    #[test]
    fn test_invalid_grids() {
        assert!(GridScenario::new(vec![], 0, Neighborhood::Moore { range: 1, weight: 1 }).is_err());
        assert!(GridScenario::new(vec![3, 0], 0, Neighborhood::Moore { range: 1, weight: 1 }).is_err());

        let custom = Neighborhood::Custom {
            offsets: vec![(vec![0, 1, 0], 1)],
        };
        assert!(GridScenario::new(vec![3, 3], 0, custom).is_err());
    }

    #[test]
    fn test_positions_row_major() {
        let grid = GridScenario::new(vec![2, 3], 0, Neighborhood::Moore { range: 1, weight: 1 }).unwrap();
        let positions = grid.positions();
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[0], CellPosition::from([0, 0]));
        assert_eq!(positions[1], CellPosition::from([0, 1]));
        assert_eq!(positions[5], CellPosition::from([1, 2]));
    }

    #[test]
    fn test_borders_clip_or_wrap() {
        let neighborhood = Neighborhood::VonNeumann { range: 1, weight: 1.0 };
        let grid = GridScenario::new(vec![3, 3], 0u8, neighborhood).unwrap();
        let corner = CellPosition::from([0, 0]);
        assert_eq!(grid.vicinity(&corner).len(), 3);

        let grid = grid.with_wrapping(true);
        let vicinity = grid.vicinity(&corner);
        assert_eq!(vicinity.len(), 5);
        assert!(vicinity.contains_key(&CellPosition::from([2, 0])));
        assert!(vicinity.contains_key(&CellPosition::from([0, 2])));
    }

    #[test]
    fn test_cell_map_uses_custom_states() {
        let neighborhood = Neighborhood::Custom {
            offsets: vec![(vec![0, 1], 0.25), (vec![0, -1], 0.75)],
        };
        let mut grid = GridScenario::new(vec![1, 3], false, neighborhood).unwrap();
        grid.set_state([0, 2], true).unwrap();
        assert!(grid.set_state([1, 0], true).is_err());

        let map = grid.cell_map(&CellPosition::from([0, 1])).unwrap();
        assert!(!map.state);
        assert_eq!(map.vicinity.len(), 2);
        assert_eq!(map.vicinity[&CellPosition::from([0, 2])], 0.25);
        assert_eq!(map.neighbors[&CellPosition::from([0, 2])], true);
        assert_eq!(map.neighbors[&CellPosition::from([0, 0])], false);

        assert!(grid.cell_map(&CellPosition::from([4, 4])).is_err());
    }

    #[test]
    fn test_mismatched_offset_has_no_neighbor() {
        let grid = GridScenario::new(vec![3], 0u8, Neighborhood::Moore { range: 1, weight: 1.0 }).unwrap();
        assert_eq!(grid.neighbor(&CellPosition::from([1]), &[0, 1]), None);
        assert_eq!(grid.neighbor(&CellPosition::from([1, 0]), &[1, 0]), None);
        assert_eq!(grid.neighbor(&CellPosition::from([1]), &[1]), Some(CellPosition::from([2])));
    }

    #[test]
    fn test_folded_neighbor_keeps_first_weight() {
        let neighborhood = Neighborhood::Custom {
            offsets: vec![(vec![1], 0.25), (vec![-1], 0.75)],
        };
        let grid = GridScenario::new(vec![2], 0u8, neighborhood).unwrap().with_wrapping(true);
        let vicinity = grid.vicinity(&CellPosition::from([0]));
        assert_eq!(vicinity.len(), 1);
        assert_eq!(vicinity[&CellPosition::from([1])], 0.25);
    }

    #[test]
    fn test_deserialized_grid_is_checked() {
        let bad_offset = r#"{
            "shape": [3],
            "default_state": 0,
            "neighborhood": { "type": "custom", "offsets": [[[0, 1], 1.0]] }
        }"#;
        assert!(serde_json::from_str::<GridScenario<u8, f64>>(bad_offset).is_err());

        let empty_shape = r#"{
            "shape": [0, 2],
            "default_state": 0,
            "neighborhood": { "type": "moore", "range": 1, "weight": 1.0 }
        }"#;
        assert!(serde_json::from_str::<GridScenario<u8, f64>>(empty_shape).is_err());

        let outside = r#"{
            "shape": [2],
            "default_state": 0,
            "states": [[[5], 1]],
            "neighborhood": { "type": "moore", "range": 1, "weight": 1.0 }
        }"#;
        assert!(serde_json::from_str::<GridScenario<u8, f64>>(outside).is_err());
    }

    #[test]
    fn test_grid_json_round_trip() {
        let mut grid = GridScenario::new(vec![2, 2], false, Neighborhood::VonNeumann { range: 1, weight: 0.5 })
            .unwrap()
            .with_wrapping(true);
        grid.set_state([1, 1], true).unwrap();

        let json = serde_json::to_string(&grid).unwrap();
        let loaded: GridScenario<bool, f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, grid);
        assert!(*loaded.state(&CellPosition::from([1, 1])));
    }
}
