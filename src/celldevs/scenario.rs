use crate::core::errors::CompositionError;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::hash::Hash;

/// Location of a cell inside a scenario
pub trait CellId: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static {
    /// Fragment used to derive the cell's model name
    fn name_fragment(&self) -> String;
}

macro_rules! impl_scalar_cell_id {
    ($($ty:ty),*) => {
        $(
            impl CellId for $ty {
                fn name_fragment(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_scalar_cell_id!(String, u32, u64, usize, i32, i64);

/// Everything a cell needs to be built
#[derive(Debug, Clone, PartialEq)]
pub struct CellMap<C, S, V> {
    pub location: C,
    /// Initial state of the cell
    pub state: S,
    /// Neighbor location -> influence of that neighbor on this cell
    pub vicinity: BTreeMap<C, V>,
    /// Initial state of every neighbor in `vicinity`
    pub neighbors: BTreeMap<C, S>,
}

/// Spatial description consumed by the lattice composer
pub trait Scenario<C: CellId, S, V> {
    /// Every location of the scenario, in composition order
    fn cells(&self) -> Vec<C>;

    /// Construction data of one location
    fn cell_map(&self, cell: &C) -> Result<CellMap<C, S, V>, CompositionError>;
}

/// Scenario listing every cell with its own vicinity.
///
/// Suited for irregular topologies where neighborhoods are not derived from
/// a lattice shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitScenario<C: CellId, S, V> {
    cells: BTreeMap<C, (S, BTreeMap<C, V>)>,
}

impl<C: CellId, S, V> ExplicitScenario<C, S, V> {
    pub fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Add a cell, replacing any previous definition of the same location
    pub fn add_cell(&mut self, location: C, state: S, vicinity: BTreeMap<C, V>) -> &mut Self {
        self.cells.insert(location, (state, vicinity));
        self
    }

    pub fn contains(&self, location: &C) -> bool {
        self.cells.contains_key(location)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<C: CellId, S, V> Default for ExplicitScenario<C, S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CellId, S: Clone, V: Clone> Scenario<C, S, V> for ExplicitScenario<C, S, V> {
    fn cells(&self) -> Vec<C> {
        self.cells.keys().cloned().collect()
    }

    fn cell_map(&self, cell: &C) -> Result<CellMap<C, S, V>, CompositionError> {
        let (state, vicinity) = self
            .cells
            .get(cell)
            .ok_or_else(|| CompositionError::MissingCellData(format!("{:?}", cell)))?;

        let mut neighbors = BTreeMap::new();
        for neighbor in vicinity.keys() {
            let (neighbor_state, _) =
                self.cells
                    .get(neighbor)
                    .ok_or_else(|| CompositionError::UnknownNeighbor {
                        cell: format!("{:?}", cell),
                        neighbor: format!("{:?}", neighbor),
                    })?;
            neighbors.insert(neighbor.clone(), neighbor_state.clone());
        }

        Ok(CellMap {
            location: cell.clone(),
            state: state.clone(),
            vicinity: vicinity.clone(),
            neighbors,
        })
    }
}

/// Check that every neighbor of `map` is one of `cells`
pub(crate) fn check_vicinity<C: CellId, S, V>(
    map: &CellMap<C, S, V>,
    cells: &BTreeSet<C>,
) -> Result<(), CompositionError> {
    match map.vicinity.keys().find(|neighbor| !cells.contains(*neighbor)) {
        Some(neighbor) => Err(CompositionError::UnknownNeighbor {
            cell: format!("{:?}", map.location),
            neighbor: format!("{:?}", neighbor),
        }),
        None => Ok(()),
    }
}
