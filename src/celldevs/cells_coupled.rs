use super::cell::{CellInputPort, CellOutputPort};
use super::delay_buffer::DelayPolicy;
use super::grid::CellPosition;
use super::scenario::{check_vicinity, CellId, CellMap, Scenario};
use crate::core::config::{CompositionConfig, ConcurrencyMode};
use crate::core::errors::CompositionError;
use crate::core::models::{Atomic, CoupledModel, Model};
use crate::core::types::{ModelId, SimTime};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

/// Coupled model holding a Cell-DEVS lattice.
///
/// Cells exchange [`CellMessage`](super::cell::CellMessage)s through
/// [`CellOutputPort`] -> [`CellInputPort`] internal couplings derived from
/// their vicinities.
pub struct CellsCoupled<T: SimTime, C, S> {
    model: CoupledModel<T>,
    _cells: PhantomData<fn() -> (C, S)>,
}

/// Lattice of cells addressed by grid position
pub type GridCoupled<T, S> = CellsCoupled<T, CellPosition, S>;

impl<T, C, S> CellsCoupled<T, C, S>
where
    T: SimTime,
    C: CellId,
    S: Clone + Send + Sync + 'static,
{
    pub fn new(id: impl Into<ModelId>) -> Self {
        Self {
            model: CoupledModel::new(id),
            _cells: PhantomData,
        }
    }

    /// Model name of the cell at `cell`
    pub fn cell_name(cell: &C) -> String {
        format!("cell_{}", cell.name_fragment())
    }

    /// Couple every neighbor's output to the input of `cell`
    pub fn add_cell_vicinity<V>(&mut self, cell: &C, vicinity: &BTreeMap<C, V>) {
        let to = Self::cell_name(cell);
        for neighbor in vicinity.keys() {
            self.model
                .add_ic::<CellOutputPort<C, S>, CellInputPort<C, S>>(Self::cell_name(neighbor), to.clone());
        }
    }

    /// Add one cell per scenario location and wire them by vicinity.
    ///
    /// `factory` builds the atomic model of a cell from its location, its
    /// scenario data and the delay policy. Extra construction arguments are
    /// captured by the closure.
    pub fn add_lattice<V, M, Sc, F>(&mut self, scenario: &Sc, delay_policy: &str, factory: F) -> Result<(), CompositionError>
    where
        V: Clone + Send + Sync,
        M: Atomic<Time = T, Input = (CellInputPort<C, S>,), Output = (CellOutputPort<C, S>,)>,
        Sc: Scenario<C, S, V> + Sync + ?Sized,
        F: Fn(&C, CellMap<C, S, V>, DelayPolicy) -> Result<M, String> + Sync,
    {
        self.add_lattice_with_config(scenario, delay_policy, factory, &CompositionConfig::default())
    }

    /// [`CellsCoupled::add_lattice`] with explicit composition settings.
    ///
    /// Nothing is registered unless every cell was built and every vicinity
    /// only names locations of the scenario. When the composition fails
    /// validation afterwards, the new cells and couplings are removed again.
    pub fn add_lattice_with_config<V, M, Sc, F>(
        &mut self,
        scenario: &Sc,
        delay_policy: &str,
        factory: F,
        config: &CompositionConfig,
    ) -> Result<(), CompositionError>
    where
        V: Clone + Send + Sync,
        M: Atomic<Time = T, Input = (CellInputPort<C, S>,), Output = (CellOutputPort<C, S>,)>,
        Sc: Scenario<C, S, V> + Sync + ?Sized,
        F: Fn(&C, CellMap<C, S, V>, DelayPolicy) -> Result<M, String> + Sync,
    {
        let policy: DelayPolicy = delay_policy.parse()?;
        let cells = scenario.cells();
        let known: BTreeSet<C> = cells.iter().cloned().collect();
        if known.len() != cells.len() {
            return Err(CompositionError::InvalidScenario(
                "scenario lists a location more than once".to_string(),
            ));
        }

        let build = |cell: &C| -> Result<(ModelId, M, BTreeMap<C, V>), CompositionError> {
            let map = scenario.cell_map(cell)?;
            check_vicinity(&map, &known)?;
            let vicinity = map.vicinity.clone();
            let name = Self::cell_name(cell);
            let model = factory(cell, map, policy).map_err(|reason| CompositionError::CellConstruction {
                cell: name.clone(),
                reason,
            })?;
            Ok((ModelId::new(name), model, vicinity))
        };

        let built: Vec<(ModelId, M, BTreeMap<C, V>)> = match config.concurrency_mode {
            ConcurrencyMode::Sequential => cells.iter().map(build).collect::<Result<_, _>>()?,
            ConcurrencyMode::Rayon => match config.thread_pool_size {
                Some(threads) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .build()
                        .map_err(|e| CompositionError::ThreadPool(e.to_string()))?;
                    pool.install(|| cells.par_iter().map(build).collect::<Result<_, _>>())?
                }
                None => cells.par_iter().map(build).collect::<Result<_, _>>()?,
            },
        };

        if let Some((id, _, _)) = built.iter().find(|(id, _, _)| self.model.models().contains(id)) {
            return Err(CompositionError::DuplicateModel(id.clone()));
        }

        let links_before = self.model.ic().len();
        let mut registered = Vec::with_capacity(built.len());
        let mut vicinities = Vec::with_capacity(built.len());
        for (id, model, vicinity) in built {
            if let Err(e) = self.model.add_model(Model::atomic(id.clone(), model)) {
                self.rollback(&registered, links_before);
                return Err(e);
            }
            registered.push(id);
            vicinities.push(vicinity);
        }
        for (cell, vicinity) in cells.iter().zip(&vicinities) {
            self.add_cell_vicinity(cell, vicinity);
        }

        if config.validate_after_compose {
            if let Err(e) = self.model.validate() {
                self.rollback(&registered, links_before);
                return Err(e);
            }
            debug!("Lattice '{}' passed coupling validation", self.model.id());
        }

        info!(
            "Lattice '{}' composed: {} cells, {} internal couplings ({} policy)",
            self.model.id(),
            cells.len(),
            self.model.ic().len() - links_before,
            policy
        );
        Ok(())
    }

    /// Undo a partially committed lattice
    fn rollback(&mut self, registered: &[ModelId], links_before: usize) {
        for id in registered {
            self.model.models_mut().remove(id);
        }
        self.model.truncate_ic(links_before);
        warn!(
            "Lattice '{}' rolled back: {} cells removed",
            self.model.id(),
            registered.len()
        );
    }

    pub fn as_coupled(&self) -> &CoupledModel<T> {
        &self.model
    }

    pub fn as_coupled_mut(&mut self) -> &mut CoupledModel<T> {
        &mut self.model
    }

    pub fn into_coupled(self) -> CoupledModel<T> {
        self.model
    }
}

impl<T: SimTime, C, S> Deref for CellsCoupled<T, C, S> {
    type Target = CoupledModel<T>;

    fn deref(&self) -> &CoupledModel<T> {
        &self.model
    }
}

impl<T: SimTime, C, S> DerefMut for CellsCoupled<T, C, S> {
    fn deref_mut(&mut self) -> &mut CoupledModel<T> {
        &mut self.model
    }
}
