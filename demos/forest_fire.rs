use cellsim::celldevs::cell::NeighborState;
use cellsim::celldevs::CellMap;
use cellsim::{
    Atomic, Cell, CellLogic, CellPosition, CellsCoupled, CompositionConfig, ConcurrencyMode, DelayPolicy, GridCoupled,
    GridScenario, ModelId, Neighborhood,
};
use log::info;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

const ROWS: usize = 24;
const COLS: usize = 24;
const IGNITIONS: usize = 3;

/// Burning spreads to any cell with a burning neighbor
struct Fire {
    spread_delay: u64,
}

impl CellLogic<u64, CellPosition, bool, f32> for Fire {
    fn local_computation(
        &self,
        _location: &CellPosition,
        state: &bool,
        neighborhood: &BTreeMap<CellPosition, NeighborState<bool, f32>>,
    ) -> bool {
        *state || neighborhood.values().any(|neighbor| neighbor.state && neighbor.vicinity > 0.0)
    }

    fn output_delay(&self, _state: &bool) -> u64 {
        self.spread_delay
    }
}

type FireCell = Cell<u64, CellPosition, bool, f32, Fire>;

fn main() -> Result<(), String> {
    env_logger::init();

    println!("🔥 Forest fire on a {}x{} lattice", ROWS, COLS);

    let mut rng = rand::thread_rng();
    let mut grid = GridScenario::new(vec![ROWS, COLS], false, Neighborhood::VonNeumann { range: 1, weight: 1.0f32 })
        .map_err(|e| e.to_string())?;
    for _ in 0..IGNITIONS {
        let position = [rng.gen_range(0..ROWS as i32), rng.gen_range(0..COLS as i32)];
        grid.set_state(position, true).map_err(|e| e.to_string())?;
        println!("   ignition at ({}, {})", position[0], position[1]);
    }

    // Per-cell spread delay
    let delays: HashMap<CellPosition, u64> = grid
        .positions()
        .into_iter()
        .map(|position| (position, rng.gen_range(1..=4)))
        .collect();

    let config = CompositionConfig::new()
        .with_concurrency(ConcurrencyMode::Rayon)
        .with_thread_pool_size(4);
    let mut forest: GridCoupled<u64, bool> = CellsCoupled::new("forest");
    forest
        .add_lattice_with_config(
            &grid,
            "transport",
            |cell: &CellPosition, map: CellMap<CellPosition, bool, f32>, policy: DelayPolicy| {
                let spread_delay = delays.get(cell).copied().ok_or("no delay for cell")?;
                Cell::new(map, policy, Fire { spread_delay }).map_err(|e| e.to_string())
            },
            &config,
        )
        .map_err(|e| e.to_string())?;

    println!(
        "✅ Composed {} cells with {} couplings",
        forest.models().len(),
        forest.ic().len()
    );

    let names: Vec<ModelId> = forest.models().ids().cloned().collect();
    let mut clock = 0u64;

    loop {
        let next = names
            .iter()
            .filter_map(|id| forest.models().get(id)?.as_atomic())
            .map(|model| model.time_advance())
            .filter(|ta| *ta != u64::MAX)
            .min();
        let ta = match next {
            Some(ta) => ta,
            None => break,
        };
        clock += ta;

        let mut outputs = BTreeMap::new();
        for id in &names {
            if let Some(model) = forest.models().get(id).and_then(|model| model.as_atomic()) {
                if model.time_advance() == ta {
                    outputs.insert(id.clone(), model.output().map_err(|e| e.to_string())?);
                }
            }
        }
        let routed = forest.route_outputs(&outputs).map_err(|e| e.to_string())?;

        for id in &names {
            let model = match forest.models_mut().get_mut(id).and_then(|model| model.as_atomic_mut()) {
                Some(model) => model,
                None => continue,
            };
            let imminent = outputs.contains_key(id);
            let result = match (imminent, routed.internal.get(id)) {
                (true, Some(bags)) => model.confluence_transition(ta, bags),
                (true, None) => model.internal_transition(),
                (false, Some(bags)) => model.external_transition(ta, bags),
                (false, None) => {
                    let empty = model.empty_inputs();
                    model.external_transition(ta, &empty)
                }
            };
            result.map_err(|e| e.to_string())?;
        }

        let burning = names
            .iter()
            .filter_map(|id| forest.models().get(id)?.downcast_atomic::<FireCell>())
            .filter(|cell| *cell.state())
            .count();
        info!("t={} burning={}", clock, burning);
        println!("   t={:>3}  burning cells: {}", clock, burning);
    }

    println!("🏁 Fire stopped spreading at t={}", clock);
    Ok(())
}
