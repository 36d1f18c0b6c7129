use cellsim::celldevs::cell::NeighborState;
use cellsim::celldevs::{CellInputPort, CellMap, CellOutputPort, ExplicitScenario};
use cellsim::core::values::ErasedBags;
use cellsim::{
    Atomic, Cell, CellLogic, CellMessage, CellPosition, CellsCoupled, CompositionConfig, CompositionError, ConcurrencyMode,
    DelayPolicy, GridCoupled, GridScenario, ModelId, Neighborhood, PortId,
};
use std::collections::BTreeMap;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A cell burns once any neighbor weighted above one half burns
struct Fire {
    delay: u64,
}

impl CellLogic<u64, CellPosition, bool, f32> for Fire {
    fn local_computation(
        &self,
        _location: &CellPosition,
        state: &bool,
        neighborhood: &BTreeMap<CellPosition, NeighborState<bool, f32>>,
    ) -> bool {
        *state
            || neighborhood
                .values()
                .any(|neighbor| neighbor.state && neighbor.vicinity > 0.5)
    }

    fn output_delay(&self, _state: &bool) -> u64 {
        self.delay
    }
}

type FireCell = Cell<u64, CellPosition, bool, f32, Fire>;
type FireInput = CellInputPort<CellPosition, bool>;
type FireOutput = CellOutputPort<CellPosition, bool>;

fn fire_factory(delay: u64) -> impl Fn(&CellPosition, CellMap<CellPosition, bool, f32>, DelayPolicy) -> Result<FireCell, String> + Sync {
    move |_cell: &CellPosition, map: CellMap<CellPosition, bool, f32>, policy: DelayPolicy| {
        Cell::new(map, policy, Fire { delay }).map_err(|e| e.to_string())
    }
}

#[test]
fn test_lattice_wiring_completeness() {
    init_logging();
    let mut scenario = ExplicitScenario::new();
    scenario
        .add_cell(
            CellPosition::from([0, 0]),
            false,
            BTreeMap::from([(CellPosition::from([0, 1]), 0.75f32)]),
        )
        .add_cell(CellPosition::from([0, 1]), false, BTreeMap::new());

    let mut lattice: GridCoupled<u64, bool> = CellsCoupled::new("forest");
    lattice.add_lattice(&scenario, "transport", fire_factory(1)).unwrap();

    assert_eq!(lattice.models().len(), 2);
    assert!(lattice.models().contains(&ModelId::from("cell_0_0")));
    assert!(lattice.models().contains(&ModelId::from("cell_0_1")));
    assert_eq!(lattice.ic().len(), 1);

    let link = &lattice.ic()[0];
    assert_eq!(link.from_model, ModelId::from("cell_0_1"));
    assert_eq!(link.from_port, PortId::of::<FireOutput>());
    assert_eq!(link.to_model, ModelId::from("cell_0_0"));
    assert_eq!(link.to_port, PortId::of::<FireInput>());
    assert!(lattice.is_valid());
}

#[test]
fn test_cell_names_follow_positions() {
    assert_eq!(GridCoupled::<u64, bool>::cell_name(&CellPosition::from([3, 12])), "cell_3_12");
    assert_eq!(CellsCoupled::<u64, u32, bool>::cell_name(&7), "cell_7");
}

#[test]
fn test_fire_spreads_through_a_row() {
    init_logging();
    let neighborhood = Neighborhood::Custom {
        offsets: vec![(vec![0, -1], 1.0), (vec![0, 1], 0.25)],
    };
    let mut grid = GridScenario::new(vec![1, 3], false, neighborhood).unwrap();
    grid.set_state([0, 0], true).unwrap();

    let config = CompositionConfig::new().with_concurrency(ConcurrencyMode::Rayon);
    let mut lattice: GridCoupled<u64, bool> = CellsCoupled::new("row");
    lattice
        .add_lattice_with_config(&grid, "transport", fire_factory(2), &config)
        .unwrap();
    assert_eq!(lattice.ic().len(), 4);

    let names: Vec<ModelId> = lattice.models().ids().cloned().collect();
    let mut clock = 0u64;
    let mut burning_at = BTreeMap::new();

    for _ in 0..10 {
        // earliest next event over all cells
        let next = names
            .iter()
            .map(|id| lattice.models().get(id).unwrap().as_atomic().unwrap().time_advance())
            .filter(|ta| *ta != u64::MAX)
            .min();
        let ta = match next {
            Some(ta) => ta,
            None => break,
        };
        clock += ta;

        let imminent: Vec<ModelId> = names
            .iter()
            .filter(|id| lattice.models().get(id).unwrap().as_atomic().unwrap().time_advance() == ta)
            .cloned()
            .collect();

        let mut outputs = BTreeMap::new();
        for id in &imminent {
            let model = lattice.models().get(id).unwrap().as_atomic().unwrap();
            outputs.insert(id.clone(), model.output().unwrap());
        }
        let routed = lattice.route_outputs(&outputs).unwrap();

        for id in &names {
            let model = lattice.models_mut().get_mut(id).unwrap().as_atomic_mut().unwrap();
            let inbound = routed.internal.get(id).filter(|bags| bags.message_count() > 0);
            match (imminent.contains(id), inbound) {
                (true, Some(bags)) => model.confluence_transition(ta, bags).unwrap(),
                (true, None) => model.internal_transition().unwrap(),
                (false, Some(bags)) => model.external_transition(ta, bags).unwrap(),
                (false, None) => {
                    // keep every cell clock in step
                    let empty = model.empty_inputs();
                    model.external_transition(ta, &empty).unwrap()
                }
            }
        }

        for id in &names {
            let cell = lattice.models().get(id).unwrap().downcast_atomic::<FireCell>().unwrap();
            if *cell.state() {
                burning_at.entry(id.clone()).or_insert(clock);
            }
        }
    }

    assert_eq!(burning_at[&ModelId::from("cell_0_0")], 0);
    assert_eq!(burning_at[&ModelId::from("cell_0_1")], 0);
    assert_eq!(burning_at[&ModelId::from("cell_0_2")], 2);
}

#[test]
fn test_outputs_carry_location() {
    init_logging();
    let grid = GridScenario::new(vec![2, 2], true, Neighborhood::Moore { range: 1, weight: 1.0f32 }).unwrap();
    let mut lattice: GridCoupled<u64, bool> = CellsCoupled::new("burnt");
    lattice.add_lattice(&grid, "inertial", fire_factory(1)).unwrap();

    let id = ModelId::from("cell_1_0");
    let cell = lattice.models().get(&id).unwrap().as_atomic().unwrap();
    let outputs: ErasedBags = cell.output().unwrap();
    assert_eq!(
        outputs.messages::<FireOutput>(),
        &[CellMessage {
            location: CellPosition::from([1, 0]),
            state: true
        }]
    );
}

#[test]
fn test_unknown_policy_is_rejected() {
    init_logging();
    let grid = GridScenario::new(vec![2], false, Neighborhood::VonNeumann { range: 1, weight: 1.0f32 }).unwrap();
    let mut lattice: GridCoupled<u64, bool> = CellsCoupled::new("line");
    let err = lattice.add_lattice(&grid, "instant", fire_factory(1)).unwrap_err();
    assert_eq!(err, CompositionError::UnknownDelayPolicy("instant".to_string()));
    assert!(lattice.models().is_empty());
}
