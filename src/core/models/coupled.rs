use super::atomic::Atomic;
use super::model::Model;
use super::registry::ModelRegistry;
use crate::core::connections::{
    CouplingValidator, ExternalInputCoupling, ExternalOutputCoupling, InternalCoupling,
};
use crate::core::errors::{CompositionError, ModelError};
use crate::core::types::{ModelId, SimTime};
use crate::core::values::{ErasedBags, Port, PortId};
use log::debug;
use std::collections::BTreeMap;

/// Messages produced by one round of output routing
#[derive(Debug, Clone, Default)]
pub struct RoutedMessages {
    /// Inbound bags per destination child (IC)
    pub internal: BTreeMap<ModelId, ErasedBags>,
    /// Parent output bags (EOC), one entry per declared output port
    pub external: ErasedBags,
}

/// Parallel DEVS coupled model.
///
/// Owns its children and the three coupling lists. Children are referenced
/// by [`ModelId`] only.
pub struct CoupledModel<T: SimTime> {
    id: ModelId,
    input_ports: Vec<PortId>,
    output_ports: Vec<PortId>,
    models: ModelRegistry<T>,
    eic: Vec<ExternalInputCoupling>,
    eoc: Vec<ExternalOutputCoupling>,
    ic: Vec<InternalCoupling>,
}

impl<T: SimTime> CoupledModel<T> {
    pub fn new(id: impl Into<ModelId>) -> Self {
        Self {
            id: id.into(),
            input_ports: Vec::new(),
            output_ports: Vec::new(),
            models: ModelRegistry::new(),
            eic: Vec::new(),
            eoc: Vec::new(),
            ic: Vec::new(),
        }
    }

    /// Build a coupled model from its parts, failing if any link is invalid
    pub fn from_parts(
        id: impl Into<ModelId>,
        input_ports: Vec<PortId>,
        output_ports: Vec<PortId>,
        models: ModelRegistry<T>,
        eic: Vec<ExternalInputCoupling>,
        eoc: Vec<ExternalOutputCoupling>,
        ic: Vec<InternalCoupling>,
    ) -> Result<Self, CompositionError> {
        let model = Self {
            id: id.into(),
            input_ports,
            output_ports,
            models,
            eic,
            eoc,
            ic,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    /// Declare input port `P`
    pub fn add_input_port<P: Port>(&mut self) -> &mut Self {
        let port = PortId::of::<P>();
        if !CouplingValidator::is_in(&port, &self.input_ports) {
            self.input_ports.push(port);
        }
        self
    }

    /// Declare output port `P`
    pub fn add_output_port<P: Port>(&mut self) -> &mut Self {
        let port = PortId::of::<P>();
        if !CouplingValidator::is_in(&port, &self.output_ports) {
            self.output_ports.push(port);
        }
        self
    }

    /// Register a child model
    pub fn add_model(&mut self, model: Model<T>) -> Result<(), CompositionError> {
        self.models.register(model)
    }

    /// Register a typed atomic child under `id`
    pub fn add_atomic<M: Atomic<Time = T>>(
        &mut self,
        id: impl Into<ModelId>,
        model: M,
    ) -> Result<(), CompositionError> {
        self.models.register(Model::atomic(id, model))
    }

    /// Register a coupled child
    pub fn add_coupled(&mut self, model: CoupledModel<T>) -> Result<(), CompositionError> {
        self.models.register(Model::coupled(model))
    }

    /// Couple parent input `Src` to input `Dst` of child `to_model`
    pub fn add_eic<Src: Port, Dst: Port<Message = Src::Message>>(&mut self, to_model: impl Into<ModelId>) {
        self.add_eic_link(ExternalInputCoupling::new(
            PortId::of::<Src>(),
            to_model,
            PortId::of::<Dst>(),
        ));
    }

    /// Couple output `Src` of child `from_model` to parent output `Dst`
    pub fn add_eoc<Src: Port, Dst: Port<Message = Src::Message>>(&mut self, from_model: impl Into<ModelId>) {
        self.add_eoc_link(ExternalOutputCoupling::new(
            from_model,
            PortId::of::<Src>(),
            PortId::of::<Dst>(),
        ));
    }

    /// Couple output `Src` of child `from_model` to input `Dst` of child `to_model`
    pub fn add_ic<Src: Port, Dst: Port<Message = Src::Message>>(
        &mut self,
        from_model: impl Into<ModelId>,
        to_model: impl Into<ModelId>,
    ) {
        self.add_ic_link(InternalCoupling::new(
            from_model,
            PortId::of::<Src>(),
            to_model,
            PortId::of::<Dst>(),
        ));
    }

    pub fn add_eic_link(&mut self, link: ExternalInputCoupling) {
        debug!("{}: EIC {}", self.id, link);
        self.eic.push(link);
    }

    pub fn add_eoc_link(&mut self, link: ExternalOutputCoupling) {
        debug!("{}: EOC {}", self.id, link);
        self.eoc.push(link);
    }

    pub fn add_ic_link(&mut self, link: InternalCoupling) {
        debug!("{}: IC {}", self.id, link);
        self.ic.push(link);
    }

    /// Drop every internal coupling added after the first `len`
    pub(crate) fn truncate_ic(&mut self, len: usize) {
        self.ic.truncate(len);
    }

    /// Run the coupling validator on the current composition
    pub fn validate(&self) -> Result<(), CompositionError> {
        CouplingValidator::check(
            &self.models,
            &self.input_ports,
            &self.output_ports,
            &self.eic,
            &self.eoc,
            &self.ic,
        )
    }

    pub fn is_valid(&self) -> bool {
        CouplingValidator::validate(
            &self.models,
            &self.input_ports,
            &self.output_ports,
            &self.eic,
            &self.eoc,
            &self.ic,
        )
    }

    pub fn input_ports(&self) -> &[PortId] {
        &self.input_ports
    }

    pub fn output_ports(&self) -> &[PortId] {
        &self.output_ports
    }

    pub fn models(&self) -> &ModelRegistry<T> {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut ModelRegistry<T> {
        &mut self.models
    }

    pub fn eic(&self) -> &[ExternalInputCoupling] {
        &self.eic
    }

    pub fn eoc(&self) -> &[ExternalOutputCoupling] {
        &self.eoc
    }

    pub fn ic(&self) -> &[InternalCoupling] {
        &self.ic
    }

    /// Route parent inbound bags to the children along the EIC links.
    ///
    /// Only children reached by at least one link get an entry; each entry
    /// holds every declared input port of that child.
    pub fn route_inputs(&self, inbound: &ErasedBags) -> Result<BTreeMap<ModelId, ErasedBags>, ModelError> {
        let mut routed = BTreeMap::new();

        for link in &self.eic {
            let bag = inbound.expect(&link.from_port);
            let target = self.inbound_entry(&mut routed, &link.to_model)?;
            target.merge(link.to_port, bag);
        }

        Ok(routed)
    }

    /// Route child outputs along the IC and EOC links.
    ///
    /// Sources missing from `outputs` and empty source bags are skipped.
    pub fn route_outputs(&self, outputs: &BTreeMap<ModelId, ErasedBags>) -> Result<RoutedMessages, ModelError> {
        let mut routed = RoutedMessages {
            internal: BTreeMap::new(),
            external: ErasedBags::with_ports(&self.output_ports),
        };

        for link in &self.ic {
            let bag = match outputs.get(&link.from_model).and_then(|bags| bags.get(&link.from_port)) {
                Some(bag) if !bag.is_empty() => bag,
                _ => continue,
            };
            let target = self.inbound_entry(&mut routed.internal, &link.to_model)?;
            target.merge(link.to_port, bag);
        }

        for link in &self.eoc {
            let bag = match outputs.get(&link.from_model).and_then(|bags| bags.get(&link.from_port)) {
                Some(bag) if !bag.is_empty() => bag,
                _ => continue,
            };
            routed.external.merge(link.to_port, bag);
        }

        Ok(routed)
    }

    fn inbound_entry<'a>(
        &self,
        routed: &'a mut BTreeMap<ModelId, ErasedBags>,
        id: &ModelId,
    ) -> Result<&'a mut ErasedBags, ModelError> {
        if !routed.contains_key(id) {
            let child = self
                .models
                .get(id)
                .ok_or_else(|| ModelError::UnknownModel(id.clone()))?;
            routed.insert(id.clone(), child.empty_inputs());
        }

        routed
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownModel(id.clone()))
    }
}

impl<T: SimTime> std::fmt::Debug for CoupledModel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoupledModel")
            .field("id", &self.id)
            .field("models", &self.models.len())
            .field("eic", &self.eic.len())
            .field("eoc", &self.eoc.len())
            .field("ic", &self.ic.len())
            .finish()
    }
}
