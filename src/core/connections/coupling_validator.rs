use super::links::{ExternalInputCoupling, ExternalOutputCoupling, InternalCoupling};
use crate::core::errors::CompositionError;
use crate::core::models::ModelRegistry;
use crate::core::types::SimTime;
use crate::core::values::PortId;
use log::warn;

/// Structural checks run once on a coupled model before simulation.
///
/// Only the parent side of each link and the existence of the children are
/// checked; a child's own ports are its own construction's business.
pub struct CouplingValidator;

impl CouplingValidator {
    /// Check whether `port` is among `ports`
    pub fn is_in(port: &PortId, ports: &[PortId]) -> bool {
        ports.iter().any(|candidate| candidate == port)
    }

    /// Destination child exists and the parent port is a declared input
    pub fn valid_eic_link<T: SimTime>(
        models: &ModelRegistry<T>,
        input_ports: &[PortId],
        link: &ExternalInputCoupling,
    ) -> bool {
        models.contains(&link.to_model) && Self::is_in(&link.from_port, input_ports)
    }

    /// Source child exists and the parent port is a declared output
    pub fn valid_eoc_link<T: SimTime>(
        models: &ModelRegistry<T>,
        output_ports: &[PortId],
        link: &ExternalOutputCoupling,
    ) -> bool {
        models.contains(&link.from_model) && Self::is_in(&link.to_port, output_ports)
    }

    /// Both children exist
    pub fn valid_ic_link<T: SimTime>(models: &ModelRegistry<T>, link: &InternalCoupling) -> bool {
        models.contains(&link.from_model) && models.contains(&link.to_model)
    }

    pub fn valid_eic_links<T: SimTime>(
        models: &ModelRegistry<T>,
        input_ports: &[PortId],
        eic: &[ExternalInputCoupling],
    ) -> bool {
        eic.iter().all(|link| Self::valid_eic_link(models, input_ports, link))
    }

    pub fn valid_eoc_links<T: SimTime>(
        models: &ModelRegistry<T>,
        output_ports: &[PortId],
        eoc: &[ExternalOutputCoupling],
    ) -> bool {
        eoc.iter().all(|link| Self::valid_eoc_link(models, output_ports, link))
    }

    pub fn valid_ic_links<T: SimTime>(models: &ModelRegistry<T>, ic: &[InternalCoupling]) -> bool {
        ic.iter().all(|link| Self::valid_ic_link(models, link))
    }

    /// Whether every link of every list is valid
    pub fn validate<T: SimTime>(
        models: &ModelRegistry<T>,
        input_ports: &[PortId],
        output_ports: &[PortId],
        eic: &[ExternalInputCoupling],
        eoc: &[ExternalOutputCoupling],
        ic: &[InternalCoupling],
    ) -> bool {
        Self::valid_eic_links(models, input_ports, eic)
            && Self::valid_eoc_links(models, output_ports, eoc)
            && Self::valid_ic_links(models, ic)
    }

    /// Same as [`CouplingValidator::validate`], reporting the first invalid link.
    ///
    /// Every invalid link is logged, not only the reported one.
    pub fn check<T: SimTime>(
        models: &ModelRegistry<T>,
        input_ports: &[PortId],
        output_ports: &[PortId],
        eic: &[ExternalInputCoupling],
        eoc: &[ExternalOutputCoupling],
        ic: &[InternalCoupling],
    ) -> Result<(), CompositionError> {
        let mut first = None;
        let mut invalid = 0;

        for link in eic.iter().filter(|link| !Self::valid_eic_link(models, input_ports, link)) {
            Self::report("EIC", link.to_string(), &mut first, &mut invalid);
        }
        for link in eoc.iter().filter(|link| !Self::valid_eoc_link(models, output_ports, link)) {
            Self::report("EOC", link.to_string(), &mut first, &mut invalid);
        }
        for link in ic.iter().filter(|link| !Self::valid_ic_link(models, link)) {
            Self::report("IC", link.to_string(), &mut first, &mut invalid);
        }

        match first {
            Some(err) => {
                if invalid > 1 {
                    warn!("{} invalid links in total", invalid);
                }
                Err(err)
            }
            None => Ok(()),
        }
    }

    fn report(kind: &'static str, link: String, first: &mut Option<CompositionError>, invalid: &mut usize) {
        warn!("Invalid {} link {}", kind, link);
        *invalid += 1;
        if first.is_none() {
            *first = Some(CompositionError::InvalidLink { kind, link });
        }
    }
}
