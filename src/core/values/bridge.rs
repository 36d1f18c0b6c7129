use super::erased::ErasedBags;
use super::port::PortId;

/// A model's compile-time set of ports.
///
/// Implemented for tuples of [`Port`](super::Port) types, up to eight ports.
/// `Bags` is the matching tuple of [`MessageBag`](super::MessageBag)s, so the
/// bag of the n-th port is field `n`.
pub trait PortSet: 'static {
    /// Typed message bags, one per port
    type Bags: Default + Clone + Send + Sync + 'static;

    /// Identities of every declared port, in declaration order
    fn port_ids() -> Vec<PortId>;

    /// Erase typed bags. Every declared port gets an entry, even when empty.
    fn to_erased(bags: Self::Bags) -> ErasedBags;

    /// Append the messages found in `erased` onto `bags`.
    ///
    /// # Panics
    ///
    /// Panics if a declared port is missing from `erased` or carries a
    /// different message type.
    fn fill_from_erased(erased: &ErasedBags, bags: &mut Self::Bags);

    /// Fresh typed bags holding the messages of `erased`
    fn from_erased(erased: &ErasedBags) -> Self::Bags {
        let mut bags = Self::Bags::default();
        Self::fill_from_erased(erased, &mut bags);
        bags
    }

    /// Erased map with an empty bag for every declared port
    fn empty_erased() -> ErasedBags {
        ErasedBags::with_ports(&Self::port_ids())
    }
}

impl_port_set!();
impl_port_set!(P0: 0);
impl_port_set!(P0: 0, P1: 1);
impl_port_set!(P0: 0, P1: 1, P2: 2);
impl_port_set!(P0: 0, P1: 1, P2: 2, P3: 3);
impl_port_set!(P0: 0, P1: 1, P2: 2, P3: 3, P4: 4);
impl_port_set!(P0: 0, P1: 1, P2: 2, P3: 3, P4: 4, P5: 5);
impl_port_set!(P0: 0, P1: 1, P2: 2, P3: 3, P4: 4, P5: 5, P6: 6);
impl_port_set!(P0: 0, P1: 1, P2: 2, P3: 3, P4: 4, P5: 5, P6: 6, P7: 7);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::values::{ErasedBag, MessageBag};

    port!(struct Count: u32);
    port!(struct Label: String);
    port!(struct Other: u32);

    type Ports = (Count, Label);

    #[test]
    fn test_to_erased_covers_empty_ports() {
        let mut bags = <Ports as PortSet>::Bags::default();
        bags.0.push(7);

        let erased = Ports::to_erased(bags);
        assert_eq!(erased.len(), 2);
        assert_eq!(erased.messages::<Count>(), &[7]);
        assert!(erased.contains(&PortId::of::<Label>()));
        assert!(erased.messages::<Label>().is_empty());
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let mut bags = <Ports as PortSet>::Bags::default();
        bags.0.push(3);
        bags.0.push(1);
        bags.0.push(2);
        bags.1.push("a".to_string());
        bags.1.push("b".to_string());

        let restored = Ports::from_erased(&Ports::to_erased(bags.clone()));
        assert_eq!(restored, bags);
    }

    #[test]
    fn test_fill_appends_to_existing_messages() {
        let mut erased = Ports::empty_erased();
        erased.push::<Count>(10);
        erased.push::<Count>(11);

        let mut bags = <Ports as PortSet>::Bags::default();
        bags.0.push(9);
        Ports::fill_from_erased(&erased, &mut bags);
        assert_eq!(bags.0.messages(), &[9, 10, 11]);
        assert!(bags.1.is_empty());
    }

    #[test]
    fn test_empty_port_set() {
        assert!(<() as PortSet>::port_ids().is_empty());
        assert!(<() as PortSet>::to_erased(()).is_empty());
    }

    #[test]
    #[should_panic(expected = "missing from erased message bags")]
    fn test_missing_declared_port_is_fatal() {
        let mut erased = ErasedBags::new();
        erased.insert(PortId::of::<Count>(), ErasedBag::new(MessageBag::from(vec![1u32])));
        Ports::from_erased(&erased);
    }

    #[test]
    #[should_panic(expected = "type mismatch")]
    fn test_wrong_payload_is_fatal() {
        let mut erased = ErasedBags::new();
        erased.insert(PortId::of::<Count>(), ErasedBag::new(MessageBag::from(vec!["x".to_string()])));
        <(Count,)>::from_erased(&erased);
    }

    #[test]
    fn test_ports_with_same_message_type_are_distinct() {
        type Twins = (Count, Other);
        let mut bags = <Twins as PortSet>::Bags::default();
        bags.0.push(1);
        bags.1.push(2);
        let erased = Twins::to_erased(bags);
        assert_eq!(erased.messages::<Count>(), &[1]);
        assert_eq!(erased.messages::<Other>(), &[2]);
    }

    #[test]
    #[should_panic(expected = "declared twice in one port set")]
    fn test_repeated_port_is_fatal() {
        let mut bags = <(Count, Count) as PortSet>::Bags::default();
        bags.0.push(1);
        bags.1.push(2);
        <(Count, Count)>::to_erased(bags);
    }
}
