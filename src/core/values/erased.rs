use super::message_bag::MessageBag;
use super::port::{Port, PortId};
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Recover the typed bag behind an erased payload.
///
/// This is the only place where a payload type is assumed. A mismatch means
/// the coupling graph disagrees with a model's declared ports, so it aborts.
fn cast_ref<'a, T: 'static>(data: &'a dyn Any, found: &'static str) -> &'a MessageBag<T> {
    match data.downcast_ref::<MessageBag<T>>() {
        Some(bag) => bag,
        None => mismatch::<T>(found),
    }
}

fn cast_mut<'a, T: 'static>(data: &'a mut dyn Any, found: &'static str) -> &'a mut MessageBag<T> {
    match data.downcast_mut::<MessageBag<T>>() {
        Some(bag) => bag,
        None => mismatch::<T>(found),
    }
}

fn mismatch<T: 'static>(found: &'static str) -> ! {
    panic!(
        "Erased message bag type mismatch: expected {}, found {}",
        std::any::type_name::<MessageBag<T>>(),
        found
    )
}

/// Type-erased message bag of one port
pub struct ErasedBag {
    data: Box<dyn Any + Send + Sync>,
    clone_fn: fn(&dyn Any, &'static str) -> Box<dyn Any + Send + Sync>,
    extend_fn: fn(&mut dyn Any, &dyn Any, &'static str),
    len_fn: fn(&dyn Any, &'static str) -> usize,
    type_name: &'static str,
    type_id: TypeId,
}

impl ErasedBag {
    /// Erase a typed bag
    pub fn new<T: Clone + Send + Sync + 'static>(bag: MessageBag<T>) -> Self {
        Self {
            type_id: TypeId::of::<MessageBag<T>>(),
            type_name: std::any::type_name::<MessageBag<T>>(),
            data: Box::new(bag),
            clone_fn: |any, found| Box::new(cast_ref::<T>(any, found).clone()),
            extend_fn: |dst, src, found| {
                let src = cast_ref::<T>(src, found);
                cast_mut::<T>(dst, found).extend_from(src);
            },
            len_fn: |any, found| cast_ref::<T>(any, found).len(),
        }
    }

    /// Erased empty bag of messages of type `T`
    pub fn empty<T: Clone + Send + Sync + 'static>() -> Self {
        Self::new(MessageBag::<T>::new())
    }

    /// Borrow the typed bag.
    ///
    /// # Panics
    ///
    /// Panics if the bag does not carry messages of type `T`.
    pub fn downcast_ref<T: 'static>(&self) -> &MessageBag<T> {
        cast_ref::<T>(self.data.as_ref(), self.type_name)
    }

    /// Take the typed bag out.
    ///
    /// # Panics
    ///
    /// Panics if the bag does not carry messages of type `T`.
    pub fn into_bag<T: 'static>(self) -> MessageBag<T> {
        let found = self.type_name;
        match self.data.downcast::<MessageBag<T>>() {
            Ok(bag) => *bag,
            Err(_) => mismatch::<T>(found),
        }
    }

    /// Append `other`'s messages after this bag's messages.
    ///
    /// # Panics
    ///
    /// Panics if the two bags carry different message types.
    pub fn extend_from(&mut self, other: &ErasedBag) {
        if self.type_id != other.type_id {
            panic!(
                "Erased message bag type mismatch: cannot merge {} into {}",
                other.type_name, self.type_name
            );
        }
        (self.extend_fn)(self.data.as_mut(), other.data.as_ref(), other.type_name);
    }

    /// Check whether this bag carries messages of type `T`
    pub fn is_bag_of<T: 'static>(&self) -> bool {
        TypeId::of::<MessageBag<T>>() == self.type_id
    }

    pub fn len(&self) -> usize {
        (self.len_fn)(self.data.as_ref(), self.type_name)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type name of the erased bag
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl std::fmt::Debug for ErasedBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErasedBag")
            .field("type_name", &self.type_name)
            .field("len", &self.len())
            .finish()
    }
}

impl Clone for ErasedBag {
    fn clone(&self) -> Self {
        Self {
            data: (self.clone_fn)(self.data.as_ref(), self.type_name),
            clone_fn: self.clone_fn,
            extend_fn: self.extend_fn,
            len_fn: self.len_fn,
            type_name: self.type_name,
            type_id: self.type_id,
        }
    }
}

/// Message bags of a model keyed by port identity.
///
/// A port with no messages is present with an empty bag; a missing key is
/// never a valid "no messages" signal.
#[derive(Debug, Clone, Default)]
pub struct ErasedBags {
    bags: HashMap<PortId, ErasedBag>,
}

impl ErasedBags {
    pub fn new() -> Self {
        Self { bags: HashMap::new() }
    }

    /// Empty bags for every given port
    pub fn with_ports(ports: &[PortId]) -> Self {
        Self {
            bags: ports.iter().map(|port| (*port, port.empty_bag())).collect(),
        }
    }

    /// Insert a bag, returning the previous one for that port
    pub fn insert(&mut self, port: PortId, bag: ErasedBag) -> Option<ErasedBag> {
        self.bags.insert(port, bag)
    }

    pub fn get(&self, port: &PortId) -> Option<&ErasedBag> {
        self.bags.get(port)
    }

    pub fn contains(&self, port: &PortId) -> bool {
        self.bags.contains_key(port)
    }

    /// Bag of a declared port.
    ///
    /// # Panics
    ///
    /// Panics if the port is missing.
    pub fn expect(&self, port: &PortId) -> &ErasedBag {
        match self.bags.get(port) {
            Some(bag) => bag,
            None => panic!("Declared port '{}' missing from erased message bags", port),
        }
    }

    /// Typed bag of port `P`.
    ///
    /// # Panics
    ///
    /// Panics if `P` is missing or its payload is not `MessageBag<P::Message>`.
    pub fn bag<P: Port>(&self) -> &MessageBag<P::Message> {
        self.expect(&PortId::of::<P>()).downcast_ref::<P::Message>()
    }

    /// Messages of port `P` (see [`ErasedBags::bag`])
    pub fn messages<P: Port>(&self) -> &[P::Message] {
        self.bag::<P>().messages()
    }

    /// Append a message on port `P`, creating its bag when needed
    pub fn push<P: Port>(&mut self, message: P::Message) {
        let port = PortId::of::<P>();
        let entry = self.bags.entry(port).or_insert_with(|| port.empty_bag());
        let mut single = MessageBag::new();
        single.push(message);
        entry.extend_from(&ErasedBag::new(single));
    }

    /// Append `bag` to the bag of `port`.
    ///
    /// Merging is additive: messages already present stay first.
    ///
    /// # Panics
    ///
    /// Panics if `bag` does not carry the port's message type.
    pub fn merge(&mut self, port: PortId, bag: &ErasedBag) {
        self.bags
            .entry(port)
            .or_insert_with(|| port.empty_bag())
            .extend_from(bag);
    }

    /// Ports present in the map
    pub fn ports(&self) -> impl Iterator<Item = &PortId> {
        self.bags.keys()
    }

    /// Number of ports present
    pub fn len(&self) -> usize {
        self.bags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bags.is_empty()
    }

    /// Number of messages over all ports
    pub fn message_count(&self) -> usize {
        self.bags.values().map(|bag| bag.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Numbers;
    impl Port for Numbers {
        type Message = i64;
    }

    struct Words;
    impl Port for Words {
        type Message = String;
    }

    #[test]
    fn test_erased_bag_basic() {
        let bag = ErasedBag::new(MessageBag::from(vec![1i64, 2, 3]));
        assert!(bag.is_bag_of::<i64>());
        assert!(!bag.is_bag_of::<String>());
        assert_eq!(bag.len(), 3);
        assert_eq!(bag.downcast_ref::<i64>().messages(), &[1, 2, 3]);
    }

    #[test]
    fn test_erased_bag_clone_is_deep() {
        let mut bag = ErasedBag::new(MessageBag::from(vec![1i64]));
        let copy = bag.clone();
        bag.extend_from(&ErasedBag::new(MessageBag::from(vec![2i64])));
        assert_eq!(copy.len(), 1);
        assert_eq!(bag.into_bag::<i64>().messages, vec![1, 2]);
    }

    #[test]
    #[should_panic(expected = "type mismatch")]
    fn test_downcast_mismatch_panics() {
        let bag = ErasedBag::new(MessageBag::from(vec![1i64]));
        bag.downcast_ref::<String>();
    }

    #[test]
    #[should_panic(expected = "cannot merge")]
    fn test_merge_mismatch_panics() {
        let mut bags = ErasedBags::with_ports(&[PortId::of::<Numbers>()]);
        bags.merge(PortId::of::<Numbers>(), &ErasedBag::new(MessageBag::from(vec!["x".to_string()])));
    }

    #[test]
    #[should_panic(expected = "missing from erased message bags")]
    fn test_missing_port_panics() {
        let bags = ErasedBags::with_ports(&[PortId::of::<Numbers>()]);
        bags.messages::<Words>();
    }

    #[test]
    fn test_with_ports_covers_every_port() {
        let bags = ErasedBags::with_ports(&[PortId::of::<Numbers>(), PortId::of::<Words>()]);
        assert_eq!(bags.len(), 2);
        assert_eq!(bags.message_count(), 0);
        assert!(bags.messages::<Words>().is_empty());
    }

    #[test]
    fn test_merge_is_additive() {
        let mut bags = ErasedBags::new();
        bags.push::<Numbers>(1);
        bags.merge(PortId::of::<Numbers>(), &ErasedBag::new(MessageBag::from(vec![2i64, 3])));
        bags.merge(PortId::of::<Numbers>(), &ErasedBag::new(MessageBag::from(vec![4i64])));
        assert_eq!(bags.messages::<Numbers>(), &[1, 2, 3, 4]);
    }
}
