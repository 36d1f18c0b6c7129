use super::erased::ErasedBag;
use std::any::TypeId;
use std::hash::{Hash, Hasher};

/// A port declaration.
///
/// Ports are zero-sized marker types; the type itself is the identity of the
/// port and `Message` is the value type it carries.
///
/// ```
/// use cellsim::core::values::Port;
///
/// struct Temperature;
/// impl Port for Temperature {
///     type Message = f64;
/// }
/// ```
pub trait Port: 'static {
    type Message: Clone + Send + Sync + 'static;
}

/// Opaque identity of a declared port, used as routing key.
///
/// Equality and hashing only look at the port type. The name and the empty
/// bag constructor travel along so routers can report and build bags without
/// knowing the payload type.
#[derive(Debug, Clone, Copy)]
pub struct PortId {
    type_id: TypeId,
    name: &'static str,
    message_type: &'static str,
    empty_bag: fn() -> ErasedBag,
}

impl PortId {
    /// Identity of port `P`
    pub fn of<P: Port>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            name: std::any::type_name::<P>(),
            message_type: std::any::type_name::<P::Message>(),
            empty_bag: ErasedBag::empty::<P::Message>,
        }
    }

    /// Full type name of the port
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name of the messages carried by the port
    pub fn message_type(&self) -> &'static str {
        self.message_type
    }

    /// Create an empty erased bag of the port's message type
    pub fn empty_bag(&self) -> ErasedBag {
        (self.empty_bag)()
    }
}

impl PartialEq for PortId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for PortId {}

impl Hash for PortId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl PartialOrd for PortId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PortId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| self.type_id.cmp(&other.type_id))
    }
}

impl std::fmt::Display for PortId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
