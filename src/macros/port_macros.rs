//! Port declaration macros
//!
//! `port!` declares marker port types; `impl_port_set!` implements the
//! typed/erased bridge for tuples of ports.

/// Macro for declaring port marker types
///
/// # Example
/// ```rust
/// use cellsim::port;
///
/// port!(pub struct Temperature: f64);
/// port!(struct Alarm: String);
/// ```
#[macro_export]
macro_rules! port {
    ($(#[$meta:meta])* $vis:vis struct $name:ident : $message:ty) => {
        $(#[$meta])*
        $vis struct $name;

        impl $crate::core::values::Port for $name {
            type Message = $message;
        }
    };
}

/// Implements `PortSet` for a tuple of ports.
///
/// Each entry is `Type: index` where `index` is the tuple position.
macro_rules! impl_port_set {
    ($($port:ident : $idx:tt),*) => {
        impl<$($port: $crate::core::values::Port),*> $crate::core::values::PortSet for ($($port,)*) {
            type Bags = ($($crate::core::values::MessageBag<<$port as $crate::core::values::Port>::Message>,)*);

            fn port_ids() -> Vec<$crate::core::values::PortId> {
                vec![$($crate::core::values::PortId::of::<$port>()),*]
            }

            #[allow(unused_variables, unused_mut)]
            fn to_erased(bags: Self::Bags) -> $crate::core::values::ErasedBags {
                let mut erased = $crate::core::values::ErasedBags::new();
                $(
                    let port = $crate::core::values::PortId::of::<$port>();
                    let previous = erased.insert(port, $crate::core::values::ErasedBag::new(bags.$idx));
                    assert!(previous.is_none(), "port '{}' declared twice in one port set", port);
                )*
                erased
            }

            #[allow(unused_variables)]
            fn fill_from_erased(erased: &$crate::core::values::ErasedBags, bags: &mut Self::Bags) {
                $(
                    bags.$idx.extend_from(erased.bag::<$port>());
                )*
            }
        }
    };
}
