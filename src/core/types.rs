use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Add, Sub};

/// Identifier of a model inside its parent coupled model
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId {
    pub(crate) id: String,
}

impl ModelId {
    /// Create a new model ID
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Get the raw ID string
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl From<&str> for ModelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ModelId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Representation of simulated time.
///
/// Every time type carries an "infinite" sentinel, used as the time advance
/// of passive models and as the next timeout of an empty delay buffer.
/// `total_order` and `key_bits` must agree: two times compare `Equal` iff
/// their key bits are equal.
pub trait SimTime:
    Copy + PartialOrd + Debug + Send + Sync + Add<Output = Self> + Sub<Output = Self> + 'static
{
    /// Start of the simulation
    fn zero() -> Self;

    /// Sentinel for "never"
    fn infinity() -> Self;

    /// Total order used to key scheduled times
    fn total_order(&self, other: &Self) -> Ordering;

    /// Hash key consistent with `total_order`
    fn key_bits(&self) -> u64;

    /// Check whether this time is the infinite sentinel
    fn is_infinite(&self) -> bool {
        self.total_order(&Self::infinity()) == Ordering::Equal
    }
}

impl SimTime for f64 {
    fn zero() -> Self {
        0.0
    }

    fn infinity() -> Self {
        f64::INFINITY
    }

    fn total_order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn key_bits(&self) -> u64 {
        self.to_bits()
    }
}

impl SimTime for f32 {
    fn zero() -> Self {
        0.0
    }

    fn infinity() -> Self {
        f32::INFINITY
    }

    fn total_order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn key_bits(&self) -> u64 {
        u64::from(self.to_bits())
    }
}

macro_rules! impl_integer_time {
    ($($ty:ty),*) => {
        $(
            impl SimTime for $ty {
                fn zero() -> Self {
                    0
                }

                fn infinity() -> Self {
                    <$ty>::MAX
                }

                fn total_order(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }

                fn key_bits(&self) -> u64 {
                    *self as u64
                }
            }
        )*
    };
}

impl_integer_time!(u64, i64, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_infinity() {
        assert!(f64::infinity().is_infinite());
        assert!(!f64::zero().is_infinite());
        assert!(f32::infinity().is_infinite());
    }

    #[test]
    fn test_integer_infinity() {
        assert_eq!(u64::infinity(), u64::MAX);
        assert!(i64::infinity().is_infinite());
        assert!(!5u32.is_infinite());
    }

    #[test]
    fn test_key_bits_agree_with_order() {
        let a = 2.5f64;
        let b = 2.5f64;
        assert_eq!(a.total_order(&b), Ordering::Equal);
        assert_eq!(a.key_bits(), b.key_bits());
        assert_eq!(1.0f64.total_order(&2.0), Ordering::Less);
    }

    #[test]
    fn test_model_id_display() {
        let id = ModelId::from("cell_0_1");
        assert_eq!(id.to_string(), "cell_0_1");
        assert_eq!(id.id(), "cell_0_1");
    }
}
