//! Typed Identifiers
//!
//! The marketplace backend identifies every resource with a bare integer. A
//! [`TypedId`] keeps those integers apart at compile time so a cart line id can
//! never be passed where a product id is expected.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Integer identifier tagged with the resource it names.
pub struct TypedId<T>(i64, PhantomData<T>);

impl<T> TypedId<T> {
    /// Wrap a raw backend identifier.
    pub const fn new(id: i64) -> Self {
        Self(id, PhantomData)
    }

    /// Return the raw backend identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Marker for product identifiers.
#[derive(Debug)]
pub enum ProductMarker {}

/// Marker for shop identifiers.
#[derive(Debug)]
pub enum ShopMarker {}

/// Marker for cart line identifiers.
#[derive(Debug)]
pub enum CartItemMarker {}

/// Marker for order identifiers.
#[derive(Debug)]
pub enum OrderMarker {}

/// Product ID
pub type ProductId = TypedId<ProductMarker>;

/// Shop ID
pub type ShopId = TypedId<ShopMarker>;

/// Cart Line ID
pub type CartItemId = TypedId<CartItemMarker>;

/// Order ID
pub type OrderId = TypedId<OrderMarker>;

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedId<T> {}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> From<i64> for TypedId<T> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for TypedId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de, T> Deserialize<'de> for TypedId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(ProductId::new(7), ProductId::from(7));
        assert!(ShopId::new(1) < ShopId::new(2), "ids should order numerically");
    }

    #[test]
    fn display_is_the_bare_integer() {
        assert_eq!(CartItemId::new(42).to_string(), "42");
    }

    #[test]
    fn serializes_as_a_bare_integer() -> TestResult {
        assert_eq!(serde_json::to_value(ProductId::new(15))?, json!(15));

        let id: ProductId = serde_json::from_value(json!(15))?;

        assert_eq!(id, ProductId::new(15));
        assert!(serde_json::from_value::<ProductId>(json!("15")).is_err());

        Ok(())
    }
}
