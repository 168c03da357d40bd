//! The property-introspection capability.
//!
//! The codec never depends on a concrete reflection mechanism. A type that
//! should encode as a JSON object without being a [`Map`] implements
//! [`Introspect`]; [`Value::from_introspect`] converts it at the boundary so
//! the encoder core only ever sees the tagged [`Value`] union.
//!
//! [`Map`]: crate::Map

use crate::value::{Map, Value};

/// Enumerates and reads the named properties of an object.
///
/// Implementations shared between codec instances on different threads must
/// be safe for concurrent read access.
pub trait Introspect {
    /// The property names of `self`, in encoding order.
    fn property_names(&self) -> Vec<String>;

    /// Reads one property as a [`Value`]. Returning `None` marks the
    /// property as not serializable; it is skipped.
    fn property_value(&self, name: &str) -> Option<Value>;
}

impl Value {
    /// Converts a foreign object into an ordered JSON object through its
    /// [`Introspect`] capability.
    ///
    /// ```
    /// use jsonflume::{Introspect, Value};
    ///
    /// struct Point {
    ///     x: i64,
    ///     y: i64,
    /// }
    ///
    /// impl Introspect for Point {
    ///     fn property_names(&self) -> Vec<String> {
    ///         vec!["x".into(), "y".into()]
    ///     }
    ///
    ///     fn property_value(&self, name: &str) -> Option<Value> {
    ///         match name {
    ///             "x" => Some(Value::from(self.x)),
    ///             "y" => Some(Value::from(self.y)),
    ///             _ => None,
    ///         }
    ///     }
    /// }
    ///
    /// let v = Value::from_introspect(&Point { x: 1, y: 2 });
    /// assert_eq!(v.to_string(), r#"{"x":1,"y":2}"#);
    /// ```
    #[must_use]
    pub fn from_introspect(object: &dyn Introspect) -> Self {
        let mut map = Map::new();
        for name in object.property_names() {
            if let Some(value) = object.property_value(&name) {
                map.insert(name, value);
            }
        }
        Self::Object(map)
    }
}
