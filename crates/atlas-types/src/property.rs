//! Generic property access over catalog objects.
//!
//! Each concrete kind exposes a static accessor table
//! ([`PropertyAccess::properties`]) mapping property names to getter and
//! setter functions, built once per type. The tables replace any need for
//! reflection: sorting by (possibly dotted) property path, change-tracking
//! diffs, and generic setter invocation all resolve through them.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::ObjectId;
use crate::object::ObjectTypeGroup;
use crate::reference::Ref;

/// A dynamically-typed property value.
///
/// The closed set of value shapes a catalog object property can take.
/// Values are totally ordered so they can serve as sort keys: `Null`
/// sorts before any non-null value, and values of different shapes order
/// by shape rank (sorting only ever compares values of one property, so
/// cross-shape comparisons are a tie-break, not a semantic statement).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Id(ObjectId),
    Ref(Ref),
    RefList(Vec<Ref>),
}

impl PropertyValue {
    /// Returns `true` for [`PropertyValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Wrap an optional string, mapping `None` to `Null`.
    pub fn opt_text(value: Option<&str>) -> Self {
        match value {
            Some(s) => Self::Text(s.to_string()),
            None => Self::Null,
        }
    }

    /// Wrap an optional reference, mapping `None` to `Null`.
    pub fn opt_ref(value: Option<&Ref>) -> Self {
        match value {
            Some(r) => Self::Ref(r.clone()),
            None => Self::Null,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Text(_) => 3,
            Self::Id(_) => 4,
            Self::Ref(_) => 5,
            Self::RefList(_) => 6,
        }
    }

    /// Extract a text value, or fail with a mismatch naming `property`.
    pub fn into_text(self, property: &str) -> Result<String, TypeError> {
        match self {
            Self::Text(s) => Ok(s),
            _ => Err(TypeError::TypeMismatch {
                property: property.to_string(),
                expected: "text",
            }),
        }
    }

    /// Extract an optional text value (`Null` maps to `None`).
    pub fn into_opt_text(self, property: &str) -> Result<Option<String>, TypeError> {
        match self {
            Self::Null => Ok(None),
            Self::Text(s) => Ok(Some(s)),
            _ => Err(TypeError::TypeMismatch {
                property: property.to_string(),
                expected: "text or null",
            }),
        }
    }

    /// Extract a boolean value.
    pub fn into_bool(self, property: &str) -> Result<bool, TypeError> {
        match self {
            Self::Bool(b) => Ok(b),
            _ => Err(TypeError::TypeMismatch {
                property: property.to_string(),
                expected: "bool",
            }),
        }
    }

    /// Extract a reference value.
    pub fn into_ref(self, property: &str) -> Result<Ref, TypeError> {
        match self {
            Self::Ref(r) => Ok(r),
            _ => Err(TypeError::TypeMismatch {
                property: property.to_string(),
                expected: "reference",
            }),
        }
    }

    /// Extract an optional reference value (`Null` maps to `None`).
    pub fn into_opt_ref(self, property: &str) -> Result<Option<Ref>, TypeError> {
        match self {
            Self::Null => Ok(None),
            Self::Ref(r) => Ok(Some(r)),
            _ => Err(TypeError::TypeMismatch {
                property: property.to_string(),
                expected: "reference or null",
            }),
        }
    }

    /// Extract a reference-list value.
    pub fn into_ref_list(self, property: &str) -> Result<Vec<Ref>, TypeError> {
        match self {
            Self::RefList(refs) => Ok(refs),
            _ => Err(TypeError::TypeMismatch {
                property: property.to_string(),
                expected: "reference list",
            }),
        }
    }
}

impl Ord for PropertyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Id(a), Self::Id(b)) => a.cmp(b),
            (Self::Ref(a), Self::Ref(b)) => a.cmp(b),
            (Self::RefList(a), Self::RefList(b)) => a.cmp(b),
            // Null first, then by shape rank.
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for PropertyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Id(id) => write!(f, "{id}"),
            Self::Ref(r) => write!(f, "{r}"),
            Self::RefList(refs) => write!(f, "[{} refs]", refs.len()),
        }
    }
}

/// Static shape of a property: what values it holds and whether it can
/// serve as a sort key or be walked through as a reference hop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    Bool,
    Int,
    Text,
    OptionalText,
    Id,
    Reference(ObjectTypeGroup),
    OptionalReference(ObjectTypeGroup),
    ReferenceList,
}

impl PropertyKind {
    /// Whether a property of this kind may terminate a sort path.
    pub fn is_sortable(&self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int | Self::Text | Self::OptionalText | Self::Id
        )
    }

    /// The referenced family, for kinds that can be walked through in a
    /// dotted property path.
    pub fn reference_target(&self) -> Option<ObjectTypeGroup> {
        match self {
            Self::Reference(t) | Self::OptionalReference(t) => Some(*t),
            _ => None,
        }
    }
}

/// One entry of a per-type accessor table.
pub struct PropertySpec<T> {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub get: fn(&T) -> PropertyValue,
    pub set: fn(&mut T, PropertyValue) -> Result<(), TypeError>,
}

/// Generic property get/set over a catalog object kind.
///
/// Implementations provide a static accessor table; the lookup helpers are
/// shared. Unknown property names fail with
/// [`TypeError::UnknownProperty`].
pub trait PropertyAccess: Sized + 'static {
    /// Human-readable type name, used in error messages.
    const TYPE_NAME: &'static str;

    /// The accessor table, built once per type.
    fn properties() -> &'static [PropertySpec<Self>];

    /// Look up a table entry by property name.
    fn property(name: &str) -> Option<&'static PropertySpec<Self>> {
        Self::properties().iter().find(|spec| spec.name == name)
    }

    /// Read a property by name.
    fn get_property(&self, name: &str) -> Result<PropertyValue, TypeError> {
        match Self::property(name) {
            Some(spec) => Ok((spec.get)(self)),
            None => Err(TypeError::UnknownProperty {
                ty: Self::TYPE_NAME,
                property: name.to_string(),
            }),
        }
    }

    /// Write a property by name.
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), TypeError> {
        match Self::property(name) {
            Some(spec) => (spec.set)(self, value),
            None => Err(TypeError::UnknownProperty {
                ty: Self::TYPE_NAME,
                property: name.to_string(),
            }),
        }
    }
}

/// Kind of the named property on the given object family, if it exists.
///
/// This is the schema-level view used to validate sort paths without an
/// object in hand.
pub fn property_kind_of(group: ObjectTypeGroup, property: &str) -> Option<PropertyKind> {
    use crate::model::{Layer, LayerGroup, Map, Namespace, Resource, Store, Style, Workspace};
    match group {
        ObjectTypeGroup::Workspace => Workspace::property(property).map(|s| s.kind),
        ObjectTypeGroup::Namespace => Namespace::property(property).map(|s| s.kind),
        ObjectTypeGroup::Store => Store::property(property).map(|s| s.kind),
        ObjectTypeGroup::Resource => Resource::property(property).map(|s| s.kind),
        ObjectTypeGroup::Layer => Layer::property(property).map(|s| s.kind),
        ObjectTypeGroup::LayerGroup => LayerGroup::property(property).map(|s| s.kind),
        ObjectTypeGroup::Style => Style::property(property).map(|s| s.kind),
        ObjectTypeGroup::Map => Map::property(property).map(|s| s.kind),
    }
}

/// A single recorded property mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyChange {
    pub property: String,
    pub old: PropertyValue,
    pub new: PropertyValue,
}

/// Ordered list of property mutations, as extracted from a
/// change-tracking wrapper on save and carried by Modify events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDiff {
    changes: Vec<PropertyChange>,
}

impl PropertyDiff {
    /// An empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a change, preserving record order.
    pub fn push(&mut self, change: PropertyChange) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Iterate changes in record order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyChange> {
        self.changes.iter()
    }

    /// The changed property names, in record order.
    pub fn property_names(&self) -> Vec<&str> {
        self.changes.iter().map(|c| c.property.as_str()).collect()
    }
}

impl FromIterator<PropertyChange> for PropertyDiff {
    fn from_iter<I: IntoIterator<Item = PropertyChange>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sorts_before_any_value() {
        assert!(PropertyValue::Null < PropertyValue::Bool(false));
        assert!(PropertyValue::Null < PropertyValue::Text(String::new()));
        assert!(PropertyValue::Null < PropertyValue::Int(i64::MIN));
    }

    #[test]
    fn same_shape_values_order_naturally() {
        assert!(PropertyValue::Text("a".into()) < PropertyValue::Text("b".into()));
        assert!(PropertyValue::Int(1) < PropertyValue::Int(2));
    }

    #[test]
    fn extraction_mismatch_names_the_property() {
        let err = PropertyValue::Int(3).into_text("name").unwrap_err();
        assert_eq!(
            err,
            TypeError::TypeMismatch {
                property: "name".into(),
                expected: "text",
            }
        );
    }

    #[test]
    fn opt_text_roundtrip() {
        assert_eq!(PropertyValue::opt_text(None), PropertyValue::Null);
        assert_eq!(
            PropertyValue::opt_text(Some("t")).into_opt_text("title").unwrap(),
            Some("t".to_string())
        );
        assert_eq!(PropertyValue::Null.into_opt_text("title").unwrap(), None);
    }

    #[test]
    fn diff_preserves_record_order() {
        let mut diff = PropertyDiff::new();
        diff.push(PropertyChange {
            property: "name".into(),
            old: PropertyValue::Text("a".into()),
            new: PropertyValue::Text("b".into()),
        });
        diff.push(PropertyChange {
            property: "enabled".into(),
            old: PropertyValue::Bool(true),
            new: PropertyValue::Bool(false),
        });
        assert_eq!(diff.property_names(), vec!["name", "enabled"]);
        assert_eq!(diff.len(), 2);
    }

    #[test]
    fn diff_serde_roundtrip() {
        let diff: PropertyDiff = vec![PropertyChange {
            property: "title".into(),
            old: PropertyValue::Null,
            new: PropertyValue::Text("Roads".into()),
        }]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&diff).unwrap();
        let back: PropertyDiff = serde_json::from_str(&json).unwrap();
        assert_eq!(diff, back);
    }
}
