//! Records: field values keyed by tag, with explicit presence

use alloc::collections::btree_map::{self, BTreeMap};

use crate::error::Result;
use crate::schema::StructSchema;
use crate::value::Value;

/// A dynamically typed struct instance
///
/// A tag present in the record is "set"; an absent tag is "unset". A boolean
/// field holding `false` is therefore distinct from an unset boolean field.
/// Equality and hashing cover exactly the set fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    fields: BTreeMap<i16, Value>,
}

impl Record {
    /// Create an empty record with every field unset
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the previous value if it was set
    #[inline]
    pub fn set(&mut self, tag: i16, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(tag, value.into())
    }

    /// Builder-style [`set`](Self::set)
    #[inline]
    pub fn with(mut self, tag: i16, value: impl Into<Value>) -> Self {
        self.set(tag, value);
        self
    }

    /// Value of a set field
    #[inline]
    pub fn get(&self, tag: i16) -> Option<&Value> {
        self.fields.get(&tag)
    }

    /// Mutable access to a set field
    #[inline]
    pub fn get_mut(&mut self, tag: i16) -> Option<&mut Value> {
        self.fields.get_mut(&tag)
    }

    /// Unset a field, returning its value if it was set
    #[inline]
    pub fn unset(&mut self, tag: i16) -> Option<Value> {
        self.fields.remove(&tag)
    }

    /// Whether a field is set
    #[inline]
    pub fn is_set(&self, tag: i16) -> bool {
        self.fields.contains_key(&tag)
    }

    /// Set fields in ascending tag order
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.fields.iter(),
        }
    }

    /// Tags of the set fields, ascending
    #[inline]
    pub fn tags(&self) -> impl Iterator<Item = i16> + '_ {
        self.fields.keys().copied()
    }

    /// Number of set fields
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field is set
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Unset every field
    #[inline]
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Set a field by its schema name
    pub fn set_by_name(
        &mut self,
        schema: &StructSchema,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let tag = schema.require_field(name)?.tag();
        Ok(self.set(tag, value))
    }

    /// Look up a field by its schema name
    ///
    /// Fails only when the schema has no such field; an unset field is `Ok(None)`.
    pub fn get_by_name(&self, schema: &StructSchema, name: &str) -> Result<Option<&Value>> {
        let tag = schema.require_field(name)?.tag();
        Ok(self.get(tag))
    }

    /// Unset a field by its schema name
    pub fn unset_by_name(&mut self, schema: &StructSchema, name: &str) -> Result<Option<Value>> {
        let tag = schema.require_field(name)?.tag();
        Ok(self.unset(tag))
    }
}

/// Iterator over the set fields of a [`Record`]
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, i16, Value>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (i16, &'a Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(tag, value)| (*tag, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Record {
    type Item = (i16, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: Into<Value>> FromIterator<(i16, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (i16, V)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(tag, v)| (tag, v.into())).collect(),
        }
    }
}
