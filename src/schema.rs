//! Struct schemas: the static description the codec is driven by
//!
//! A [`StructSchema`] is an ordered list of [`FieldDescriptor`]s. The tag of a
//! field is its identity on the wire; the name is only used for diagnostics and
//! by-name lookup. Schemas are immutable once built and are shared between
//! threads and nested field types through [`Arc`].

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use crate::error::{Error, Result};
use crate::record::Record;
use crate::value::{cmp_seq, Value};
use crate::wire::WireType;

/// Declared type of a field, list element, or map key/value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// `bool`
    Bool,
    /// `byte`, signed
    Byte,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `double`
    Double,
    /// UTF-8 text
    String,
    /// Raw bytes; written with the STRING wire code
    Binary,
    /// Nested struct
    Struct(Arc<StructSchema>),
    /// Ordered sequence
    List(Box<FieldType>),
    /// Unordered collection, kept in wire order
    Set(Box<FieldType>),
    /// Key/value entries, kept in wire order
    Map(Box<FieldType>, Box<FieldType>),
}

impl FieldType {
    /// `LIST<elem>`
    pub fn list(elem: FieldType) -> Self {
        FieldType::List(Box::new(elem))
    }

    /// `SET<elem>`
    pub fn set(elem: FieldType) -> Self {
        FieldType::Set(Box::new(elem))
    }

    /// `MAP<key, value>`
    pub fn map(key: FieldType, value: FieldType) -> Self {
        FieldType::Map(Box::new(key), Box::new(value))
    }

    /// Nested struct
    pub fn structure(schema: impl Into<Arc<StructSchema>>) -> Self {
        FieldType::Struct(schema.into())
    }

    /// Code written in headers for a value of this type
    pub const fn wire_type(&self) -> WireType {
        match self {
            FieldType::Bool => WireType::Bool,
            FieldType::Byte => WireType::Byte,
            FieldType::I16 => WireType::I16,
            FieldType::I32 => WireType::I32,
            FieldType::I64 => WireType::I64,
            FieldType::Double => WireType::Double,
            FieldType::String | FieldType::Binary => WireType::String,
            FieldType::Struct(_) => WireType::Struct,
            FieldType::List(_) => WireType::List,
            FieldType::Set(_) => WireType::Set,
            FieldType::Map(_, _) => WireType::Map,
        }
    }

    /// Check that `value` has this type, recursing into containers and nested structs
    ///
    /// `on_mismatch` builds the error reported for a type mismatch anywhere below.
    fn check<F>(&self, value: &Value, on_mismatch: &F) -> Result<()>
    where
        F: Fn() -> Error,
    {
        match (self, value) {
            (FieldType::Bool, Value::Bool(_))
            | (FieldType::Byte, Value::Byte(_))
            | (FieldType::I16, Value::I16(_))
            | (FieldType::I32, Value::I32(_))
            | (FieldType::I64, Value::I64(_))
            | (FieldType::Double, Value::Double(_))
            | (FieldType::String, Value::String(_))
            | (FieldType::Binary, Value::Binary(_)) => Ok(()),
            (FieldType::Struct(schema), Value::Struct(record)) => schema.validate(record),
            (FieldType::List(elem), Value::List(items))
            | (FieldType::Set(elem), Value::Set(items)) => {
                items.iter().try_for_each(|item| elem.check(item, on_mismatch))
            }
            (FieldType::Map(k, v), Value::Map(entries)) => {
                entries.iter().try_for_each(|(key, val)| {
                    k.check(key, on_mismatch)?;
                    v.check(val, on_mismatch)
                })
            }
            _ => Err(on_mismatch()),
        }
    }

    /// Order two values of this type
    ///
    /// Nested structs order by their own schema; containers lexicographically.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match (self, a, b) {
            (FieldType::Struct(schema), Value::Struct(x), Value::Struct(y)) => {
                schema.compare(x, y)
            }
            (FieldType::List(elem), Value::List(x), Value::List(y))
            | (FieldType::Set(elem), Value::Set(x), Value::Set(y)) => {
                cmp_seq(x, y, |p, q| elem.compare(p, q))
            }
            (FieldType::Map(k, v), Value::Map(x), Value::Map(y)) => {
                cmp_seq(x, y, |(pk, pv), (qk, qv)| {
                    k.compare(pk, qk).then_with(|| v.compare(pv, qv))
                })
            }
            _ => a.structural_cmp(b),
        }
    }

    fn fmt_value(&self, value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, value) {
            (FieldType::Struct(schema), Value::Struct(record)) => {
                fmt::Display::fmt(&schema.display(record), f)
            }
            (_, Value::Bool(b)) => write!(f, "{b}"),
            (_, Value::Byte(i)) => write!(f, "{i}"),
            (_, Value::I16(i)) => write!(f, "{i}"),
            (_, Value::I32(i)) => write!(f, "{i}"),
            (_, Value::I64(i)) => write!(f, "{i}"),
            (_, Value::Double(d)) => write!(f, "{d}"),
            (_, Value::String(s)) => f.write_str(s),
            (_, Value::Binary(bytes)) => {
                for (i, byte) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
            (FieldType::List(elem), Value::List(items)) => {
                f.write_str("[")?;
                elem.fmt_items(items, f)?;
                f.write_str("]")
            }
            (FieldType::Set(elem), Value::Set(items)) => {
                f.write_str("{")?;
                elem.fmt_items(items, f)?;
                f.write_str("}")
            }
            (FieldType::Map(k, v), Value::Map(entries)) => {
                f.write_str("{")?;
                for (i, (key, val)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    k.fmt_value(key, f)?;
                    f.write_str(":")?;
                    v.fmt_value(val, f)?;
                }
                f.write_str("}")
            }
            (_, other) => write!(f, "<{}>", other.type_name()),
        }
    }

    fn fmt_items(&self, items: &[Value], f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.fmt_value(item, f)?;
        }
        Ok(())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => f.write_str("bool"),
            FieldType::Byte => f.write_str("byte"),
            FieldType::I16 => f.write_str("i16"),
            FieldType::I32 => f.write_str("i32"),
            FieldType::I64 => f.write_str("i64"),
            FieldType::Double => f.write_str("double"),
            FieldType::String => f.write_str("string"),
            FieldType::Binary => f.write_str("binary"),
            FieldType::Struct(schema) => write!(f, "struct {}", schema.name()),
            FieldType::List(elem) => write!(f, "list<{elem}>"),
            FieldType::Set(elem) => write!(f, "set<{elem}>"),
            FieldType::Map(k, v) => write!(f, "map<{k},{v}>"),
        }
    }
}

/// Static metadata for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    tag: i16,
    name: String,
    field_type: FieldType,
    required: bool,
    default: Option<Value>,
}

impl FieldDescriptor {
    /// Field that must be set for a record to validate
    pub fn required(tag: i16, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            tag,
            name: name.into(),
            field_type,
            required: true,
            default: None,
        }
    }

    /// Field that may be left unset; costs nothing on the wire when unset
    pub fn optional(tag: i16, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(tag, name, field_type)
        }
    }

    /// Value placed in records created by [`StructSchema::new_record`]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Wire identity of the field
    #[inline]
    pub fn tag(&self) -> i16 {
        self.tag
    }

    /// Field name, used for diagnostics and by-name access
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    #[inline]
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Wire type written in the field header
    #[inline]
    pub fn wire_type(&self) -> WireType {
        self.field_type.wire_type()
    }

    /// Whether the field must be set
    #[inline]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Default placed in new records, if any
    #[inline]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Ordered field list of one record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructSchema {
    name: String,
    fields: Vec<FieldDescriptor>,
    by_tag: BTreeMap<i16, usize>,
}

impl StructSchema {
    /// Start building a schema for the named struct type
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Build a schema from a complete field list
    ///
    /// Tags must be positive and unique, names unique, and defaults must
    /// conform to their field type.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: String| Error::InvalidSchema {
            struct_name: name.clone(),
            reason,
        };

        let mut by_tag = BTreeMap::new();
        for (idx, field) in fields.iter().enumerate() {
            if field.tag <= 0 {
                return Err(invalid(format!(
                    "field '{}' has non-positive tag {}",
                    field.name, field.tag
                )));
            }
            if by_tag.insert(field.tag, idx).is_some() {
                return Err(invalid(format!("duplicate tag {}", field.tag)));
            }
            if fields[..idx].iter().any(|f| f.name == field.name) {
                return Err(invalid(format!("duplicate field name '{}'", field.name)));
            }
        }

        let schema = Self {
            name,
            fields,
            by_tag,
        };
        for field in &schema.fields {
            if let Some(default) = &field.default {
                schema
                    .check_field(field, default)
                    .map_err(|e| Error::InvalidSchema {
                        struct_name: schema.name.clone(),
                        reason: format!("default of field '{}' is invalid: {e}", field.name),
                    })?;
            }
        }
        Ok(schema)
    }

    /// Struct type name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Field declared with `tag`
    #[inline]
    pub fn field(&self, tag: i16) -> Option<&FieldDescriptor> {
        self.by_tag.get(&tag).map(|&idx| &self.fields[idx])
    }

    /// Field declared with `name`
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn require_field(&self, name: &str) -> Result<&FieldDescriptor> {
        self.field_by_name(name).ok_or_else(|| Error::UnknownField {
            struct_name: self.name.clone(),
            name: name.to_string(),
        })
    }

    /// Required fields in declaration order
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Record holding every declared default, all other fields unset
    pub fn new_record(&self) -> Record {
        self.fields
            .iter()
            .filter_map(|f| f.default.clone().map(|v| (f.tag, v)))
            .collect()
    }

    /// Check a record against this schema
    ///
    /// Fields are visited in declaration order: the first required field that
    /// is unset fails with [`Error::MissingRequiredField`], and a set value of
    /// the wrong type fails with [`Error::TypeMismatch`]. Nested structs are
    /// validated recursively. Tags the schema does not declare fail with
    /// [`Error::UndeclaredField`].
    pub fn validate(&self, record: &Record) -> Result<()> {
        for field in &self.fields {
            match record.get(field.tag) {
                Some(value) => self.check_field(field, value)?,
                None if field.required => {
                    return Err(Error::MissingRequiredField {
                        struct_name: self.name.clone(),
                        field: field.name.clone(),
                    })
                }
                None => {}
            }
        }

        if let Some(tag) = record.tags().find(|tag| !self.by_tag.contains_key(tag)) {
            return Err(Error::UndeclaredField {
                struct_name: self.name.clone(),
                tag,
            });
        }
        Ok(())
    }

    fn check_field(&self, field: &FieldDescriptor, value: &Value) -> Result<()> {
        field.field_type.check(value, &|| Error::TypeMismatch {
            struct_name: self.name.clone(),
            field: field.name.clone(),
            expected: field.field_type.to_string(),
        })
    }

    /// Order two records by this schema
    ///
    /// Walks the fields in declaration order; for each, an unset field sorts
    /// before a set one, then set values compare by their declared type.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for field in &self.fields {
            let ord = match (a.get(field.tag), b.get(field.tag)) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(x), Some(y)) => field.field_type.compare(x, y),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Render a record as `Name(field:value, ...)`
    ///
    /// Unset optional fields are omitted, unset required fields print as `null`.
    pub fn display<'a>(&'a self, record: &'a Record) -> RecordDisplay<'a> {
        RecordDisplay {
            schema: self,
            record,
        }
    }
}

/// Incremental [`StructSchema`] construction
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Append a required field
    pub fn required(self, tag: i16, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(FieldDescriptor::required(tag, name, field_type))
    }

    /// Append an optional field
    pub fn optional(self, tag: i16, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(FieldDescriptor::optional(tag, name, field_type))
    }

    /// Append a prepared descriptor
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Finish, checking the schema invariants
    pub fn build(self) -> Result<StructSchema> {
        StructSchema::new(self.name, self.fields)
    }
}

/// [`Display`](fmt::Display) adapter returned by [`StructSchema::display`]
pub struct RecordDisplay<'a> {
    schema: &'a StructSchema,
    record: &'a Record,
}

impl fmt::Display for RecordDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.name)?;
        let mut first = true;
        for field in &self.schema.fields {
            let value = self.record.get(field.tag);
            if value.is_none() && !field.required {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}:", field.name)?;
            match value {
                Some(value) => field.field_type.fmt_value(value, f)?,
                None => f.write_str("null")?,
            }
        }
        f.write_str(")")
    }
}
