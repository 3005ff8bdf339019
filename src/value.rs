//! Dynamically typed field values

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

use crate::record::Record;
use crate::wire::WireType;

/// One field value
///
/// `Double` compares and hashes by bit pattern, so `NaN == NaN` and
/// `0.0 != -0.0`; this keeps `Eq` and `Hash` lawful for whole records.
#[derive(Debug, Clone)]
pub enum Value {
    /// BOOL
    Bool(bool),
    /// BYTE
    Byte(i8),
    /// I16
    I16(i16),
    /// I32
    I32(i32),
    /// I64
    I64(i64),
    /// DOUBLE
    Double(f64),
    /// STRING, always valid UTF-8
    String(String),
    /// BINARY, raw bytes sharing the STRING wire code
    Binary(Vec<u8>),
    /// Nested STRUCT
    Struct(Record),
    /// LIST
    List(Vec<Value>),
    /// SET, kept in wire order
    ///
    /// Equality and hashing compare elements in wire order, so `{1, 2}` and
    /// `{2, 1}` are different values.
    Set(Vec<Value>),
    /// MAP, kept in wire order; equality compares entries in that order
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Wire type this value is written as
    pub const fn wire_type(&self) -> WireType {
        match self {
            Value::Bool(_) => WireType::Bool,
            Value::Byte(_) => WireType::Byte,
            Value::I16(_) => WireType::I16,
            Value::I32(_) => WireType::I32,
            Value::I64(_) => WireType::I64,
            Value::Double(_) => WireType::Double,
            Value::String(_) | Value::Binary(_) => WireType::String,
            Value::Struct(_) => WireType::Struct,
            Value::List(_) => WireType::List,
            Value::Set(_) => WireType::Set,
            Value::Map(_) => WireType::Map,
        }
    }

    /// Lower-case variant name for diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::Struct(_) => "struct",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
        }
    }

    /// The payload of a `Bool`
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The payload of a `Byte`
    #[inline]
    pub fn as_byte(&self) -> Option<i8> {
        match self {
            Value::Byte(b) => Some(*b),
            _ => None,
        }
    }

    /// The payload of an `I16`
    #[inline]
    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Value::I16(i) => Some(*i),
            _ => None,
        }
    }

    /// The payload of an `I32`
    #[inline]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(i) => Some(*i),
            _ => None,
        }
    }

    /// The payload of an `I64`
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    /// The payload of a `Double`
    #[inline]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// The payload of a `String`
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The payload of a `Binary`
    #[inline]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// The payload of a `Struct`
    #[inline]
    pub fn as_struct(&self) -> Option<&Record> {
        match self {
            Value::Struct(r) => Some(r),
            _ => None,
        }
    }

    /// Elements of a LIST or SET
    #[inline]
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) | Value::Set(v) => Some(v),
            _ => None,
        }
    }

    /// Entries of a MAP
    #[inline]
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Byte(_) => 1,
            Value::I16(_) => 2,
            Value::I32(_) => 3,
            Value::I64(_) => 4,
            Value::Double(_) => 5,
            Value::String(_) => 6,
            Value::Binary(_) => 7,
            Value::Struct(_) => 8,
            Value::List(_) => 9,
            Value::Set(_) => 10,
            Value::Map(_) => 11,
        }
    }

    /// Structural total order, used where no schema type is available
    ///
    /// Values of different variants order by variant; nested records order by
    /// their present fields in tag order.
    pub(crate) fn structural_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Byte(a), Value::Byte(b)) => a.cmp(b),
            (Value::I16(a), Value::I16(b)) => a.cmp(b),
            (Value::I32(a), Value::I32(b)) => a.cmp(b),
            (Value::I64(a), Value::I64(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Binary(a), Value::Binary(b)) => a.cmp(b),
            (Value::Struct(a), Value::Struct(b)) => {
                cmp_seq(a.iter(), b.iter(), |(ta, va), (tb, vb)| {
                    ta.cmp(&tb).then_with(|| va.structural_cmp(vb))
                })
            }
            (Value::List(a), Value::List(b)) | (Value::Set(a), Value::Set(b)) => {
                cmp_seq(a.iter(), b.iter(), Value::structural_cmp)
            }
            (Value::Map(a), Value::Map(b)) => cmp_seq(a.iter(), b.iter(), |(ka, va), (kb, vb)| {
                ka.structural_cmp(kb).then_with(|| va.structural_cmp(vb))
            }),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Lexicographic comparison of two sequences under `cmp`
pub(crate) fn cmp_seq<A, B, F>(a: A, b: B, mut cmp: F) -> Ordering
where
    A: IntoIterator,
    B: IntoIterator,
    F: FnMut(A::Item, B::Item) -> Ordering,
{
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    loop {
        match (a.next(), b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match cmp(x, y) {
                Ordering::Equal => continue,
                ord => return ord,
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Bool(b) => b.hash(state),
            Value::Byte(b) => b.hash(state),
            Value::I16(i) => i.hash(state),
            Value::I32(i) => i.hash(state),
            Value::I64(i) => i.hash(state),
            Value::Double(d) => d.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Binary(b) => b.hash(state),
            Value::Struct(r) => r.hash(state),
            Value::List(v) | Value::Set(v) => v.hash(state),
            Value::Map(m) => m.hash(state),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Byte,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f64 => Double,
    String => String,
    Vec<u8> => Binary,
    Record => Struct,
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Value::String(String::from(s))
    }
}

impl From<&[u8]> for Value {
    #[inline]
    fn from(b: &[u8]) -> Self {
        Value::Binary(b.to_vec())
    }
}
