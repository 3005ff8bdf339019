//! Predefined message schemas
//!
//! Typed wrappers over [`Record`] for structs with a fixed schema.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::{FieldType, StructSchema};
use crate::value::Value;

/// One entry of a namespace listing
pub mod namespace_listing {
    use super::*;

    /// Struct type name
    pub const NAME: &str = "NamespaceListing";

    /// Field tags
    pub mod fields {
        /// Entry name
        pub const NAME: i16 = 1;
        /// Whether the entry is itself a namespace
        pub const IS_NAMESPACE: i16 = 2;
    }

    /// Build the `NamespaceListing` schema
    pub fn schema() -> Result<StructSchema> {
        StructSchema::builder(NAME)
            .required(fields::NAME, "name", FieldType::String)
            .required(fields::IS_NAMESPACE, "is_namespace", FieldType::Bool)
            .build()
    }

    /// Typed view of a `NamespaceListing` record
    ///
    /// The derived order matches the schema comparator, since both fields are
    /// required and compare in tag order.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NamespaceListing {
        /// Entry name
        pub name: String,
        /// Whether the entry is itself a namespace
        pub is_namespace: bool,
    }

    impl NamespaceListing {
        /// Create new listing entry
        #[inline]
        pub fn new(name: impl Into<String>, is_namespace: bool) -> Self {
            Self {
                name: name.into(),
                is_namespace,
            }
        }

        /// Convert to a dynamic record
        pub fn to_record(&self) -> Record {
            Record::new()
                .with(fields::NAME, self.name.as_str())
                .with(fields::IS_NAMESPACE, self.is_namespace)
        }

        /// Convert from a dynamic record, enforcing both required fields
        pub fn from_record(record: &Record) -> Result<Self> {
            let name = match record.get(fields::NAME) {
                Some(Value::String(s)) => s.clone(),
                other => return Err(field_error("name", "string", other)),
            };
            let is_namespace = match record.get(fields::IS_NAMESPACE) {
                Some(Value::Bool(b)) => *b,
                other => return Err(field_error("is_namespace", "bool", other)),
            };
            Ok(Self { name, is_namespace })
        }
    }

    fn field_error(field: &str, expected: &str, found: Option<&Value>) -> Error {
        match found {
            None => Error::MissingRequiredField {
                struct_name: NAME.to_string(),
                field: field.to_string(),
            },
            Some(_) => Error::TypeMismatch {
                struct_name: NAME.to_string(),
                field: field.to_string(),
                expected: expected.to_string(),
            },
        }
    }

    impl fmt::Display for NamespaceListing {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "{}(name:{}, is_namespace:{})",
                NAME, self.name, self.is_namespace
            )
        }
    }

    /// Encode a `NamespaceListing`
    ///
    /// `schema` is the value returned by [`schema`], built once and reused.
    #[inline]
    pub fn encode(
        codec: &Codec,
        schema: &StructSchema,
        listing: &NamespaceListing,
    ) -> Result<Vec<u8>> {
        codec.encode(&listing.to_record(), schema)
    }

    /// Decode a `NamespaceListing`
    ///
    /// Unknown fields are skipped, so payloads from newer writers that add
    /// fields still decode.
    #[inline]
    pub fn decode(codec: &Codec, schema: &StructSchema, bytes: &[u8]) -> Result<NamespaceListing> {
        let record = codec.decode(bytes, schema)?;
        NamespaceListing::from_record(&record)
    }

    /// Sort dynamic listing records with the schema comparator
    pub fn sort_records(schema: &StructSchema, records: &mut [Record]) {
        records.sort_by(|a, b| schema.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::namespace_listing::{self, fields, NamespaceListing};
    use super::*;
    use crate::config::CodecConfig;
    use crate::error::ErrorKind;
    use alloc::format;
    use alloc::vec;

    const LOGS: [u8; 16] = [
        11, 0, 1, 0, 0, 0, 4, b'l', b'o', b'g', b's', 2, 0, 2, 1, 0,
    ];

    #[test]
    fn test_listing_exact_bytes() {
        let codec = Codec::default();
        let schema = namespace_listing::schema().unwrap();
        let listing = NamespaceListing::new("logs", true);

        let bytes = namespace_listing::encode(&codec, &schema, &listing).unwrap();
        assert_eq!(bytes, LOGS);
        assert_eq!(
            namespace_listing::decode(&codec, &schema, &bytes).unwrap(),
            listing
        );
    }

    #[test]
    fn test_listing_missing_stop() {
        let schema = namespace_listing::schema().unwrap();
        let err = namespace_listing::decode(&Codec::default(), &schema, &LOGS[..LOGS.len() - 1])
            .unwrap_err();
        assert_eq!(err, Error::UnexpectedEof);
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn test_listing_compact() {
        let codec = Codec::new(CodecConfig::compact());
        let schema = namespace_listing::schema().unwrap();
        let listing = NamespaceListing::new("tables", false);
        let bytes = namespace_listing::encode(&codec, &schema, &listing).unwrap();
        assert_eq!(
            bytes,
            vec![11, 2, 6, b't', b'a', b'b', b'l', b'e', b's', 2, 4, 0, 0]
        );
        assert_eq!(
            namespace_listing::decode(&codec, &schema, &bytes).unwrap(),
            listing
        );
    }

    #[test]
    fn test_one_schema_serves_many_listings() {
        let codec = Codec::new(CodecConfig::compact());
        let schema = namespace_listing::schema().unwrap();
        for i in 0..50 {
            let listing = NamespaceListing::new(format!("ns-{i}"), i % 2 == 0);
            let bytes = namespace_listing::encode(&codec, &schema, &listing).unwrap();
            assert_eq!(
                namespace_listing::decode(&codec, &schema, &bytes).unwrap(),
                listing
            );
        }
    }

    #[test]
    fn test_from_record_errors() {
        let missing = Record::new().with(fields::NAME, "a");
        assert_eq!(
            NamespaceListing::from_record(&missing),
            Err(Error::MissingRequiredField {
                struct_name: "NamespaceListing".into(),
                field: "is_namespace".into()
            })
        );

        let wrong = Record::new()
            .with(fields::NAME, 5i32)
            .with(fields::IS_NAMESPACE, true);
        assert!(matches!(
            NamespaceListing::from_record(&wrong),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_display_matches_schema_display() {
        let listing = NamespaceListing::new("logs", true);
        let schema = namespace_listing::schema().unwrap();
        let rendered = listing.to_string();
        assert_eq!(rendered, "NamespaceListing(name:logs, is_namespace:true)");
        assert_eq!(schema.display(&listing.to_record()).to_string(), rendered);
    }

    #[test]
    fn test_sort_records() {
        let mut records = vec![
            NamespaceListing::new("b", false).to_record(),
            NamespaceListing::new("a", true).to_record(),
            NamespaceListing::new("a", false).to_record(),
            Record::new().with(fields::IS_NAMESPACE, true),
        ];
        let schema = namespace_listing::schema().unwrap();
        namespace_listing::sort_records(&schema, &mut records);

        // unset name sorts first
        assert!(!records[0].is_set(fields::NAME));
        let typed: Vec<_> = records[1..]
            .iter()
            .map(|r| NamespaceListing::from_record(r).unwrap())
            .collect();
        let mut expected = typed.clone();
        expected.sort();
        assert_eq!(typed, expected);
        assert_eq!(typed[0], NamespaceListing::new("a", false));
    }
}
