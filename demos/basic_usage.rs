//! Basic usage example for tagwire
//!
//! Run with: cargo run --example basic_usage

use std::sync::Arc;

use tagwire::messages::namespace_listing::{self, NamespaceListing};
use tagwire::*;

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<()> {
    println!("TagWire Basic Usage Example");
    println!("===========================");

    let listing_schema = Arc::new(namespace_listing::schema()?);

    // Example 1: The predefined namespace listing
    println!("\n1. Namespace Listing:");
    {
        let codec = Codec::default();
        let listing = NamespaceListing::new("logs", true);
        let bytes = namespace_listing::encode(&codec, &listing_schema, &listing)?;
        println!("  Encoded {} bytes: {}", bytes.len(), hex(&bytes));

        let decoded = namespace_listing::decode(&codec, &listing_schema, &bytes)?;
        println!("  Decoded: {}", decoded);
    }

    // Example 2: Binary vs compact variants
    println!("\n2. Wire Variants:");
    {
        let record = NamespaceListing::new("tables", false).to_record();
        for (name, config) in [
            ("binary/big-endian", CodecConfig::binary()),
            (
                "binary/little-endian",
                CodecConfig::binary().with_byte_order(ByteOrder::LittleEndian),
            ),
            ("compact", CodecConfig::compact()),
        ] {
            let bytes = Codec::new(config).encode(&record, &listing_schema)?;
            println!("  {:<22} {:>3} bytes: {}", name, bytes.len(), hex(&bytes));
        }
    }

    // Example 3: A newer writer adds fields, an older reader skips them
    println!("\n3. Forward Compatibility:");
    {
        let newer = StructSchema::builder("NamespaceListing")
            .required(1, "name", FieldType::String)
            .required(2, "is_namespace", FieldType::Bool)
            .optional(3, "size", FieldType::I64)
            .optional(
                4,
                "children",
                FieldType::list(FieldType::structure(listing_schema.clone())),
            )
            .build()?;

        let record = Record::new()
            .with(1, "warehouse")
            .with(2, true)
            .with(3, 1i64 << 30)
            .with(
                4,
                Value::List(vec![
                    Value::Struct(NamespaceListing::new("logs", true).to_record()),
                    Value::Struct(NamespaceListing::new("events", false).to_record()),
                ]),
            );

        let codec = Codec::default();
        let bytes = codec.encode(&record, &newer)?;
        println!("  Newer writer: {}", newer.display(&record));

        let (old, report) = codec.decode_with_report(&bytes, &listing_schema)?;
        println!("  Older reader: {}", listing_schema.display(&old));
        for unknown in &report.unknown_tags {
            println!("    skipped tag {} ({})", unknown.tag, unknown.wire_type);
        }
    }

    // Example 4: Drift drops the field; a dropped required field fails validation
    println!("\n4. Schema Drift:");
    {
        let drifted = StructSchema::builder("NamespaceListing")
            .required(1, "name", FieldType::String)
            .required(2, "is_namespace", FieldType::I32)
            .build()?;
        let record = Record::new().with(1, "logs").with(2, 1i32);

        let codec = Codec::default();
        let bytes = codec.encode(&record, &drifted)?;
        match codec.decode_with_report(&bytes, &listing_schema) {
            Ok((record, _)) => println!("  Decoded: {}", listing_schema.display(&record)),
            Err(e) => println!("  Rejected: {} ({:?})", e, e.kind()),
        }
    }

    // Example 5: Streaming back-to-back records into a fixed buffer
    println!("\n5. Streaming:");
    {
        let codec = Codec::new(CodecConfig::compact());
        let mut buf = [0u8; 128];
        let mut len = 0;
        for (name, is_namespace) in [("a", true), ("b", false), ("c", true)] {
            let record = NamespaceListing::new(name, is_namespace).to_record();
            len += codec.encode_into(&record, &listing_schema, &mut buf[len..])?;
        }
        println!("  Encoded 3 listings into {} bytes", len);

        let mut rest = &buf[..len];
        while !rest.is_empty() {
            let (record, used) = codec.decode_prefix(rest, &listing_schema)?;
            println!("  {} ({} bytes)", listing_schema.display(&record), used);
            rest = &rest[used..];
        }
    }

    // Example 6: Error handling
    println!("\n6. Error Handling:");
    {
        let codec = Codec::default();
        let incomplete = Record::new().with(1, "logs");
        if let Err(e) = codec.encode(&incomplete, &listing_schema) {
            println!("  Encode: {} ({:?})", e, e.kind());
        }

        let truncated = [11, 0, 1, 0, 0, 0, 4, b'l', b'o'];
        if let Err(e) = codec.decode(&truncated, &listing_schema) {
            println!("  Decode: {} ({:?})", e, e.kind());
        }

        let mut small = [0u8; 4];
        let record = NamespaceListing::new("logs", true).to_record();
        if let Err(e) = codec.encode_into(&record, &listing_schema, &mut small) {
            println!("  Buffer: {} ({:?})", e, e.kind());
        }
    }

    Ok(())
}
