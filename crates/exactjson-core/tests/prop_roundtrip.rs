/// Property-Based Roundtrip Tests
///
/// Uses the `proptest` crate to generate random value trees and verify that
/// `decode(encode(v)) == v` holds for all generated inputs. This catches
/// edge cases that hand-written tests might miss.
///
/// Strategies generate:
/// - Random strings (including edge cases: empty, unicode, quotes, slashes,
///   control characters)
/// - Random integers at both widths (full `i64` range and beyond, via `i128`)
/// - Random finite floats (non-finite values are an encode-policy concern,
///   covered in encoder_tests)
/// - Random nested objects and arrays (bounded depth)
///
/// Two differential properties lean on `serde_json` as an independent
/// referee: every encoded document must parse under it, and object key
/// order must agree with its `preserve_order` parsing.
use exactjson_core::{decode, encode, encode_with, EncodeOptions, Object, Value};
use num_bigint::BigInt;
use proptest::prelude::*;

// ============================================================================
// Strategies for generating value trees
// ============================================================================

/// Generate an object key (non-empty, limited length).
fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,15}").unwrap()
}

/// Generate a string payload with edge cases.
fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        // Simple ASCII strings
        prop::string::string_regex("[a-zA-Z0-9 ]{0,30}").unwrap(),
        // Full printable ASCII, including quotes, backslashes, slashes
        prop::string::string_regex("[ -~]{0,20}").unwrap(),
        // Arbitrary non-control unicode
        prop::string::string_regex("\\PC{0,10}").unwrap(),
        // Edge case: empty string
        Just(String::new()),
        // Edge case: every named escape plus a slash
        Just("a\"b\\c\u{0008}\u{000c}\n\r\t/d".to_string()),
        // Edge case: control characters that need \\u00xx form
        Just("\u{0001}\u{001f}".to_string()),
        // Unicode: accents, CJK, astral plane
        Just("café".to_string()),
        Just("你好".to_string()),
        Just("😀 🚀".to_string()),
    ]
}

/// Generate an integer value at machine width.
fn arb_int() -> impl Strategy<Value = Value> {
    any::<i64>().prop_map(Value::Int)
}

/// Generate an integer that may need arbitrary precision.
fn arb_wide_int() -> impl Strategy<Value = Value> {
    any::<i128>().prop_map(|n| Value::integer(BigInt::from(n)))
}

/// Generate a finite float. `Display` for f64 is shortest-roundtrip, so any
/// finite value survives the text cycle exactly.
fn arb_float() -> impl Strategy<Value = Value> {
    any::<f64>()
        .prop_filter("finite floats only", |f| f.is_finite())
        .prop_map(Value::Float)
}

/// Generate a primitive value (no containers).
fn arb_primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        1 => any::<bool>().prop_map(Value::Bool),
        3 => arb_int(),
        1 => arb_wide_int(),
        2 => arb_float(),
        3 => arb_string().prop_map(Value::String),
    ]
}

/// Generate a value tree with limited nesting (recursive).
fn arb_value_inner(depth: u32) -> impl Strategy<Value = Value> {
    if depth == 0 {
        arb_primitive().boxed()
    } else {
        prop_oneof![
            4 => arb_primitive(),
            2 => prop::collection::vec((arb_key(), arb_value_inner(depth - 1)), 0..5)
                .prop_map(|pairs| {
                    let mut object = Object::new();
                    for (k, v) in pairs {
                        object.insert(k, v);
                    }
                    Value::object(object)
                }),
            2 => prop::collection::vec(arb_value_inner(depth - 1), 0..5)
                .prop_map(Value::array),
        ]
        .boxed()
    }
}

/// Top-level strategy: trees up to 3 container levels deep.
fn arb_value() -> impl Strategy<Value = Value> {
    arb_value_inner(3)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Core roundtrip property: decode(encode(v)) == v for any tree.
    #[test]
    fn roundtrip_preserves_tree(value in arb_value()) {
        let encoded = encode(&value).unwrap();
        let reparsed = decode(&encoded).unwrap();
        prop_assert_eq!(
            &value,
            &reparsed,
            "roundtrip failed!\n  encoded: {}",
            encoded
        );
    }

    /// Encoding a decoded tree again produces identical text.
    #[test]
    fn second_encode_is_textually_stable(value in arb_value()) {
        let encoded = encode(&value).unwrap();
        let reparsed = decode(&encoded).unwrap();
        let again = encode(&reparsed).unwrap();
        prop_assert_eq!(encoded, again);
    }

    /// Every encoded document is grammar-valid JSON by an independent parser.
    #[test]
    fn encoded_output_parses_under_serde(value in arb_value()) {
        let encoded = encode(&value).unwrap();
        let parsed: Result<serde_json::Value, _> = serde_json::from_str(&encoded);
        prop_assert!(parsed.is_ok(), "serde_json rejected: {}", encoded);
    }

    /// Key order in the output agrees with order-preserving parsing.
    #[test]
    fn key_order_agrees_with_serde(pairs in prop::collection::vec((arb_key(), arb_primitive()), 0..8)) {
        let mut object = Object::new();
        for (k, v) in pairs {
            object.insert(k, v);
        }
        let ours: Vec<String> = object.keys().map(str::to_string).collect();
        let encoded = encode(&Value::object(object)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        let theirs: Vec<String> = parsed
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        prop_assert_eq!(ours, theirs);
    }

    /// Encoding a finite tree never fails and never panics.
    #[test]
    fn encode_never_fails_on_finite_trees(value in arb_value()) {
        prop_assert!(encode(&value).is_ok());
    }

    /// Decoding encoded output never fails.
    #[test]
    fn decode_never_fails_on_encoded_output(value in arb_value()) {
        let encoded = encode(&value).unwrap();
        prop_assert!(decode(&encoded).is_ok(), "decode rejected: {}", encoded);
    }

    /// ASCII-only mode produces pure-ASCII text that decodes to the same tree.
    #[test]
    fn ascii_mode_roundtrips(value in arb_value()) {
        let options = EncodeOptions { ascii_only: true, ..Default::default() };
        let encoded = encode_with(&value, &options).unwrap();
        prop_assert!(encoded.is_ascii(), "not ASCII: {}", encoded);
        prop_assert_eq!(&value, &decode(&encoded).unwrap());
    }

    /// Pretty output decodes to the same tree as compact output.
    #[test]
    fn pretty_mode_roundtrips(value in arb_value()) {
        let options = EncodeOptions { indent: Some(2), ..Default::default() };
        let pretty = encode_with(&value, &options).unwrap();
        prop_assert_eq!(&value, &decode(&pretty).unwrap());
    }

    /// Strings survive as object values regardless of content.
    #[test]
    fn string_values_roundtrip(s in arb_string()) {
        let mut object = Object::new();
        object.insert("key".to_string(), Value::String(s.clone()));
        let tree = Value::object(object);
        let encoded = encode(&tree).unwrap();
        prop_assert_eq!(&tree, &decode(&encoded).unwrap());
    }

    /// Integers of any width keep their exact decimal text.
    #[test]
    fn integer_text_is_exact(n in any::<i128>()) {
        let encoded = encode(&Value::integer(BigInt::from(n))).unwrap();
        prop_assert_eq!(encoded, n.to_string());
    }
}
