#![allow(clippy::unwrap_used, clippy::expect_used)]

use tessera_security::{
    DataScope, OPERATOR_BIN_VERSION, OperatorDecodeError, OperatorMetadata, decode_bin,
    encode_bin,
};

fn sample_operator() -> OperatorMetadata {
    OperatorMetadata::builder()
        .user_id(123)
        .tenant_id(456)
        .org_unit_id(Some(789))
        .platform_admin(true)
        .data_scope(DataScope::SelectedUnits)
        .username("alice")
        .build()
}

#[test]
fn round_trips_operator_binary_payload() {
    let op = sample_operator();

    let encoded = encode_bin(&op).expect("operator encodes");
    assert_eq!(encoded[0], OPERATOR_BIN_VERSION);

    let decoded = decode_bin(&encoded).expect("operator decodes");
    assert_eq!(decoded, op);
    assert_eq!(decoded.org_unit_id(), Some(789));
}

#[test]
fn decode_rejects_unknown_version() {
    let mut encoded = encode_bin(&sample_operator()).expect("encodes operator");
    encoded[0] = OPERATOR_BIN_VERSION.wrapping_add(1);

    let err = decode_bin(&encoded).expect_err("version mismatch should error");
    let message = err.to_string();
    assert!(
        message.contains("unsupported operator blob version"),
        "expected version error, got: {message}"
    );
}

#[test]
fn decode_rejects_empty_and_truncated_input() {
    assert!(matches!(decode_bin(&[]), Err(OperatorDecodeError::Empty)));

    let encoded = encode_bin(&sample_operator()).unwrap();
    let truncated = &encoded[..3];
    assert!(matches!(
        decode_bin(truncated),
        Err(OperatorDecodeError::Postcard(_))
    ));
}

#[test]
fn decode_rejects_trailing_bytes() {
    let mut encoded = encode_bin(&sample_operator()).unwrap();
    encoded.extend_from_slice(&[0xde, 0xad]);

    assert!(matches!(
        decode_bin(&encoded),
        Err(OperatorDecodeError::TrailingBytes(2))
    ));
}
