#![allow(clippy::unwrap_used, clippy::expect_used)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use http::{HeaderMap, HeaderValue};
use tessera_security::metadata::{
    UNAUTHORIZED_REASON, decode_header, encode_header, extract, from_headers, inject,
};
use tessera_security::{
    DataScope, MetadataError, OPERATOR_HEADER, OperatorDecodeError, OperatorMetadata, encode_bin,
};

fn operator(scope: DataScope) -> OperatorMetadata {
    OperatorMetadata::builder()
        .user_id(123)
        .tenant_id(456)
        .org_unit_id(Some(789))
        .platform_admin(true)
        .data_scope(scope)
        .username("root")
        .build()
}

#[test]
fn header_round_trip_preserves_every_field() {
    for scope in DataScope::VARIANTS {
        let op = operator(scope);
        let mut headers = HeaderMap::new();
        inject(&mut headers, &op).unwrap();

        let decoded = from_headers(&headers).expect("operator present");
        assert_eq!(decoded, op);
    }
}

#[test]
fn header_value_is_unpadded_base64() {
    let value = encode_header(&operator(DataScope::All)).unwrap();
    let text = value.to_str().unwrap();
    assert!(!text.ends_with('='));
    assert_eq!(decode_header(text).unwrap(), operator(DataScope::All));
}

#[test]
fn missing_header_yields_none() {
    let headers = HeaderMap::new();
    assert!(from_headers(&headers).is_none());
    assert!(matches!(
        extract(&headers),
        Err(MetadataError::MissingHeader)
    ));
}

#[test]
fn garbage_header_yields_none_not_default_identity() {
    let mut headers = HeaderMap::new();
    headers.insert(OPERATOR_HEADER, HeaderValue::from_static("%%%not-base64%%%"));
    assert!(from_headers(&headers).is_none());

    let err = extract(&headers).unwrap_err();
    assert!(matches!(err, MetadataError::InvalidEncoding(_)));
    assert_eq!(err.reason(), UNAUTHORIZED_REASON);
}

#[test]
fn valid_base64_with_bad_payload_is_rejected() {
    let mut headers = HeaderMap::new();
    // "AQ" decodes to a lone version byte with no payload
    headers.insert(OPERATOR_HEADER, HeaderValue::from_static("AQ"));
    assert!(matches!(
        extract(&headers),
        Err(MetadataError::InvalidPayload(_))
    ));
}

#[test]
fn payload_with_appended_bytes_is_rejected() {
    let mut blob = encode_bin(&operator(DataScope::UnitOnly)).unwrap();
    blob.push(0);
    let text = STANDARD_NO_PAD.encode(blob);

    assert!(matches!(
        decode_header(&text),
        Err(MetadataError::InvalidPayload(
            OperatorDecodeError::TrailingBytes(1)
        ))
    ));
}

#[test]
fn inject_replaces_previous_operator() {
    let mut headers = HeaderMap::new();
    inject(&mut headers, &operator(DataScope::UnitOnly)).unwrap();
    inject(&mut headers, &operator(DataScope::All)).unwrap();

    assert_eq!(headers.get_all(OPERATOR_HEADER).iter().count(), 1);
    assert_eq!(
        from_headers(&headers).unwrap().data_scope(),
        DataScope::All
    );
}
