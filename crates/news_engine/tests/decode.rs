use news_engine::decode_body;

#[test]
fn utf8_is_the_default() {
    let decoded = decode_body("Café ☕".as_bytes(), None);
    assert_eq!(decoded.text, "Café ☕");
    assert_eq!(decoded.encoding_label, "UTF-8");
    assert!(!decoded.had_errors);
}

#[test]
fn declared_charset_is_honoured() {
    // "Café" in ISO-8859-1.
    let bytes = [0x43, 0x61, 0x66, 0xE9];
    let decoded = decode_body(&bytes, Some("application/json; charset=\"ISO-8859-1\""));
    assert_eq!(decoded.text, "Café");
    assert!(!decoded.had_errors);
}

#[test]
fn bom_is_stripped() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(br#"{"response":{}}"#);
    let decoded = decode_body(&bytes, Some("application/json"));
    assert_eq!(decoded.text, r#"{"response":{}}"#);
}

#[test]
fn malformed_bytes_are_replaced_not_fatal() {
    let decoded = decode_body(&[b'o', b'k', 0xFF], Some("application/json; charset=utf-8"));
    assert_eq!(decoded.text, "ok\u{FFFD}");
    assert!(decoded.had_errors);
}
