use api_contract::ServiceErrorBody;

#[test]
fn service_error_summary() {
    let body = r#"{"OperationId":"op-1","Error":"Not found","Reason":"missing stream"}"#;
    let error = ServiceErrorBody::parse(body).expect("parse");
    assert_eq!(
        error.summary(),
        "Not found; reason: missing stream; operation: op-1"
    );
}

#[test]
fn service_error_rejects_plain_text() {
    assert!(ServiceErrorBody::parse("Bad Gateway").is_none());
}
