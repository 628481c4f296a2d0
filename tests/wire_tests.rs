use rivulet::constants::RPC_PROTO_VERSION;
use rivulet::remote::{CombineOperator, Combinable, RemoteHandle, RemoteObjectId};
use rivulet::wire::{
    CloseCode, DecodedReply, EncodeArguments, EncodedArguments, Json, PartialResult,
    ReplyEnvelope, RequestEnvelope, UNKNOWN_CLOSE_REASON, WireError, close_reason,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct SortArgs {
    column: String,
    ascending: bool,
}

/// A type with its own canonical wire form.
struct Selection(Vec<u32>);

impl EncodeArguments for Selection {
    fn encode_arguments(&self) -> Result<EncodedArguments, WireError> {
        let ids: Vec<String> = self.0.iter().map(u32::to_string).collect();
        Ok(EncodedArguments::custom(format!("\"{}\"", ids.join(","))))
    }
}

#[test]
fn test_request_envelope_field_names() {
    let request = RemoteHandle::new("42")
        .create_request(
            "sort",
            &Json(SortArgs {
                column: "age".into(),
                ascending: true,
            }),
        )
        .unwrap();

    let text = request.envelope().to_json().unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["objectId"], "42");
    assert_eq!(value["method"], "sort");
    assert_eq!(value["requestId"], request.request_id());
    assert_eq!(value["protoVersion"], RPC_PROTO_VERSION);
    // Arguments travel as a string holding JSON text.
    assert_eq!(value["arguments"], r#"{"column":"age","ascending":true}"#);
}

#[test]
fn test_request_envelope_roundtrip() {
    let envelope = RequestEnvelope::new(
        "7",
        "histogram",
        Json(json!({"buckets": 10})).encode_arguments().unwrap(),
        99,
    );
    let decoded = RequestEnvelope::from_json(&envelope.to_json().unwrap()).unwrap();

    assert_eq!(decoded, envelope);
    assert_eq!(decoded.proto_version, RPC_PROTO_VERSION);
    assert!(decoded.check_proto_version().is_ok());
    assert_eq!(
        decoded.decode_arguments::<Value>().unwrap(),
        json!({"buckets": 10})
    );
}

#[test]
fn test_absent_arguments_encode_as_null() {
    let handle = RemoteHandle::initial();

    let unit = handle.create_request("listTables", &()).unwrap();
    assert_eq!(unit.arguments().as_str(), "null");

    let none = handle
        .create_request("listTables", &None::<Json<SortArgs>>)
        .unwrap();
    assert_eq!(none.envelope().arguments, "null");
    assert_eq!(none.envelope().decode_arguments::<Value>().unwrap(), Value::Null);
}

#[test]
fn test_custom_encoder_is_used_verbatim() {
    let request = RemoteHandle::new("3")
        .create_request("select", &Selection(vec![1, 5, 8]))
        .unwrap();
    assert_eq!(request.arguments().as_str(), "\"1,5,8\"");
    assert_eq!(
        request.envelope().decode_arguments::<String>().unwrap(),
        "1,5,8"
    );
}

#[test]
fn test_proto_version_mismatch_is_rejected() {
    let mut envelope = RequestEnvelope::new("0", "ping", EncodedArguments::null(), 1);
    envelope.proto_version = RPC_PROTO_VERSION + 1;

    match envelope.check_proto_version() {
        Err(WireError::UnsupportedProtocolVersion { expected, actual }) => {
            assert_eq!(expected, RPC_PROTO_VERSION);
            assert_eq!(actual, RPC_PROTO_VERSION + 1);
        }
        other => panic!("Expected a version error, got {:?}", other),
    }
}

#[test]
fn test_reply_decodes_partial_result() {
    let frame = r#"{"isError":false,"result":"{\"done\":0.5,\"data\":[1,2,3]}"}"#;
    assert_eq!(
        ReplyEnvelope::decode::<Vec<u32>>(frame),
        DecodedReply::Partial(PartialResult::new(0.5, Some(vec![1, 2, 3])))
    );

    let progress_only = r#"{"isError":false,"result":"{\"done\":0.25,\"data\":null}"}"#;
    assert_eq!(
        ReplyEnvelope::decode::<Vec<u32>>(progress_only),
        DecodedReply::Partial(PartialResult::progress(0.25))
    );
}

#[test]
fn test_reply_error_carries_message() {
    let frame = ReplyEnvelope::error("bad column").to_json().unwrap();
    assert_eq!(frame, r#"{"isError":true,"result":"bad column"}"#);
    assert_eq!(
        ReplyEnvelope::decode::<Value>(&frame),
        DecodedReply::RemoteError("bad column".to_string())
    );
}

#[test]
fn test_reply_success_roundtrip() {
    let reply = ReplyEnvelope::success(&PartialResult::new(1.0, Some("table-1"))).unwrap();
    assert!(!reply.is_error);

    let decoded = ReplyEnvelope::decode::<RemoteObjectId>(&reply.to_json().unwrap());
    assert_eq!(
        decoded,
        DecodedReply::Partial(PartialResult::new(1.0, Some(RemoteObjectId::new("table-1"))))
    );
}

#[test]
fn test_malformed_replies() {
    assert!(matches!(
        ReplyEnvelope::decode::<Value>("not json"),
        DecodedReply::Malformed(_)
    ));
    // Valid envelope, invalid payload.
    assert!(matches!(
        ReplyEnvelope::decode::<Value>(r#"{"isError":false,"result":"{oops"}"#),
        DecodedReply::Malformed(_)
    ));
    // Payload of the wrong shape.
    assert!(matches!(
        ReplyEnvelope::decode::<Vec<u32>>(r#"{"isError":false,"result":"{\"done\":1,\"data\":\"x\"}"}"#),
        DecodedReply::Malformed(_)
    ));
}

#[test]
fn test_close_reasons() {
    assert_eq!(close_reason(1000), "Normal closure.");
    assert_eq!(close_reason(1001), "Endpoint disconnected.");
    assert_eq!(close_reason(1005), "No status code.");
    assert_eq!(close_reason(1006), "Connection closed abnormally.");
    assert_eq!(close_reason(1011), "Unexpected server condition.");
    assert_eq!(close_reason(1015), "Cannot verify server TLS certificate.");
    assert_eq!(close_reason(1012), UNKNOWN_CLOSE_REASON);
    assert_eq!(close_reason(4000), UNKNOWN_CLOSE_REASON);

    assert_eq!(CloseCode::try_from(1003).unwrap(), CloseCode::Unsupported);
    assert_eq!(CloseCode::Abnormal.value(), 1006);
    assert!(CloseCode::Normal.is_normal());
    assert!(!CloseCode::Away.is_normal());
}

#[test]
fn test_remote_handles() {
    let initial = RemoteHandle::initial();
    assert!(initial.remote_object_id().is_initial());
    assert_eq!(initial.to_string(), "0");

    let table = RemoteHandle::from(RemoteObjectId::new("table-1"));
    assert_eq!(table, RemoteHandle::new("table-1"));
    assert!(!table.remote_object_id().is_initial());

    // Default combine is a no-op.
    table.combine(CombineOperator::Union);

    let first = table.create_request("count", &()).unwrap();
    let second = table.create_request("count", &()).unwrap();
    assert!(second.request_id() > first.request_id());
    assert_eq!(first.object_id(), table.remote_object_id());
}
