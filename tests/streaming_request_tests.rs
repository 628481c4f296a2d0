use rivulet::constants::{ABNORMAL_CLOSE_CODE, DEFAULT_COMMUNICATION_ERROR, NO_STATUS_CLOSE_CODE};
use rivulet::remote::RemoteHandle;
use rivulet::request::{
    Cancellable, OpenOutcome, RequestState, RpcConnection, RpcEvent, RpcRequestError,
    StreamingRequest,
};
use rivulet::utils::now;
use rivulet::wire::{Json, PartialResult, ReplyEnvelope, RequestEnvelope};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Records everything the request does to its connection.
#[derive(Default)]
struct ConnectionLog {
    sent: Vec<String>,
    closes: usize,
}

struct MockConnection(Arc<Mutex<ConnectionLog>>);

impl RpcConnection for MockConnection {
    fn send_text(&mut self, text: String) {
        self.0.lock().unwrap().sent.push(text);
    }

    fn close(&mut self) {
        self.0.lock().unwrap().closes += 1;
    }
}

fn mock_connection() -> (Box<dyn RpcConnection>, Arc<Mutex<ConnectionLog>>) {
    let log = Arc::new(Mutex::new(ConnectionLog::default()));
    (Box::new(MockConnection(log.clone())), log)
}

fn new_request() -> StreamingRequest {
    RemoteHandle::new("table-1")
        .create_request("histogram", &Json(json!({"buckets": 4})))
        .unwrap()
}

/// A request that has been invoked and has sent its envelope.
fn open_request() -> (StreamingRequest, Arc<Mutex<ConnectionLog>>) {
    let mut request = new_request();
    request.begin_invoke().unwrap();
    let (connection, log) = mock_connection();
    assert_eq!(request.handle_open(connection).unwrap(), OpenOutcome::Sent);
    (request, log)
}

fn progress_frame(done: f64, data: Value) -> String {
    ReplyEnvelope::success(&PartialResult::new(done, Some(data)))
        .unwrap()
        .to_json()
        .unwrap()
}

#[test]
fn test_new_request_is_idle_and_closed() {
    let request = new_request();
    assert_eq!(request.state(), RequestState::Idle);
    assert!(request.is_closed());
    assert!(!request.is_cancelled());
    assert_eq!(request.start_time(), None);
    assert_eq!(request.method(), "histogram");
    assert_eq!(
        request.to_string(),
        format!("table-1.histogram#{}", request.request_id())
    );
}

#[test]
fn test_open_sends_envelope_once() {
    let (mut request, log) = open_request();

    assert_eq!(request.state(), RequestState::Active);
    assert!(!request.is_closed());
    assert!(request.start_time().is_some());

    let sent = log.lock().unwrap().sent.clone();
    assert_eq!(sent.len(), 1);
    let envelope = RequestEnvelope::from_json(&sent[0]).unwrap();
    assert_eq!(envelope, request.envelope());
    assert_eq!(envelope.object_id, "table-1");

    // A second open must not send again.
    let (connection, second_log) = mock_connection();
    assert!(matches!(
        request.handle_open(connection),
        Err(RpcRequestError::AlreadySent)
    ));
    assert!(second_log.lock().unwrap().sent.is_empty());
    assert_eq!(log.lock().unwrap().sent.len(), 1);
}

#[test]
fn test_invoke_twice_is_rejected() {
    let mut request = new_request();
    request.begin_invoke().unwrap();
    assert!(matches!(
        request.begin_invoke(),
        Err(RpcRequestError::AlreadyInvoked)
    ));
}

#[test]
fn test_frames_become_progress_events() {
    let (mut request, _log) = open_request();

    for (done, data) in [(0.3, json!([1])), (0.6, json!([1, 2])), (1.0, json!([1, 2, 3]))] {
        let event = request.handle_message::<Value>(&progress_frame(done, data.clone()));
        assert_eq!(event, Some(RpcEvent::Progress(PartialResult::new(done, Some(data)))));
    }
    assert_eq!(request.handle_close::<Value>(1000), vec![RpcEvent::Completed]);
    assert_eq!(request.state(), RequestState::Closed);
}

#[test]
fn test_error_reply_does_not_end_stream() {
    let (mut request, _log) = open_request();

    let error = ReplyEnvelope::error("bad column").to_json().unwrap();
    assert_eq!(
        request.handle_message::<Value>(&error),
        Some(RpcEvent::Error("bad column".to_string()))
    );
    assert!(!request.is_closed());
    assert_eq!(request.handle_close::<Value>(1000), vec![RpcEvent::Completed]);
}

#[test]
fn test_malformed_frame_reports_error_and_continues() {
    let (mut request, _log) = open_request();

    let event = request.handle_message::<Value>("{not json");
    assert!(event.unwrap().is_error());

    let event = request.handle_message::<Value>(&progress_frame(0.5, json!("ok")));
    assert_eq!(
        event,
        Some(RpcEvent::Progress(PartialResult::new(0.5, Some(json!("ok")))))
    );
}

#[test]
fn test_abnormal_close_reports_error_then_completed() {
    let (mut request, _log) = open_request();

    let events = request.handle_close::<Value>(ABNORMAL_CLOSE_CODE);
    assert_eq!(
        events,
        vec![
            RpcEvent::Error("Connection closed abnormally.".to_string()),
            RpcEvent::Completed
        ]
    );

    // Only the first close counts.
    assert!(request.handle_close::<Value>(1000).is_empty());
    assert_eq!(request.handle_transport_error::<Value>(None), None);
}

#[test]
fn test_unknown_close_code() {
    let (mut request, _log) = open_request();
    assert_eq!(
        request.handle_close::<Value>(4321),
        vec![RpcEvent::Error("Unknown reason.".to_string()), RpcEvent::Completed]
    );
}

#[test]
fn test_cancel_active_request() {
    let (mut request, log) = open_request();

    assert!(request.cancel());
    assert!(request.is_cancelled());
    assert!(request.is_closed());
    assert_eq!(log.lock().unwrap().closes, 1);

    // Cancelling again is a no-op.
    assert!(!request.cancel());
    assert_eq!(log.lock().unwrap().closes, 1);

    // Frames racing the cancellation are dropped.
    assert_eq!(
        request.handle_message::<Value>(&progress_frame(0.9, json!(1))),
        None
    );

    // Our own empty close frame comes back without a status code.
    assert_eq!(
        request.handle_close::<Value>(NO_STATUS_CLOSE_CODE),
        vec![RpcEvent::Error("No status code.".to_string()), RpcEvent::Completed]
    );
}

#[test]
fn test_cancel_before_open_never_sends() {
    let mut request = new_request();
    request.begin_invoke().unwrap();

    assert!(!request.cancel());
    assert!(request.is_cancelled());

    let (connection, log) = mock_connection();
    assert_eq!(request.handle_open(connection).unwrap(), OpenOutcome::Cancelled);
    let log = log.lock().unwrap();
    assert!(log.sent.is_empty());
    assert_eq!(log.closes, 1);
}

#[test]
fn test_cancel_idle_request() {
    let mut request = new_request();
    assert!(!request.cancel());
    assert!(request.is_cancelled());
    assert_eq!(request.state(), RequestState::Idle);

    // Invoking it afterwards must not connect.
    assert!(matches!(
        request.begin_invoke(),
        Err(RpcRequestError::Cancelled)
    ));
    assert_eq!(request.state(), RequestState::Closed);

    let (connection, log) = mock_connection();
    assert!(request.handle_open(connection).is_err());
    assert!(log.lock().unwrap().sent.is_empty());
}

#[test]
fn test_cancel_after_completion_is_noop() {
    let (mut request, log) = open_request();
    assert_eq!(request.handle_close::<Value>(1000), vec![RpcEvent::Completed]);

    assert!(!request.cancel());
    assert!(!request.is_cancelled());
    assert!(request.is_closed());
    assert_eq!(request.state(), RequestState::Closed);
    assert_eq!(log.lock().unwrap().closes, 0);
}

#[test]
fn test_cancel_after_transport_error_is_noop() {
    let mut request = new_request();
    request.begin_invoke().unwrap();
    assert!(request.handle_transport_error::<Value>(None).is_some());

    assert!(!request.cancel());
    assert!(!request.is_cancelled());
}

#[test]
fn test_transport_error_messages() {
    let mut request = new_request();
    request.begin_invoke().unwrap();
    assert_eq!(
        request.handle_transport_error::<Value>(None),
        Some(RpcEvent::Error(DEFAULT_COMMUNICATION_ERROR.to_string()))
    );
    assert_eq!(request.state(), RequestState::Closed);

    let mut request = new_request();
    request.begin_invoke().unwrap();
    assert_eq!(
        request.handle_transport_error::<Value>(Some(String::new())),
        Some(RpcEvent::Error(DEFAULT_COMMUNICATION_ERROR.to_string()))
    );

    let mut request = new_request();
    request.begin_invoke().unwrap();
    assert_eq!(
        request.handle_transport_error::<Value>(Some("Connection refused".to_string())),
        Some(RpcEvent::Error("Connection refused".to_string()))
    );
}

#[test]
fn test_chain_inherits_start_time() {
    let (first, _log) = open_request();
    let first_start = first.start_time();
    let first = Mutex::new(first);

    let mut second = new_request();
    second.chain(Some(&first as &dyn Cancellable));
    assert_eq!(second.start_time(), first_start);

    // Invoking keeps the inherited start time.
    second.begin_invoke().unwrap();
    assert_eq!(second.start_time(), first_start);

    let mut unchained = new_request();
    unchained.chain(None);
    assert_eq!(unchained.start_time(), None);
}

#[test]
fn test_chain_after_invoke_is_ignored() {
    let mut earlier = new_request();
    earlier.set_start_time(Some(now() - chrono::Duration::seconds(10)));
    let earlier = Mutex::new(earlier);

    let (mut request, _log) = open_request();
    let started = request.start_time();

    request.chain(Some(&earlier as &dyn Cancellable));
    assert_eq!(request.start_time(), started);

    request.set_start_time(None);
    assert_eq!(request.start_time(), started);
}

#[test]
fn test_explicit_start_time() {
    let mut request = new_request();
    let started = now() - chrono::Duration::seconds(3);
    request.set_start_time(Some(started));
    request.begin_invoke().unwrap();
    assert_eq!(request.start_time(), Some(started));
}

#[test]
fn test_shared_request_is_cancellable() {
    let (request, log) = open_request();
    let shared: Arc<dyn Cancellable> = Arc::new(Mutex::new(request));

    assert!(shared.start_time().is_some());
    assert!(shared.cancel());
    assert!(!shared.cancel());
    assert_eq!(log.lock().unwrap().closes, 1);
}
