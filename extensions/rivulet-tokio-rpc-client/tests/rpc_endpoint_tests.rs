use rivulet_tokio_rpc_client::{EndpointError, RpcClient, RpcEndpoint};

#[test]
fn test_endpoint_url() {
    let endpoint = RpcEndpoint::new("localhost", 8080);
    assert_eq!(endpoint.url(), "ws://localhost:8080/rpc");
    assert!(!endpoint.is_secure());

    let endpoint = endpoint.secure();
    assert_eq!(endpoint.to_string(), "wss://localhost:8080/rpc");
}

#[test]
fn test_endpoint_from_origin() {
    let endpoint = RpcEndpoint::from_origin("http://example.com:8080").unwrap();
    assert_eq!(endpoint.host(), "example.com");
    assert_eq!(endpoint.port(), 8080);
    assert!(!endpoint.is_secure());

    let endpoint = RpcEndpoint::from_origin("https://example.com").unwrap();
    assert_eq!(endpoint.port(), 443);
    assert_eq!(endpoint.url(), "wss://example.com:443/rpc");

    assert_eq!(RpcEndpoint::from_origin("http://example.com").unwrap().port(), 80);
}

#[test]
fn test_endpoint_rejects_bad_origins() {
    assert_eq!(
        RpcEndpoint::from_origin("ftp://example.com"),
        Err(EndpointError::UnsupportedScheme("ftp".to_string()))
    );
    assert!(matches!(
        RpcEndpoint::from_origin("not an origin"),
        Err(EndpointError::InvalidOrigin(_))
    ));
    assert!(RpcClient::from_origin("example.com:80").is_err());
}

#[test]
fn test_client_binds_calls_to_endpoint() {
    let client = RpcClient::new("127.0.0.1", 9000);
    let call = client
        .request(&rivulet::remote::RemoteHandle::initial(), "ping", &())
        .unwrap();
    assert_eq!(call.url(), "ws://127.0.0.1:9000/rpc");
    assert_eq!(client.endpoint().port(), 9000);
}
