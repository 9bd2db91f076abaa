// Handshake behaviour against an in-memory server.

mod support;

use csip_client::{ClientError, ClientOptions, CsipClient, HandshakeState, Link};
use csip_client_http::TransportError;
use std::time::Duration;
use support::{
    bare_program_list, end_device, end_device_list, fsa_list, single_device_server, FakeServer,
    Route, CAPABILITY, CAPABILITY_WITHOUT_DEVICES,
};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn single_device_is_keyed_by_canonical_lfdi() {
    let mut client = CsipClient::new(single_device_server("0x1234"));

    assert_ok!(client.handshake("/dcap").await);
    assert_eq!(client.state(), HandshakeState::DeviceDataLoaded);

    let session = client.session();
    assert!(session.device_capability.is_some());
    assert_eq!(session.end_device_list.as_ref().unwrap().end_device.len(), 1);
    assert_eq!(session.device_count(), 1);

    let aggregate = session.device("1234").unwrap();
    assert_eq!(aggregate.function_set_assignments.len(), 1);
    assert!(aggregate
        .function_set_assignments
        .contains_key(&Link::new("/edev/0/fsa")));
    assert_eq!(aggregate.der_programs.len(), 1);
    assert_eq!(aggregate.program_count(), 1);
    assert!(aggregate.active_der_controls.is_none());
    assert!(aggregate.default_der_controls.is_empty());
    assert!(aggregate.der_controls.is_empty());
    assert!(aggregate.der_curves.is_empty());
    assert!(aggregate.der_list.is_none());

    assert_eq!(
        client.transport().gets(),
        vec!["/dcap", "/edev", "/edev/0/fsa", "/edev/0/fsa/0/derp"]
    );
}

#[tokio::test]
async fn device_list_without_media_type_fails_handshake() {
    let server = single_device_server("0x1234").respond("/edev", 200, None, "<EndDeviceList/>");
    let mut client = CsipClient::new(server);

    let err = assert_err!(client.handshake("/dcap").await);

    assert!(matches!(err, ClientError::HandshakeFailed(_)));
    assert!(matches!(
        err.root_cause(),
        ClientError::UnsupportedMediaType { href: Some(href), content_type: None } if href == "/edev"
    ));
    assert_eq!(client.state(), HandshakeState::Failed);

    let session = client.session();
    assert_eq!(session.device_count(), 0);
    assert!(session.device_capability.is_some());
    assert!(session.end_device_list.is_none());
    assert_eq!(client.transport().gets(), vec!["/dcap", "/edev"]);
}

#[tokio::test]
async fn media_type_is_checked_before_status() {
    let server = single_device_server("0x1234").respond("/edev", 500, Some("text/html"), "<html/>");
    let mut client = CsipClient::new(server);

    let err = client.handshake("/dcap").await.unwrap_err();
    assert!(matches!(
        err.root_cause(),
        ClientError::UnsupportedMediaType { content_type: Some(ct), .. } if ct == "text/html"
    ));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn plain_xml_media_types_are_accepted() {
    let server = single_device_server("0x1234").respond(
        "/dcap",
        200,
        Some("application/xml; charset=utf-8"),
        CAPABILITY,
    );
    let mut client = CsipClient::new(server);

    assert_ok!(client.handshake("/dcap").await);
    assert_eq!(client.session().device_count(), 1);
}

#[tokio::test]
async fn failure_status_is_request_failed() {
    let server = FakeServer::new()
        .document("/dcap", CAPABILITY)
        .document("/edev", &end_device_list(&[end_device(0, "0x1234")]));
    let mut client = CsipClient::new(server);

    let err = client.handshake("/dcap").await.unwrap_err();

    assert!(matches!(
        err.root_cause(),
        ClientError::RequestFailed { uri, status: 404, .. } if uri == "/edev/0/fsa"
    ));
    assert_eq!(err.status(), Some(404));
    assert_eq!(client.session().device_count(), 0);
}

#[tokio::test]
async fn wrong_document_is_codec_error() {
    let server = single_device_server("0x1234").document("/edev", CAPABILITY);
    let mut client = CsipClient::new(server);

    let err = client.handshake("/dcap").await.unwrap_err();
    assert!(matches!(err.root_cause(), ClientError::Codec { uri, .. } if uri == "/edev"));
}

#[tokio::test]
async fn transport_failure_is_reported_with_uri() {
    let server = single_device_server("0x1234").route(
        "/edev",
        Route::Fail(TransportError::Request("connection reset".to_string())),
    );
    let mut client = CsipClient::new(server);

    let err = client.handshake("/dcap").await.unwrap_err();
    assert!(matches!(
        err.root_cause(),
        ClientError::Transport { uri, source: TransportError::Request(_) } if uri == "/edev"
    ));
}

#[tokio::test]
async fn conflicting_duplicate_lfdi_keeps_first_device() {
    let server = FakeServer::new()
        .document("/dcap", CAPABILITY)
        .document(
            "/edev",
            &end_device_list(&[end_device(0, "0xABCD"), end_device(1, "abcd")]),
        )
        .document("/edev/0/fsa", &fsa_list(0))
        .document("/edev/0/fsa/0/derp", &bare_program_list(0))
        .document("/edev/1/fsa", &fsa_list(1))
        .document("/edev/1/fsa/0/derp", &bare_program_list(1));
    let mut client = CsipClient::new(server);

    let err = client.handshake("/dcap").await.unwrap_err();

    assert!(matches!(
        err.root_cause(),
        ClientError::AggregationConflict { lfdi } if lfdi == "ABCD"
    ));

    let session = client.session();
    assert_eq!(session.device_count(), 1);
    let first = session.device("ABCD").unwrap();
    assert!(first
        .function_set_assignments
        .contains_key(&Link::new("/edev/0/fsa")));
    assert_eq!(first.der_programs[0].der_program[0].m_rid.as_deref(), Some("P0"));
    assert_eq!(first.der_programs.len(), 1);
}

#[tokio::test]
async fn identical_duplicate_device_is_skipped() {
    let server = single_device_server("1234").document(
        "/edev",
        &end_device_list(&[end_device(0, "1234"), end_device(0, "0x1234")]),
    );
    let mut client = CsipClient::new(server);

    assert_ok!(client.handshake("/dcap").await);

    let aggregate = client.session().device("1234").unwrap();
    assert_eq!(aggregate.der_programs.len(), 1);
}

#[tokio::test]
async fn device_without_lfdi_is_precondition() {
    let body = r#"<EndDeviceList href="/edev" all="1" results="1">
  <EndDevice href="/edev/0"><FunctionSetAssignmentsListLink href="/edev/0/fsa"/></EndDevice>
</EndDeviceList>"#;
    let server = single_device_server("1234").document("/edev", body);
    let mut client = CsipClient::new(server);

    let err = client.handshake("/dcap").await.unwrap_err();
    assert!(matches!(err.root_cause(), ClientError::Precondition(what) if what.contains("/edev/0")));
    assert!(!client.transport().gets().contains(&"/edev/0/fsa".to_string()));
}

#[tokio::test]
async fn device_without_fsa_link_is_unsupported() {
    let body = r#"<EndDeviceList href="/edev" all="1" results="1">
  <EndDevice href="/edev/0"><lFDI>1234</lFDI></EndDevice>
</EndDeviceList>"#;
    let server = single_device_server("1234").document("/edev", body);
    let mut client = CsipClient::new(server);

    let err = client.handshake("/dcap").await.unwrap_err();
    assert!(matches!(
        err.root_cause(),
        ClientError::UnsupportedMediaType { href: None, content_type: None }
    ));
}

#[tokio::test]
async fn capability_without_device_link_stops_before_devices() {
    let server = FakeServer::new().document("/dcap", CAPABILITY_WITHOUT_DEVICES);
    let mut client = CsipClient::new(server);

    let err = client.handshake("/dcap").await.unwrap_err();

    assert!(matches!(err.root_cause(), ClientError::Precondition(_)));
    assert_eq!(client.transport().gets(), vec!["/dcap"]);
    assert!(client.session().device_capability.is_some());
}

#[tokio::test]
async fn steps_require_their_predecessors() {
    let mut client = CsipClient::new(single_device_server("1234"));

    let err = client.load_end_devices().await.unwrap_err();
    assert!(matches!(err, ClientError::Precondition(_)));
    assert_eq!(client.state(), HandshakeState::Failed);

    let err = client.load_device_data().await.unwrap_err();
    assert!(matches!(err, ClientError::Precondition(_)));

    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn steps_advance_state_one_at_a_time() {
    let mut client = CsipClient::new(single_device_server("1234"));
    assert_eq!(client.state(), HandshakeState::Init);

    client.load_capability("/dcap").await.unwrap();
    assert_eq!(client.state(), HandshakeState::CapabilityLoaded);

    client.load_end_devices().await.unwrap();
    assert_eq!(client.state(), HandshakeState::DevicesLoaded);
    assert_eq!(client.session().device_count(), 0);

    client.load_device_data().await.unwrap();
    assert_eq!(client.state(), HandshakeState::DeviceDataLoaded);
    assert_eq!(client.session().device_count(), 1);
}

#[tokio::test]
async fn failed_capability_reload_drops_the_stale_capability() {
    let mut client = CsipClient::new(single_device_server("1234"));
    client.load_capability("/dcap").await.unwrap();
    client.load_end_devices().await.unwrap();

    client.transport().set_route(
        "/dcap",
        Route::Fail(TransportError::Request("connection reset".to_string())),
    );
    assert_err!(client.load_capability("/dcap").await);
    assert!(client.session().device_capability.is_none());
    assert!(client.session().end_device_list.is_none());

    let err = client.load_end_devices().await.unwrap_err();
    assert!(matches!(err, ClientError::Precondition(_)));
    assert_eq!(client.transport().gets(), vec!["/dcap", "/edev", "/dcap"]);
}

#[tokio::test]
async fn repeated_handshake_merges_device_aggregates() {
    let mut client = CsipClient::new(single_device_server("1234"));

    client.handshake("/dcap").await.unwrap();
    client.handshake("/dcap").await.unwrap();

    let aggregate = client.session().device("1234").unwrap();
    assert_eq!(aggregate.function_set_assignments.len(), 1);
    assert_eq!(aggregate.der_programs.len(), 2);
    assert_eq!(client.session().device_count(), 1);
}

#[tokio::test]
async fn repeated_handshake_keeps_devices_no_longer_listed() {
    let server = single_device_server("1234")
        .document("/edev/1/fsa", &fsa_list(1))
        .document("/edev/1/fsa/0/derp", &bare_program_list(1));
    let mut client = CsipClient::new(server);
    client.handshake("/dcap").await.unwrap();

    client
        .transport()
        .set_document("/edev", &end_device_list(&[end_device(1, "5678")]));
    client.handshake("/dcap").await.unwrap();

    let session = client.session();
    assert_eq!(session.device_count(), 2);
    assert!(session.device("1234").is_some());
    assert!(session.device("5678").is_some());
    assert_eq!(session.end_device_list.as_ref().unwrap().end_device.len(), 1);
}

#[tokio::test]
async fn device_order_does_not_change_result() {
    fn server(devices: &[String]) -> FakeServer {
        FakeServer::new()
            .document("/dcap", CAPABILITY)
            .document("/edev", &end_device_list(devices))
            .document("/edev/0/fsa", &fsa_list(0))
            .document("/edev/0/fsa/0/derp", &bare_program_list(0))
            .document("/edev/1/fsa", &fsa_list(1))
            .document("/edev/1/fsa/0/derp", &bare_program_list(1))
    }

    let mut forward = CsipClient::new(server(&[end_device(0, "01"), end_device(1, "02")]));
    let mut reverse = CsipClient::new(server(&[end_device(1, "02"), end_device(0, "01")]));
    forward.handshake("/dcap").await.unwrap();
    reverse.handshake("/dcap").await.unwrap();

    let a: Vec<_> = forward.session().devices().collect();
    let b: Vec<_> = reverse.session().devices().collect();
    assert_eq!(a.len(), 2);
    assert_eq!(a, b);
}

#[tokio::test]
async fn handshake_timeout_surfaces_as_timeout() {
    let server = single_device_server("1234").route("/edev/0/fsa/0/derp", Route::Hang);
    let options = ClientOptions {
        handshake_timeout: Some(Duration::from_millis(100)),
        ..Default::default()
    };
    let mut client = CsipClient::with_options(server, options);

    let err = client.handshake("/dcap").await.unwrap_err();

    assert!(err.is_timeout());
    assert!(matches!(
        err.root_cause(),
        ClientError::Timeout { uri } if uri == "/edev/0/fsa/0/derp"
    ));
    assert_eq!(client.state(), HandshakeState::Failed);
    assert_eq!(client.session().device_count(), 0);
}

#[tokio::test]
async fn request_timeout_bounds_each_request() {
    let server = single_device_server("1234").route("/edev", Route::Hang);
    let options = ClientOptions {
        request_timeout: Some(Duration::from_millis(50)),
        handshake_timeout: None,
    };
    let mut client = CsipClient::with_options(server, options);

    let err = client.handshake("/dcap").await.unwrap_err();
    assert!(matches!(err.root_cause(), ClientError::Timeout { uri } if uri == "/edev"));
}

#[tokio::test]
async fn transport_timeout_maps_to_timeout() {
    let server = single_device_server("1234").route("/edev", Route::Fail(TransportError::Timeout));
    let mut client = CsipClient::new(server);

    let err = client.handshake("/dcap").await.unwrap_err();
    assert!(err.is_timeout());
}
