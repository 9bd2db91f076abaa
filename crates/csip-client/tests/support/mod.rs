// In-memory CSIP server for engine tests.

#![allow(dead_code)]

use csip_client_http::{Transport, TransportError, TransportResponse};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const SEP_XML: &str = "application/sep+xml";

/// How the fake server answers one path.
#[derive(Debug, Clone)]
pub enum Route {
    /// Send this response
    Respond(TransportResponse),
    /// Send this response after a pause
    Slow(Duration, TransportResponse),
    /// Never answer
    Hang,
    /// Fail before a status exists
    Fail(TransportError),
}

/// One request the server received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: &'static str,
    pub uri: String,
    pub body: Option<String>,
}

/// Routes by exact href. Unknown paths answer 404 with a document type.
#[derive(Debug, Default)]
pub struct FakeServer {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` as a 200 `application/sep+xml` document.
    pub fn document(self, uri: &str, body: &str) -> Self {
        self.respond(uri, 200, Some(SEP_XML), body)
    }

    pub fn respond(self, uri: &str, status: u16, content_type: Option<&str>, body: &str) -> Self {
        self.route(
            uri,
            Route::Respond(TransportResponse {
                status,
                content_type: content_type.map(str::to_string),
                body: body.to_string(),
            }),
        )
    }

    pub fn route(self, uri: &str, route: Route) -> Self {
        self.routes.lock().unwrap().insert(uri.to_string(), route);
        self
    }

    /// Replace a route on a server already handed to a client.
    pub fn set_document(&self, uri: &str, body: &str) {
        self.routes.lock().unwrap().insert(
            uri.to_string(),
            Route::Respond(TransportResponse {
                status: 200,
                content_type: Some(SEP_XML.to_string()),
                body: body.to_string(),
            }),
        );
    }

    /// Replace any route on a server already handed to a client.
    pub fn set_route(&self, uri: &str, route: Route) {
        self.routes.lock().unwrap().insert(uri.to_string(), route);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn gets(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "GET")
            .map(|r| r.uri)
            .collect()
    }

    fn lookup(&self, method: &'static str, uri: &str, body: Option<String>) -> Route {
        self.requests.lock().unwrap().push(Recorded {
            method,
            uri: uri.to_string(),
            body,
        });
        self.routes
            .lock()
            .unwrap()
            .get(uri)
            .cloned()
            .unwrap_or_else(|| {
                Route::Respond(TransportResponse {
                    status: 404,
                    content_type: Some(SEP_XML.to_string()),
                    body: String::new(),
                })
            })
    }

    async fn answer(route: Route) -> Result<TransportResponse, TransportError> {
        match route {
            Route::Respond(response) => Ok(response),
            Route::Slow(pause, response) => {
                tokio::time::sleep(pause).await;
                Ok(response)
            }
            Route::Fail(e) => Err(e),
            Route::Hang => std::future::pending().await,
        }
    }
}

impl Transport for FakeServer {
    async fn get(&self, uri: &str) -> Result<TransportResponse, TransportError> {
        let route = self.lookup("GET", uri, None);
        Self::answer(route).await
    }

    async fn post(&self, uri: &str, body: String) -> Result<TransportResponse, TransportError> {
        let route = self.lookup("POST", uri, Some(body));
        Self::answer(route).await
    }

    async fn put(&self, uri: &str, body: String) -> Result<TransportResponse, TransportError> {
        let route = self.lookup("PUT", uri, Some(body));
        Self::answer(route).await
    }
}

// ── Documents ──────────────────────────────────────────────────────────

pub const CAPABILITY: &str = r#"<DeviceCapability xmlns="urn:ieee:std:2030.5:ns" href="/dcap" pollRate="900">
  <TimeLink href="/tm"/>
  <UsagePointListLink href="/upt" all="1"/>
  <EndDeviceListLink href="/edev" all="1"/>
  <MirrorUsagePointListLink href="/mup" all="1"/>
  <ResponseSetListLink href="/rsps" all="1"/>
</DeviceCapability>"#;

pub const CAPABILITY_WITHOUT_DEVICES: &str =
    r#"<DeviceCapability xmlns="urn:ieee:std:2030.5:ns" href="/dcap"><TimeLink href="/tm"/></DeviceCapability>"#;

pub fn end_device(index: u32, lfdi: &str) -> String {
    format!(
        r#"<EndDevice href="/edev/{index}"><lFDI>{lfdi}</lFDI><sFDI>{sfdi}</sFDI><FunctionSetAssignmentsListLink href="/edev/{index}/fsa" all="1"/></EndDevice>"#,
        sfdi = 1000 + index
    )
}

pub fn end_device_list(devices: &[String]) -> String {
    format!(
        r#"<EndDeviceList xmlns="urn:ieee:std:2030.5:ns" href="/edev" all="{n}" results="{n}">{}</EndDeviceList>"#,
        devices.join(""),
        n = devices.len()
    )
}

pub fn fsa_list(index: u32) -> String {
    format!(
        r#"<FunctionSetAssignmentsList xmlns="urn:ieee:std:2030.5:ns" href="/edev/{index}/fsa" all="1" results="1">
  <FunctionSetAssignments href="/edev/{index}/fsa/0">
    <mRID>F{index}</mRID>
    <DERProgramListLink href="/edev/{index}/fsa/0/derp" all="1"/>
  </FunctionSetAssignments>
</FunctionSetAssignmentsList>"#
    )
}

/// A program list with one program that has no child links.
pub fn bare_program_list(index: u32) -> String {
    format!(
        r#"<DERProgramList xmlns="urn:ieee:std:2030.5:ns" href="/edev/{index}/fsa/0/derp" all="1" results="1">
  <DERProgram href="/edev/{index}/fsa/0/derp/0"><mRID>P{index}</mRID><primacy>1</primacy></DERProgram>
</DERProgramList>"#
    )
}

/// Server for one device with one assignment and one bare program.
pub fn single_device_server(lfdi: &str) -> FakeServer {
    FakeServer::new()
        .document("/dcap", CAPABILITY)
        .document("/edev", &end_device_list(&[end_device(0, lfdi)]))
        .document("/edev/0/fsa", &fsa_list(0))
        .document("/edev/0/fsa/0/derp", &bare_program_list(0))
}
