//! Local HTTP stub for exercising the dog API source
//!
//! Serves scripted replies from a `tiny_http` server on an ephemeral port and
//! records every request it sees.

use std::{
    collections::HashMap,
    io::Cursor,
    sync::{Arc, Mutex},
    thread,
};

use tiny_http::{Header, Response, ResponseBox, Server, StatusCode};

/// A request seen by the stub
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request path including query
    pub path:       String,
    /// User-Agent header, if sent
    pub user_agent: Option<String>,
}

/// What the handler sees for each request
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Request path including query
    pub path:     &'a str,
    /// How many earlier requests hit the same path
    pub index:    usize,
    /// Base URL of the stub, for building absolute links
    pub base_url: &'a str,
}

/// A scripted reply
pub struct Reply {
    status:       u16,
    body:         Vec<u8>,
    content_type: Option<&'static str>,
    headers:      Vec<(&'static str, String)>,
    /// Omit Content-Length and stream the body chunked
    chunked:      bool,
}

impl Reply {
    /// 200 with a JSON body
    pub fn json(value: serde_json::Value) -> Self {
        Self {
            status:       200,
            body:         value.to_string().into_bytes(),
            content_type: Some("application/json"),
            headers:      Vec::new(),
            chunked:      false,
        }
    }

    /// 200 with raw bytes
    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status:       200,
            body,
            content_type: Some("image/png"),
            headers:      Vec::new(),
            chunked:      false,
        }
    }

    /// Empty body with the given status
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            content_type: None,
            headers: Vec::new(),
            chunked: false,
        }
    }

    /// 200 with a plain-text body
    pub fn text(body: &str) -> Self {
        Self {
            status:       200,
            body:         body.as_bytes().to_vec(),
            content_type: Some("text/plain"),
            headers:      Vec::new(),
            chunked:      false,
        }
    }

    /// Adds a response header
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Sends the body without a Content-Length header
    pub fn chunked(mut self) -> Self {
        self.chunked = true;
        self
    }

    fn into_response(self) -> ResponseBox {
        let mut headers = Vec::new();
        if let Some(content_type) = self.content_type {
            headers.push(Header::from_bytes("Content-Type", content_type).unwrap());
        }
        for (name, value) in &self.headers {
            headers.push(Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap());
        }

        let length = if self.chunked {
            None
        } else {
            Some(self.body.len())
        };
        Response::new(StatusCode(self.status), headers, Cursor::new(self.body), length, None)
            .boxed()
    }
}

/// Running stub server; stops accepting requests when dropped
pub struct HttpStub {
    server:   Arc<Server>,
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl HttpStub {
    /// Starts a stub answering every request with `handler`
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(Hit<'_>) -> Reply + Send + 'static,
    {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("stub server should bind"));
        let addr = server
            .server_addr()
            .to_ip()
            .expect("stub server should listen on TCP");
        let base_url = format!("http://{}", addr);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let worker_base = base_url.clone();
        let worker_server = Arc::clone(&server);
        let worker_requests = Arc::clone(&requests);
        thread::spawn(move || {
            let mut hits: HashMap<String, usize> = HashMap::new();
            for request in worker_server.incoming_requests() {
                let path = request.url().to_string();
                let user_agent = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("User-Agent"))
                    .map(|h| h.value.as_str().to_string());
                worker_requests.lock().unwrap().push(RecordedRequest {
                    path: path.clone(),
                    user_agent,
                });

                let count = hits.entry(path.clone()).or_insert(0);
                let reply = handler(Hit {
                    path:     &path,
                    index:    *count,
                    base_url: &worker_base,
                });
                *count += 1;

                let _ = request.respond(reply.into_response());
            }
        });

        Self {
            server,
            base_url,
            requests,
        }
    }

    /// `http://127.0.0.1:<port>`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Every request seen so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests seen for `path`
    pub fn hits(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }
}

impl Drop for HttpStub {
    fn drop(&mut self) {
        self.server.unblock();
    }
}
