use crate::config::{Config, SHARED_SECRET_VAR, UPSTREAM_URL_VAR};
use crate::headers::apply_cors;
use crate::metrics_defs::{RELAYED_REQUESTS, UPSTREAM_FAILURES, UPSTREAM_LATENCY};
use http::header::CONTENT_TYPE;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes, Incoming};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use serde_json::Value;
use shared::http::json_error_response;
use shared::{counter, histogram};
use std::convert::Infallible;
use std::pin::Pin;
use std::time::Instant;
use url::Url;

/// Stateless pass-through to the spreadsheet-script backend.
///
/// The relay forwards GET/POST requests to the configured upstream with the
/// shared secret injected (query parameter for GET, body field for POST) and
/// relays the upstream status, body, and content-type verbatim. It never
/// inspects business payload shape. Missing configuration is surfaced as a
/// structured 500 on every request rather than refusing to start, so the
/// dashboard gets a readable error instead of a connection failure.
#[derive(Clone)]
pub struct RelayService {
    upstream_url: Option<Url>,
    shared_secret: Option<String>,
    client: reqwest::Client,
}

impl RelayService {
    pub fn new(upstream_url: Option<Url>, shared_secret: Option<String>) -> Self {
        if upstream_url.is_none() {
            tracing::warn!(var = UPSTREAM_URL_VAR, "relay started without an upstream URL");
        }
        if shared_secret.is_none() {
            tracing::warn!(var = SHARED_SECRET_VAR, "relay started without a shared secret");
        }

        RelayService {
            upstream_url,
            shared_secret,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.upstream_url.clone(), config.shared_secret.clone())
    }

    /// Handles one inbound request. Generic over the body so tests can drive
    /// the service without a real connection.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        let method = req.method().clone();

        let mut response = if method == Method::OPTIONS {
            preflight_response()
        } else if method == Method::GET {
            self.forward_get(&req).await
        } else if method == Method::POST {
            self.forward_post(req).await
        } else {
            json_error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
        };

        apply_cors(response.headers_mut());
        counter!(
            RELAYED_REQUESTS,
            "method" => method.to_string(),
            "status" => response.status().as_u16().to_string()
        )
        .increment(1);
        response
    }

    async fn forward_get<B>(&self, req: &Request<B>) -> Response<Full<Bytes>> {
        let (upstream, secret) = match self.require_config() {
            Ok(target) => target,
            Err(response) => return response,
        };

        let mut target = upstream.clone();
        {
            let mut pairs = target.query_pairs_mut();
            for (key, value) in
                url::form_urlencoded::parse(req.uri().query().unwrap_or("").as_bytes())
            {
                pairs.append_pair(&key, &value);
            }
            pairs.append_pair("token", secret);
        }

        tracing::debug!(path = %req.uri().path(), "forwarding GET");
        let started = Instant::now();
        match self.client.get(target).send().await {
            Ok(upstream_response) => {
                histogram!(UPSTREAM_LATENCY).record(started.elapsed().as_secs_f64());
                relay_response(upstream_response).await
            }
            Err(err) => self.upstream_failure(&err),
        }
    }

    async fn forward_post<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        let (upstream, secret) = match self.require_config() {
            Ok(target) => target,
            Err(response) => return response,
        };
        let upstream = upstream.clone();
        let secret = secret.to_string();

        let body_bytes = match req.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                return json_error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("could not read request body: {err}"),
                );
            }
        };

        let parsed: Value = match serde_json::from_slice(&body_bytes) {
            Ok(value) => value,
            Err(_) => return json_error_response(StatusCode::BAD_REQUEST, "malformed JSON body"),
        };
        let Value::Object(mut object) = parsed else {
            return json_error_response(StatusCode::BAD_REQUEST, "request body must be a JSON object");
        };
        object.insert("token".to_string(), Value::String(secret));

        tracing::debug!("forwarding POST");
        let started = Instant::now();
        match self
            .client
            .post(upstream)
            .json(&Value::Object(object))
            .send()
            .await
        {
            Ok(upstream_response) => {
                histogram!(UPSTREAM_LATENCY).record(started.elapsed().as_secs_f64());
                relay_response(upstream_response).await
            }
            Err(err) => self.upstream_failure(&err),
        }
    }

    fn require_config(&self) -> Result<(&Url, &str), Response<Full<Bytes>>> {
        let Some(upstream) = &self.upstream_url else {
            return Err(json_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("missing upstream URL configuration ({UPSTREAM_URL_VAR})"),
            ));
        };
        let Some(secret) = &self.shared_secret else {
            return Err(json_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("missing shared secret configuration ({SHARED_SECRET_VAR})"),
            ));
        };
        Ok((upstream, secret.as_str()))
    }

    fn upstream_failure(&self, err: &reqwest::Error) -> Response<Full<Bytes>> {
        counter!(UPSTREAM_FAILURES).increment(1);
        tracing::error!(error = %err, "upstream request failed");
        json_error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
    }
}

/// Relays the upstream status, body, and content-type without
/// reinterpretation.
async fn relay_response(upstream: reqwest::Response) -> Response<Full<Bytes>> {
    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();

    match upstream.bytes().await {
        Ok(body) => {
            let mut response = Response::new(Full::new(body));
            *response.status_mut() = status;
            if let Some(content_type) = content_type {
                response.headers_mut().insert(CONTENT_TYPE, content_type);
            }
            response
        }
        Err(err) => json_error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

fn preflight_response() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::NO_CONTENT;
    response
}

impl Service<Request<Incoming>> for RelayService {
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(req).await) })
    }
}
