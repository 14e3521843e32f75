use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::Stream;
use futures::stream::StreamExt;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response};
use url::Url;

use crate::accumulating_stream::AccumulatingStream;
use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::service::{ChunkStream, ModelService, ModelSession};
use crate::sse::process_sse;
use crate::types::{
    Content, ErrorResponse, GenerateContentRequest, GenerateContentResponse, Model, Role,
};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Environment variable the API key is read from by default.
pub const DEFAULT_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Client for the Gemini API.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: HeaderValue,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// The API key can be provided directly or read from the `GEMINI_API_KEY`
    /// environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, DEFAULT_API_KEY_VAR, None, None)
    }

    /// Create a new client with custom settings.
    ///
    /// `api_key_var` names the environment variable consulted when `api_key`
    /// is `None`.  A missing or empty key is a configuration error.
    pub fn with_options(
        api_key: Option<String>,
        api_key_var: &str,
        base_url: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = resolve_api_key(api_key, api_key_var)?;
        let api_key = HeaderValue::from_str(&api_key).map_err(|_| {
            Error::configuration(
                "API key contains characters that cannot be sent in a header",
                Some(api_key_var.to_string()),
            )
        })?;

        let base_url = parse_base_url(base_url.unwrap_or(DEFAULT_API_URL))?;

        // The deadline covers connecting and the response headers only; a
        // streamed body may take as long as the model keeps sending.
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every request and streamed payload.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );
        headers.insert("x-goog-api-key", self.api_key.clone());
        headers
    }

    /// The streaming endpoint for `model`.
    ///
    /// Bare model names live under `models/`; names that already carry a
    /// collection (such as `tunedModels/...`) are used as given.
    pub fn stream_url(&self, model: &Model) -> Result<Url> {
        let name = model.to_string();
        let resource = if name.contains('/') {
            name
        } else {
            format!("models/{name}")
        };
        let mut url = self
            .base_url
            .join(&format!("{resource}:streamGenerateContent"))?;
        url.set_query(Some("alt=sse"));
        Ok(url)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let detail = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .map(|envelope| envelope.error);
        let status = detail.as_ref().and_then(|d| d.status.clone());
        let message = detail
            .and_then(|d| d.message)
            .unwrap_or_else(|| error_body.clone());

        match status_code {
            400 => Error::bad_request(message),
            401 => Error::authentication(message),
            403 => Error::permission(message),
            404 => Error::not_found(message),
            408 => Error::timeout(message, None),
            429 => Error::rate_limit(message, retry_after),
            500 => Error::internal_server(message),
            502..=504 => Error::service_unavailable(message, retry_after),
            _ => Error::api(status_code, status, message),
        }
    }

    /// Send a request and get a streaming response.
    ///
    /// Returns a stream of response payloads that can be processed incrementally.
    pub async fn stream_generate(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<impl Stream<Item = Result<GenerateContentResponse>> + Send + 'static> {
        let url = self.stream_url(model)?;
        if let Some(logger) = &self.logger {
            logger.log_request(&model.to_string(), request);
        }

        CLIENT_REQUESTS.click();
        let started = Instant::now();
        let sent = tokio::time::timeout(
            self.timeout,
            self.client
                .post(url)
                .headers(self.default_headers())
                .json(request)
                .send(),
        )
        .await;
        CLIENT_REQUEST_DURATION.add(started.elapsed().as_secs_f64());

        let sent = sent.map_err(|_| {
            CLIENT_REQUEST_ERRORS.click();
            Error::timeout(
                format!(
                    "No response headers within {:.1}s",
                    self.timeout.as_secs_f64()
                ),
                Some(self.timeout.as_secs_f64()),
            )
        })?;
        let response = sent.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        let logger = self.logger.clone();
        let payloads = process_sse(response.bytes_stream()).map(move |payload| {
            if let Some(logger) = &logger {
                match &payload {
                    Ok(response) => logger.log_stream_response(response),
                    Err(err) => logger.log_error("stream", err),
                }
            }
            payload
        });
        Ok(payloads)
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl ModelService for GeminiClient {
    type Session = GeminiSession;

    fn open_session(&self, model: &Model, system_instruction: &str) -> Result<GeminiSession> {
        Ok(GeminiSession::new(self.clone(), model.clone(), system_instruction))
    }
}

/// A chat session against the Gemini API.
///
/// The service is stateless, so the session keeps the conversation history
/// itself and resends it with every message.  A turn joins the history only
/// once its reply stream has drained cleanly; failed or abandoned turns are
/// forgotten.
#[derive(Debug)]
pub struct GeminiSession {
    client: GeminiClient,
    model: Model,
    system_instruction: String,
    history: Vec<Content>,
    pending: Option<PendingTurn>,
}

#[derive(Debug)]
struct PendingTurn {
    user: Content,
    reply: tokio::sync::oneshot::Receiver<Result<String>>,
}

impl GeminiSession {
    /// Creates a session with an empty history.
    pub fn new(client: GeminiClient, model: Model, system_instruction: impl Into<String>) -> Self {
        Self {
            client,
            model,
            system_instruction: system_instruction.into(),
            history: Vec::new(),
            pending: None,
        }
    }

    /// The model this session talks to.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Completed turns, oldest first.
    pub fn history(&mut self) -> &[Content] {
        self.settle_pending();
        &self.history
    }

    fn settle_pending(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            match pending.reply.try_recv() {
                // The service rejects empty parts, so a blank reply (such as a
                // blocked one) is dropped along with the message that asked.
                Ok(Ok(reply)) if reply.trim().is_empty() => {}
                Ok(Ok(reply)) => {
                    self.history.push(pending.user);
                    self.history.push(Content::new(Role::Model, reply));
                }
                Ok(Err(_)) => {}
                Err(tokio::sync::oneshot::error::TryRecvError::Empty) => {
                    // Stream still alive; it cannot be recorded until it drains.
                    self.pending = Some(pending);
                }
                Err(tokio::sync::oneshot::error::TryRecvError::Closed) => {}
            }
        }
    }

    fn build_request(&self, user: &Content) -> GenerateContentRequest {
        let mut contents = self.history.clone();
        contents.push(user.clone());
        let request = GenerateContentRequest::new(contents);
        if self.system_instruction.trim().is_empty() {
            request
        } else {
            request.with_system_instruction(self.system_instruction.clone())
        }
    }
}

#[async_trait::async_trait]
impl ModelSession for GeminiSession {
    async fn send_streaming(&mut self, text: &str) -> Result<ChunkStream> {
        self.settle_pending();
        // An unfinished earlier turn is abandoned rather than interleaved.
        self.pending = None;

        let user = Content::new(Role::User, text);
        let request = self.build_request(&user);
        let payloads = self.client.stream_generate(&self.model, &request).await?;
        let chunks = payloads.map(|payload| payload.map(|response| response.to_chunk()));
        let (stream, reply) = AccumulatingStream::new(chunks);
        self.pending = Some(PendingTurn { user, reply });
        Ok(Box::pin(stream))
    }
}

fn resolve_api_key(api_key: Option<String>, api_key_var: &str) -> Result<String> {
    let api_key = match api_key {
        Some(key) => key,
        None => env::var(api_key_var).map_err(|_| {
            Error::configuration(
                format!("API key not provided and {api_key_var} environment variable not set"),
                Some(api_key_var.to_string()),
            )
        })?,
    };
    if api_key.trim().is_empty() {
        return Err(Error::configuration(
            format!("API key from {api_key_var} is empty"),
            Some(api_key_var.to_string()),
        ));
    }
    Ok(api_key.trim().to_string())
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    // `Url::join` drops the last path segment unless the base ends in '/'.
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Ok(Url::parse(&normalized)?)
}

#[cfg(test)]
mod tests {
    use futures::stream;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;
    use crate::types::{Chunk, KnownModel};

    fn client() -> GeminiClient {
        GeminiClient::new(Some("test-key".to_string())).unwrap()
    }

    #[test]
    fn missing_key_is_configuration_error() {
        let err = GeminiClient::with_options(None, "EDU_ASSISTANT_TEST_UNSET_KEY", None, None)
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("EDU_ASSISTANT_TEST_UNSET_KEY"));
    }

    #[test]
    fn blank_key_is_configuration_error() {
        let err = GeminiClient::new(Some("   ".to_string())).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn stream_url_for_known_model() {
        let url = client()
            .stream_url(&Model::Known(KnownModel::Gemini25Flash))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse"
        );
    }

    #[test]
    fn stream_url_for_tuned_model_and_custom_base() {
        let client = GeminiClient::with_options(
            Some("k".to_string()),
            DEFAULT_API_KEY_VAR,
            Some("http://localhost:8080/v1beta"),
            None,
        )
        .unwrap();
        let url = client
            .stream_url(&Model::Custom("tunedModels/edu-1".to_string()))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1beta/tunedModels/edu-1:streamGenerateContent?alt=sse"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = GeminiClient::with_options(
            Some("k".to_string()),
            DEFAULT_API_KEY_VAR,
            Some("not a url"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("test-key"));
    }

    #[test]
    fn request_carries_history_and_instruction() {
        let mut session = client()
            .open_session(&Model::default(), "Be kind.")
            .unwrap();
        session.history.push(Content::new(Role::User, "Hi"));
        session.history.push(Content::new(Role::Model, "Hello!"));

        let request = session.build_request(&Content::new(Role::User, "Mission?"));
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[2].text(), "Mission?");
        assert_eq!(
            request.system_instruction.map(|c| c.text()),
            Some("Be kind.".to_string())
        );
    }

    #[tokio::test]
    async fn drained_turn_joins_history() {
        let mut session = client().open_session(&Model::default(), "").unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();
        session.pending = Some(PendingTurn {
            user: Content::new(Role::User, "Hi"),
            reply: rx,
        });
        tx.send(Ok("Hello!".to_string())).unwrap();

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1], Content::new(Role::Model, "Hello!"));
    }

    #[tokio::test]
    async fn empty_reply_is_forgotten() {
        let mut session = client().open_session(&Model::default(), "").unwrap();
        let (stream, reply) = AccumulatingStream::new(stream::iter(vec![Ok(Chunk::new(""))]));
        session.pending = Some(PendingTurn {
            user: Content::new(Role::User, "hi"),
            reply,
        });
        let drained: Vec<_> = stream.collect().await;
        assert_eq!(drained.len(), 1);

        assert!(session.history().is_empty());
        let request = session.build_request(&Content::new(Role::User, "next"));
        assert_eq!(request.contents, vec![Content::new(Role::User, "next")]);
    }

    #[tokio::test]
    async fn failed_turn_is_forgotten() {
        let mut session = client().open_session(&Model::default(), "").unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();
        session.pending = Some(PendingTurn {
            user: Content::new(Role::User, "Hi"),
            reply: rx,
        });
        tx.send(Err(Error::streaming("reset", None))).unwrap();

        assert!(session.history().is_empty());
    }

    async fn serve_once(listener: TcpListener, events: Vec<String>, gap: Duration) {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ntransfer-encoding: chunked\r\n\r\n",
            )
            .await
            .unwrap();
        for event in events {
            tokio::time::sleep(gap).await;
            let chunk = format!("{:x}\r\n{event}\r\n", event.len());
            socket.write_all(chunk.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
        }
        socket.write_all(b"0\r\n\r\n").await.unwrap();
        socket.shutdown().await.unwrap();
    }

    async fn read_request(socket: &mut TcpStream) {
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
            if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&request[..end]).to_lowercase();
                let length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    return;
                }
            }
        }
    }

    fn local_client(addr: std::net::SocketAddr, timeout: Duration) -> GeminiClient {
        GeminiClient::with_options(
            Some("k".to_string()),
            DEFAULT_API_KEY_VAR,
            Some(&format!("http://{addr}/v1beta/")),
            Some(timeout),
        )
        .unwrap()
    }

    fn hello_request() -> GenerateContentRequest {
        GenerateContentRequest::new(vec![Content::new(Role::User, "hi")])
    }

    #[tokio::test]
    async fn slow_stream_outlives_request_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let events = (0..5)
            .map(|i| {
                format!(
                    "data: {{\"candidates\":[{{\"content\":{{\"role\":\"model\",\"parts\":[{{\"text\":\"{i}\"}}]}}}}]}}\n\n"
                )
            })
            .collect();
        let server = tokio::spawn(serve_once(listener, events, Duration::from_millis(150)));

        // Five gaps of 150ms add up to well past the 300ms deadline.
        let client = local_client(addr, Duration::from_millis(300));
        let payloads: Vec<_> = client
            .stream_generate(&Model::default(), &hello_request())
            .await
            .unwrap()
            .collect()
            .await;
        let texts: Vec<String> = payloads
            .into_iter()
            .map(|payload| payload.unwrap().text())
            .collect();
        assert_eq!(texts, vec!["0", "1", "2", "3", "4"]);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn missing_response_headers_time_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(2)).await;
        });

        let client = local_client(addr, Duration::from_millis(200));
        let err = match client
            .stream_generate(&Model::default(), &hello_request())
            .await
        {
            Ok(_) => panic!("expected a timeout"),
            Err(err) => err,
        };
        assert!(err.is_timeout());
        server.abort();
    }
}
