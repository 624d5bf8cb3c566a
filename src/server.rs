//! Remote ball physics endpoint
//!
//! `POST /update_ball` advances the posted ball by one frame. GET requests
//! serve the front-end bundle from the configured web root. Requests are
//! handled one at a time on the calling thread.

use std::io::Read;
use std::path::{Component, Path, PathBuf};

use tiny_http::{Header, Method, Request, Response, Server};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::protocol::{self, ErrorReply, UPDATE_BALL_PATH};
use crate::sim::step_ball;
use crate::tuning::FlightTuning;

/// A fully formed reply, independent of the HTTP library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into_bytes(),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        let body = serde_json::to_string(&ErrorReply {
            error: message.into(),
        })
        .unwrap_or_else(|_| "{}".to_string());
        Self::json(status, body)
    }
}

/// Request handling
#[derive(Debug, Clone)]
pub struct PhysicsService {
    pub tuning: FlightTuning,
    pub web_root: Option<PathBuf>,
}

impl PhysicsService {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            tuning: config.physics,
            web_root: config.web_root.clone(),
        }
    }

    /// Route one request
    pub fn handle(&self, method: &str, path: &str, body: &[u8]) -> Reply {
        // Ignore any query string
        let path = path.split('?').next().unwrap_or("/");

        if path == UPDATE_BALL_PATH {
            return match method {
                "POST" => self.update_ball(body),
                _ => Reply::error(405, "use POST"),
            };
        }

        match method {
            "GET" | "HEAD" => self.static_file(path),
            _ => Reply::error(404, "not found"),
        }
    }

    fn update_ball(&self, body: &[u8]) -> Reply {
        let body = match std::str::from_utf8(body) {
            Ok(body) => body,
            Err(_) => return Reply::error(400, "body is not UTF-8"),
        };
        let request = match protocol::decode_request(body) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Rejected update_ball body: {}", e);
                return Reply::error(400, e.to_string());
            }
        };
        if !request.ball.is_finite() {
            return Reply::error(400, "ball state must be finite");
        }

        let next = step_ball(&request.ball, &self.tuning);
        match protocol::encode_reply(&next) {
            Ok(json) => Reply::json(200, json),
            Err(e) => Reply::error(500, e.to_string()),
        }
    }

    fn static_file(&self, path: &str) -> Reply {
        let Some(root) = &self.web_root else {
            return Reply::error(404, "not found");
        };
        let Some(file) = resolve_static(root, path) else {
            return Reply::error(404, "not found");
        };
        match std::fs::read(&file) {
            Ok(bytes) => Reply {
                status: 200,
                content_type: content_type(&file),
                body: bytes,
            },
            Err(_) => Reply::error(404, "not found"),
        }
    }
}

/// Map a URL path to a file under `root`. Rejects anything that could
/// escape the root.
fn resolve_static(root: &Path, path: &str) -> Option<PathBuf> {
    let relative = path.trim_start_matches('/');
    let relative = if relative.is_empty() {
        "index.html"
    } else {
        relative
    };

    let candidate = Path::new(relative);
    let safe = candidate
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !safe {
        return None;
    }
    Some(root.join(candidate))
}

fn content_type(file: &Path) -> &'static str {
    match file.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

fn method_name(method: &Method) -> &'static str {
    match method {
        Method::Get => "GET",
        Method::Head => "HEAD",
        Method::Post => "POST",
        Method::Put => "PUT",
        Method::Delete => "DELETE",
        Method::Options => "OPTIONS",
        Method::Patch => "PATCH",
        _ => "OTHER",
    }
}

/// Largest request body accepted
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Read at most `limit` bytes. `None` when the body is longer.
fn read_body(reader: &mut dyn Read, limit: u64) -> Result<Option<Vec<u8>>> {
    let mut body = Vec::new();
    reader.take(limit + 1).read_to_end(&mut body)?;
    if body.len() as u64 > limit {
        return Ok(None);
    }
    Ok(Some(body))
}

fn respond(mut request: Request, service: &PhysicsService) -> Result<()> {
    let method = method_name(request.method());
    let reply = match read_body(request.as_reader(), MAX_BODY_BYTES)? {
        Some(body) => service.handle(method, request.url(), &body),
        None => Reply::error(413, "request body too large"),
    };
    log::debug!("{} {} -> {}", method, request.url(), reply.status);

    let header = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes())
        .map_err(|_| Error::Transport("invalid content type header".to_string()))?;
    let response = Response::from_data(reply.body)
        .with_status_code(reply.status)
        .with_header(header);
    request.respond(response)?;
    Ok(())
}

/// Bind and serve until the process is stopped
pub fn serve(config: &ServerConfig) -> Result<()> {
    let server = Server::http(&config.bind).map_err(|e| Error::Transport(e.to_string()))?;
    let service = PhysicsService::new(config);
    log::info!("Physics server listening on http://{}", config.bind);
    if let Some(root) = &config.web_root {
        log::info!("Serving static files from {}", root.display());
    }

    for request in server.incoming_requests() {
        if let Err(e) = respond(request, &service) {
            log::warn!("Request failed: {}", e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Ball2d;

    fn service() -> PhysicsService {
        PhysicsService::new(&ServerConfig::default())
    }

    #[test]
    fn test_update_ball_steps_physics() {
        let reply = service().handle(
            "POST",
            "/update_ball",
            br#"{"ball":{"x":100,"y":300,"dx":8,"dy":-10}}"#,
        );
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "application/json");

        let ball = protocol::decode_reply(std::str::from_utf8(&reply.body).unwrap()).unwrap();
        assert_eq!(
            ball,
            Ball2d {
                x: 108.0,
                y: 290.5,
                dx: 8.0,
                dy: -9.5
            }
        );
    }

    #[test]
    fn test_update_ball_floor_bounce() {
        let reply = service().handle(
            "POST",
            "/update_ball",
            br#"{"ball":{"x":400,"y":599,"dx":0,"dy":4.5}}"#,
        );
        let ball = protocol::decode_reply(std::str::from_utf8(&reply.body).unwrap()).unwrap();
        assert_eq!(ball.y, 600.0);
        assert!((ball.dy - (-3.0)).abs() < 0.0001);
    }

    #[test]
    fn test_update_ball_uses_configured_tuning() {
        let mut config = ServerConfig::default();
        config.physics.gravity = 2.0;
        let reply = PhysicsService::new(&config).handle(
            "POST",
            "/update_ball?t=1",
            br#"{"ball":{"x":10,"y":10,"dx":0,"dy":0}}"#,
        );
        let ball = protocol::decode_reply(std::str::from_utf8(&reply.body).unwrap()).unwrap();
        assert_eq!(ball.dy, 2.0);
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        let reply = service().handle("POST", "/update_ball", b"{\"ball\": 3}");
        assert_eq!(reply.status, 400);
        let err: ErrorReply = serde_json::from_slice(&reply.body).unwrap();
        assert!(err.error.contains("malformed"));
    }

    #[test]
    fn test_wrong_method_and_unknown_route() {
        assert_eq!(service().handle("GET", "/update_ball", b"").status, 405);
        assert_eq!(service().handle("POST", "/elsewhere", b"{}").status, 404);
        // No web root configured
        assert_eq!(service().handle("GET", "/", b"").status, 404);
    }

    #[test]
    fn test_body_limit() {
        let small = br#"{"ball":{"x":1,"y":2,"dx":3,"dy":4}}"#;
        let body = read_body(&mut &small[..], MAX_BODY_BYTES).unwrap();
        assert_eq!(body.as_deref(), Some(&small[..]));

        let exact = vec![b' '; 16];
        assert_eq!(read_body(&mut &exact[..], 16).unwrap(), Some(exact.clone()));

        let oversized = vec![b' '; MAX_BODY_BYTES as usize + 1];
        assert_eq!(read_body(&mut &oversized[..], MAX_BODY_BYTES).unwrap(), None);
    }

    #[test]
    fn test_resolve_static_rejects_traversal() {
        let root = Path::new("/srv/web");
        assert_eq!(
            resolve_static(root, "/"),
            Some(PathBuf::from("/srv/web/index.html"))
        );
        assert_eq!(
            resolve_static(root, "/pkg/app.wasm"),
            Some(PathBuf::from("/srv/web/pkg/app.wasm"))
        );
        assert_eq!(resolve_static(root, "/../etc/passwd"), None);
        assert_eq!(resolve_static(root, "/pkg/../../secret"), None);
    }

    #[test]
    fn test_serves_files_from_web_root() {
        let dir = std::env::temp_dir().join(format!("hoop-arcade-web-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<canvas></canvas>").unwrap();

        let config = ServerConfig {
            web_root: Some(dir.clone()),
            ..ServerConfig::default()
        };
        let reply = PhysicsService::new(&config).handle("GET", "/", b"");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "text/html; charset=utf-8");
        assert_eq!(reply.body, b"<canvas></canvas>");

        let missing = PhysicsService::new(&config).handle("GET", "/nope.js", b"");
        assert_eq!(missing.status, 404);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
