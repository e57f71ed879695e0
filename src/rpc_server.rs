//! gittools RPC server, the extension's background process.
//!
//! Protocol: one JSON object per line (newline-delimited JSON) over stdin/stdout.
//! Request:  {"id":1, "method":"trackUsage", "params":{"tool":"GitHub1s","owner":"...","repo":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr (`RUST_LOG`, default `info`) so stdout carries only the protocol.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::time::Instant;

use log::{error, info, warn};
use serde_json::{json, Value};

use gittools::app::App;
use gittools::platform;
use gittools::rpc_handler::handle_method;

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn respond(out: &mut impl Write, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", value)?;
    out.flush()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let data_dir = platform::get_data_dir();
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        error!("Cannot create data directory {}: {}", data_dir.display(), e);
        std::process::exit(1);
    }
    let db_path = platform::default_db_path();

    let mut app = match App::new(&db_path) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to open {}: {}", db_path.display(), e);
            std::process::exit(1);
        }
    };
    app.startup();
    let app = Mutex::new(app);
    info!("Sync storage at {}", db_path.display());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if respond(&mut out, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).is_err() {
        return;
    }

    let mut rate_limiter = RateLimiter::new(200);

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Err(e) => json!({"id": null, "error": format!("parse error: {}", e)}),
            Ok(req) => {
                let id = req.get("id").cloned().unwrap_or(Value::Null);
                if !rate_limiter.check() {
                    warn!("Rate limit exceeded");
                    json!({"id": id, "error": "rate limit exceeded"})
                } else {
                    let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
                    let params = req.get("params").cloned().unwrap_or(json!({}));
                    match handle_method(&app, method, &params) {
                        Ok(val) => json!({"id": id, "result": val}),
                        Err(err) => json!({"id": id, "error": err}),
                    }
                }
            }
        };

        if respond(&mut out, &response).is_err() {
            break;
        }
    }
}
