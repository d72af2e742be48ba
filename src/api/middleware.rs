use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use parking_lot::Mutex;

use crate::api::response::ApiError;
use crate::config::RateLimitConfig;

/// Fixed-window request budget per client address.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    /// Records one request from `client` at `now`; `false` once the budget
    /// of the current window is spent.
    pub fn check(&self, client: IpAddr, now: Instant) -> bool {
        let mut clients = self.clients.lock();

        // Drop expired windows so the map does not grow without bound.
        if clients.len() > 1024 {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = clients.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.max_requests {
            return false;
        }
        entry.count += 1;
        true
    }
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_ip(&request);
    if !limiter.check(client, Instant::now()) {
        log::warn!("Rate limit exceeded for {}", client);
        return ApiError::TooManyRequests.into_response();
    }
    next.run(request).await
}

/// Logs one line per request: method, path, status and latency.
pub async fn log_request(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = client_ip(&request);
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = started.elapsed();
    if status.is_server_error() {
        log::error!(
            "[{}] {} {} {} -> {} ({:.1?})",
            request_id,
            client,
            method,
            path,
            status,
            elapsed
        );
    } else {
        log::info!(
            "[{}] {} {} {} -> {} ({:.1?})",
            request_id,
            client,
            method,
            path,
            status,
            elapsed
        );
    }
    response
}
