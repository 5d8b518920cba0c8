//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::watch;

use autocomply_monitor::config::{ApiConfig, HealthEndpoint};
use autocomply_monitor::health::{HealthProbe, HttpProbe, MonitorSnapshot, ProbeError};

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the request path and returns `(status, delay)`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, Duration)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]);
                        let path = request
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("/")
                            .to_string();

                        let (status, delay) = f(path).await;
                        tokio::time::sleep(delay).await;

                        let status_text = match status {
                            200 => "200 OK",
                            204 => "204 No Content",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                            status_text
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock backend that always answers with `status`.
pub async fn start_mock_backend(status: u16) -> SocketAddr {
    start_programmable_backend(move |_| async move { (status, Duration::ZERO) }).await
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn api_for(addr: SocketAddr) -> ApiConfig {
    ApiConfig {
        base_url: format!("http://{}", addr),
        origin: "http://127.0.0.1:8000".to_string(),
    }
}

/// HTTP probe that bypasses any system proxy.
pub fn probe_for(addr: SocketAddr, endpoint: HealthEndpoint) -> HttpProbe {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpProbe::with_client(client, &api_for(addr), endpoint)
}

/// One scripted probe answer.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub delay: Duration,
    pub ok: bool,
}

pub fn ok() -> Step {
    Step { delay: Duration::ZERO, ok: true }
}

pub fn fail() -> Step {
    Step { delay: Duration::ZERO, ok: false }
}

pub fn slow(delay: Duration, ok: bool) -> Step {
    Step { delay, ok }
}

/// Probe that plays back a script; the last step repeats once exhausted.
pub struct ScriptedProbe {
    script: Mutex<VecDeque<Step>>,
    last: Mutex<Step>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProbe {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        let script: VecDeque<Step> = steps.into_iter().collect();
        let last = script.back().copied().unwrap_or_else(fail);
        Self {
            script: Mutex::new(script),
            last: Mutex::new(last),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of `check` calls.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    fn next_step(&self) -> Step {
        let mut script = self.script.lock().unwrap();
        match script.pop_front() {
            Some(step) => {
                *self.last.lock().unwrap() = step;
                step
            }
            None => *self.last.lock().unwrap(),
        }
    }
}

impl HealthProbe for ScriptedProbe {
    async fn check(&self) -> Result<(), ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.next_step();
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        if step.ok {
            Ok(())
        } else {
            Err(ProbeError::Transport("scripted failure".into()))
        }
    }
}

/// Wait until the published snapshot satisfies `pred`.
pub async fn wait_until<F>(rx: &mut watch::Receiver<MonitorSnapshot>, pred: F) -> MonitorSnapshot
where
    F: FnMut(&MonitorSnapshot) -> bool,
{
    rx.wait_for(pred).await.expect("monitor released").clone()
}
