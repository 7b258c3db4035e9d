//! Connection loop: one tokio task per accepted connection

use crate::api::http::{Request, Response};
use crate::api::routes::Router;
use crate::error::Result;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

pub async fn serve(listener: TcpListener, router: Arc<Router>) -> Result<()> {
    info!(addr = %listener.local_addr()?, "server listening");
    loop {
        let (stream, addr) = listener.accept().await?;
        debug!(%addr, "new connection");
        let router = router.clone();
        let span = tracing::info_span!("request", id = %Uuid::new_v4());
        tokio::spawn(handle_connection(stream, router).instrument(span));
    }
}

async fn handle_connection(mut stream: TcpStream, router: Arc<Router>) {
    let mut buffer = [0; 4096];

    let response = match stream.read(&mut buffer).await {
        Ok(size) => {
            let raw = String::from_utf8_lossy(&buffer[..size]);
            match Request::parse(&raw) {
                Some(request) => {
                    info!(method = %request.method, path = %request.path, "request");
                    router.handle(&request).await
                }
                None => Response::json(400, &serde_json::json!({"message": "Bad Request"})),
            }
        }
        Err(e) => {
            warn!("failed to read from stream: {}", e);
            return;
        }
    };

    if let Err(e) = stream.write_all(response.to_http().as_bytes()).await {
        warn!("failed to write response: {}", e);
    }
}
