use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info};

use crate::commands::executable::Executable;
use crate::commands::Command;
use crate::connection::Connection;
use crate::frame::{self, Frame};
use crate::store::Store;
use crate::Error;

/// Snapshot file read back on startup and rewritten on shutdown and on the
/// periodic timer, relative to the process working directory.
pub const SNAPSHOT_FILE: &str = "dump.my_rdb";

const SNAPSHOT_INTERVAL: Duration = Duration::from_secs(300);

pub async fn run(port: u16) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    let store = Arc::new(Mutex::new(Store::new()));

    match store.lock().unwrap().load(SNAPSHOT_FILE) {
        Ok(()) => info!("Loaded snapshot from {}", SNAPSHOT_FILE),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No snapshot at {}, starting empty", SNAPSHOT_FILE)
        }
        Err(e) => error!("Failed to load snapshot from {}: {}", SNAPSHOT_FILE, e),
    }

    info!("Server listening on {}", listener.local_addr()?);

    let snapshotter = tokio::spawn(periodic_snapshot(store.clone()));

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, client_address) = accepted?;
                let store = store.clone();
                info!("Accepted connection from {:?}", client_address);

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(socket, store).await {
                        error!("Connection error: {}", e);
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, shutting down");
                break;
            }
        }
    }

    // One final best-effort snapshot before the runtime (and any in-flight
    // handler tasks) are dropped.
    snapshotter.abort();
    snapshot(&store);

    Ok(())
}

async fn periodic_snapshot(store: Arc<Mutex<Store>>) {
    let mut interval = tokio::time::interval(SNAPSHOT_INTERVAL);
    // The first tick completes immediately; skip it so an empty store does
    // not clobber a snapshot we have just loaded.
    interval.tick().await;

    loop {
        interval.tick().await;
        snapshot(&store);
    }
}

fn snapshot(store: &Arc<Mutex<Store>>) {
    match store.lock().unwrap().dump(SNAPSHOT_FILE) {
        Ok(()) => info!("Database dumped to {}", SNAPSHOT_FILE),
        Err(e) => error!("Error dumping database to {}: {}", SNAPSHOT_FILE, e),
    }
}

/// Per-connection loop: requests are read, dispatched and answered strictly
/// in order. Malformed framing is answered with an error line and the read
/// buffer is discarded to resynchronise; only I/O failures end the loop.
async fn handle_connection(stream: TcpStream, store: Arc<Mutex<Store>>) -> Result<(), Error> {
    let mut conn = Connection::new(stream);

    loop {
        let frame = match conn.read_frame().await {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                if e.downcast_ref::<frame::Error>().is_some() {
                    conn.discard_input();
                    conn.write_frame(&Frame::Error(format!("Error: {}", e))).await?;
                    continue;
                }
                return Err(e);
            }
        };

        debug!("Received frame: {:?}", frame);

        let reply = match Command::try_from(frame) {
            Ok(cmd) => cmd.exec(store.clone())?,
            Err(e) => Frame::Error(e.to_string()),
        };

        debug!("Sending reply: {:?}", reply);
        conn.write_frame(&reply).await?;
    }

    info!("Connection closed");
    Ok(())
}
