// Author: Dustin Pilgrim
// License: MIT

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::UnixStream,
    time::{timeout, Duration},
};

/// Per-step deadline for talking to the daemon. Replies come straight from
/// memory, so anything slower than this means the daemon is wedged, not busy.
const IO_TIMEOUT: Duration = Duration::from_secs(2);

/// Sends one wire command over the control socket and returns the raw reply.
pub async fn send_raw(cmd: &str) -> Result<String, String> {
    let path = crate::ipc::socket_path()?;

    if !path.exists() {
        return Err(format!(
            "daemon is not running (no socket at {})",
            path.display()
        ));
    }

    let mut stream = match timeout(IO_TIMEOUT, UnixStream::connect(&path)).await {
        Ok(Ok(s)) => s,
        Ok(Err(e)) => {
            return Err(format!(
                "could not reach the daemon at {}: {e}",
                path.display()
            ))
        }
        Err(_) => return Err("timed out connecting to the daemon".to_string()),
    };

    timeout(IO_TIMEOUT, stream.write_all(cmd.as_bytes()))
        .await
        .map_err(|_| "timed out sending the command".to_string())?
        .map_err(|e| format!("failed to send command: {e}"))?;

    // Half-close so the daemon sees end-of-command.
    timeout(IO_TIMEOUT, stream.shutdown())
        .await
        .map_err(|_| "timed out finishing the command".to_string())?
        .map_err(|e| format!("failed to finish command: {e}"))?;

    let mut reply = Vec::new();
    timeout(IO_TIMEOUT, stream.read_to_end(&mut reply))
        .await
        .map_err(|_| "timed out waiting for the daemon's reply".to_string())?
        .map_err(|e| format!("failed to read reply: {e}"))?;

    Ok(String::from_utf8_lossy(&reply).to_string())
}
