use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
    sync::{mpsc, oneshot},
    time::{timeout, Duration},
};

use crate::core::events::Command;
use crate::core::msg::TimerMsg;
use crate::{pdebug, perror};

/// Binds the control socket and spawns the accept loop. Connections carry one
/// plain-text command and get one plain-text (or JSON) reply.
pub async fn spawn_ipc_server(tx: mpsc::Sender<TimerMsg>) -> Result<(), String> {
    let path = crate::ipc::socket_path()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }

    // A previous run may have left the socket behind.
    if path.exists() {
        let _ = std::fs::remove_file(&path);
    }

    let listener = UnixListener::bind(&path)
        .map_err(|e| format!("failed to bind {}: {e}", path.display()))?;

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut stream, _addr)) => {
                    let tx = tx.clone();

                    tokio::spawn(async move {
                        let result = timeout(Duration::from_secs(10), async {
                            if let Err(e) = handle_connection(&mut stream, tx).await {
                                perror!("ipc", "error handling connection: {}", e);
                            }
                        })
                        .await;

                        if result.is_err() {
                            perror!("ipc", "connection timed out after 10 seconds");
                        }

                        let _ = stream.shutdown().await;
                    });
                }
                Err(e) => perror!("ipc", "failed to accept connection: {}", e),
            }
        }
    });

    Ok(())
}

/// Handles a single IPC connection
async fn handle_connection(
    stream: &mut UnixStream,
    tx: mpsc::Sender<TimerMsg>,
) -> std::io::Result<()> {
    let mut buf = vec![0u8; 256];
    let n = stream.read(&mut buf).await?;

    if n == 0 {
        return Ok(());
    }

    let cmd = String::from_utf8_lossy(&buf[..n]).trim().to_string();

    if !cmd.contains("--json") {
        pdebug!("ipc", "received command: {}", cmd);
    }

    let response = dispatch(&cmd, tx).await;

    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    Ok(())
}

/// Routes one wire command to the daemon task and renders the reply.
async fn dispatch(cmd: &str, tx: mpsc::Sender<TimerMsg>) -> String {
    match parse_request(cmd) {
        Ok(Request::Status { json }) => {
            let (reply, rx) = oneshot::channel();
            if tx.send(TimerMsg::GetStatus { reply }).await.is_err() {
                return "ERROR: daemon is shutting down".to_string();
            }
            match rx.await {
                Ok(snapshot) => {
                    if json {
                        serde_json::to_string(&snapshot.bar_info())
                            .unwrap_or_else(|e| format!("ERROR: {e}"))
                    } else {
                        snapshot.pretty()
                    }
                }
                Err(_) => "ERROR: daemon did not answer".to_string(),
            }
        }

        Ok(Request::Command(cmd)) => {
            let (reply, rx) = oneshot::channel();
            if tx.send(TimerMsg::Command { cmd, reply }).await.is_err() {
                return "ERROR: daemon is shutting down".to_string();
            }
            rx.await
                .unwrap_or_else(|_| "ERROR: daemon did not answer".to_string())
        }

        Ok(Request::Stop) => {
            let (reply, rx) = oneshot::channel();
            if tx.send(TimerMsg::StopDaemon { reply }).await.is_err() {
                return "ERROR: daemon is shutting down".to_string();
            }
            rx.await
                .unwrap_or_else(|_| "Stopping perch daemon".to_string())
        }

        Err(e) => e,
    }
}

enum Request {
    Status { json: bool },
    Command(Command),
    Stop,
}

/// Wire-command grammar. Parse failures produce `ERROR:` strings; the timer
/// itself never rejects anything.
fn parse_request(cmd: &str) -> Result<Request, String> {
    let mut parts = cmd.split_whitespace();
    let head = parts.next().unwrap_or("");

    match head {
        "status" => Ok(Request::Status {
            json: parts.any(|p| p == "--json"),
        }),

        "start" => Ok(Request::Command(Command::Start)),
        "pause" => Ok(Request::Command(Command::Pause)),
        "reset" => Ok(Request::Command(Command::Reset)),

        "fast-forward" => {
            let seconds = parse_arg::<i64>(parts.next(), "fast-forward <seconds>")?;
            Ok(Request::Command(Command::FastForward { seconds }))
        }

        "set-thresholds" => {
            let yellow = parse_arg::<u64>(parts.next(), "set-thresholds <yellow> <red>")?;
            let red = parse_arg::<u64>(parts.next(), "set-thresholds <yellow> <red>")?;
            Ok(Request::Command(Command::SetThresholds { yellow, red }))
        }

        "set-idle-reset" => {
            let seconds = parse_arg::<u64>(parts.next(), "set-idle-reset <seconds>")?;
            Ok(Request::Command(Command::SetIdleReset { seconds }))
        }

        "simulate-idle" => match parts.next() {
            Some("on") => Ok(Request::Command(Command::SimulateIdle { on: true })),
            Some("off") => Ok(Request::Command(Command::SimulateIdle { on: false })),
            _ => Err("ERROR: Usage: simulate-idle on|off".to_string()),
        },

        "stop" => Ok(Request::Stop),

        _ => Err(format!("ERROR: Unknown command '{cmd}'")),
    }
}

fn parse_arg<T: std::str::FromStr>(arg: Option<&str>, usage: &str) -> Result<T, String> {
    arg.and_then(|s| s.parse().ok())
        .ok_or_else(|| format!("ERROR: Usage: {usage}"))
}
