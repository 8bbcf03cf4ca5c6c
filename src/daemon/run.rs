// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::{mpsc, watch};

use std::sync::Arc;

use crate::core::{events::Event, msg::TimerMsg};
use crate::services::idle::{IdleSensor, SharedIdleState};
use crate::{perror, pinfo, pwarn};

use super::{AnyError, Daemon};

impl Daemon {
    pub async fn run(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Result<(), AnyError> {
        pinfo!("daemon", "starting");

        let (tx, mut rx) = mpsc::channel::<TimerMsg>(256);

        if let Err(e) = crate::ipc::server::spawn_ipc_server(tx.clone()).await {
            pwarn!("ipc", "failed to start: {}", e);
        }

        // Idle sensor: shared clock fed by the Wayland monitor. If Wayland is
        // unavailable the sensor stays "unknown" and the timer simply never
        // auto-idles.
        let idle = SharedIdleState::new(crate::services::wayland::IDLE_TIMEOUT_MS as f64 / 1000.0);

        tokio::spawn({
            let idle = idle.clone();
            let shutdown = shutdown.clone();
            async move {
                if let Err(e) = crate::services::wayland::run_wayland(idle, shutdown).await {
                    pwarn!("wayland", "idle monitor unavailable: {}", e);
                }
            }
        });

        let sensor: Arc<dyn IdleSensor + Send + Sync> = Arc::new(idle);
        tokio::spawn(crate::services::ticker::run_ticker(tx.clone(), sensor));

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        pinfo!("daemon", "stopping (shutdown requested)");
                        break;
                    }
                }

                maybe = rx.recv() => {
                    let Some(msg) = maybe else {
                        pinfo!("daemon", "stopping (event channel closed)");
                        break;
                    };

                    match msg {
                        TimerMsg::Event(Event::Tick { now, idle }) => {
                            self.timer.tick(now, idle);
                        }

                        TimerMsg::Command { cmd, reply } => {
                            let out = self.apply_command(cmd);
                            if reply.send(out).is_err() {
                                perror!("daemon", "command reply dropped");
                            }
                        }

                        TimerMsg::GetStatus { reply } => {
                            let _ = reply.send(self.snapshot());
                        }

                        TimerMsg::StopDaemon { reply } => {
                            pinfo!("daemon", "stopping (stop requested via IPC)");
                            let _ = reply.send("Stopping perch daemon".to_string());
                            let _ = shutdown_tx.send(true);
                            break;
                        }
                    }

                    self.publish();
                }
            }
        }

        Ok(())
    }
}
