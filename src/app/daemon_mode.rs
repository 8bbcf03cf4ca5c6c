// Author: Dustin Pilgrim
// License: MIT

use std::io;

use crate::daemon::Daemon;
use crate::{pinfo, pwarn};

use crate::cli::Args;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub async fn run(args: Args) -> Result<(), AnyError> {
    // single-instance
    let _instance_lock = crate::app::platform::acquire_single_instance_lock().map_err(|e| {
        eprintln!("{e}");
        io::Error::new(io::ErrorKind::AlreadyExists, e)
    })?;

    crate::log::set_verbose(args.verbose);

    // The session keeps counting without idle detection, so a missing Wayland
    // session is only worth a warning.
    if let Err(e) = crate::app::platform::wayland_available() {
        pwarn!("wayland", "{}", e);
    }

    pinfo!("daemon", "perch starting, log at {}", crate::log::log_path().display());

    let settings_path = crate::config::default_settings_path();
    pinfo!("config", "settings at {}", settings_path.display());
    let store = crate::config::FileStore::open(settings_path);

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let (mut daemon, _status_rx) = Daemon::new(Box::new(store));

    let mut daemon_task = tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move { daemon.run(shutdown_rx, shutdown_tx).await }
    });

    tokio::select! {
        res = &mut daemon_task => {
            match res {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e),
                Err(join_err) => Err(Box::new(join_err) as AnyError),
            }?;
            Ok(())
        }

        _ = tokio::signal::ctrl_c() => {
            pinfo!("daemon", "received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);

            match daemon_task.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e),
                Err(join_err) => Err(Box::new(join_err)),
            }
        }
    }
}
