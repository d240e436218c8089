//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;
    use crate::controller::events::LoadGeneration;

    fn load(generation: u64) -> BackendCommand {
        BackendCommand::LoadDeck {
            generation: LoadGeneration(generation),
            count: 15,
        }
    }

    #[test]
    fn queues_until_full() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, load(1), &mut status));
        assert!(!dispatch_backend_command(&tx, load(2), &mut status));
        assert!(status.contains("queue is full"));
        assert!(matches!(
            rx.try_recv(),
            Ok(BackendCommand::LoadDeck {
                generation: LoadGeneration(1),
                ..
            })
        ));
    }

    #[test]
    fn reports_disconnected_backend() {
        let (tx, rx) = bounded(4);
        drop(rx);
        let mut status = String::new();
        assert!(!dispatch_backend_command(&tx, load(1), &mut status));
        assert!(status.contains("disconnected"));
    }
}
