//! Async driver: one tokio task per table.
//!
//! The task owns the [`TableRuntime`] and serializes everything through a
//! single loop: host commands arrive on an mpsc inbox and the earliest armed
//! timer is awaited with `sleep_until`. Commands win ties so a host action is
//! never overtaken by a timer that was armed for the state it replaces.

use std::sync::Arc;

use felt_engine::game::TableState;
use felt_engine::player::PlayerAction;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};

use crate::config::RuntimeConfig;
use crate::errors::RuntimeError;
use crate::events::EventSink;
use crate::runtime::{AutoplayPolicy, TableRuntime};

const COMMAND_BUFFER: usize = 100;

type Reply<T> = oneshot::Sender<Result<T, RuntimeError>>;

enum Command {
    BeginHand {
        reply: Reply<()>,
    },
    Act {
        seat: usize,
        action: PlayerAction,
        reply: Reply<()>,
    },
    SetSeatCpu {
        seat: usize,
        is_cpu: bool,
        reply: Reply<()>,
    },
    SetAutoplay {
        policy: AutoplayPolicy,
        reply: Reply<()>,
    },
    Snapshot {
        reply: oneshot::Sender<TableState>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle to a running table task.
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    sender: mpsc::Sender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Command::BeginHand { .. } => "BeginHand",
            Command::Act { .. } => "Act",
            Command::SetSeatCpu { .. } => "SetSeatCpu",
            Command::SetAutoplay { .. } => "SetAutoplay",
            Command::Snapshot { .. } => "Snapshot",
            Command::Shutdown { .. } => "Shutdown",
        };
        f.write_str(name)
    }
}

/// Build a runtime from `config` and start driving it. Must be called from
/// within a tokio runtime.
pub fn spawn_table(config: RuntimeConfig, sink: Arc<dyn EventSink>) -> Result<RuntimeHandle, RuntimeError> {
    let runtime = TableRuntime::new(config, sink)?;
    Ok(spawn_runtime(runtime))
}

pub fn spawn_runtime(runtime: TableRuntime) -> RuntimeHandle {
    let (sender, inbox) = mpsc::channel(COMMAND_BUFFER);
    tokio::spawn(run(runtime, inbox));
    RuntimeHandle { sender }
}

impl RuntimeHandle {
    pub async fn begin_hand(&self) -> Result<(), RuntimeError> {
        self.request(|reply| Command::BeginHand { reply }).await?
    }

    pub async fn act(&self, seat: usize, action: PlayerAction) -> Result<(), RuntimeError> {
        self.request(|reply| Command::Act { seat, action, reply })
            .await?
    }

    pub async fn set_seat_cpu(&self, seat: usize, is_cpu: bool) -> Result<(), RuntimeError> {
        self.request(|reply| Command::SetSeatCpu { seat, is_cpu, reply })
            .await?
    }

    pub async fn set_autoplay(&self, policy: AutoplayPolicy) -> Result<(), RuntimeError> {
        self.request(|reply| Command::SetAutoplay { policy, reply })
            .await?
    }

    pub async fn snapshot(&self) -> Result<TableState, RuntimeError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Dispose the runtime and wait for the task to stop. Shutting down an
    /// already stopped table is not an error.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        match self.request(|reply| Command::Shutdown { reply }).await {
            Ok(()) | Err(RuntimeError::Closed) => Ok(()),
            Err(err) => Err(err),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T, RuntimeError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| RuntimeError::Closed)?;
        response.await.map_err(|_| RuntimeError::Closed)
    }
}

async fn run(mut runtime: TableRuntime, mut inbox: mpsc::Receiver<Command>) {
    let table_id = runtime.id();
    tracing::info!(table_id = %table_id, "table task started");

    loop {
        let deadline = runtime.next_deadline();
        tokio::select! {
            biased;

            command = inbox.recv() => match command {
                Some(Command::Shutdown { reply }) => {
                    runtime.dispose();
                    let _ = reply.send(());
                    break;
                }
                Some(command) => handle(&mut runtime, command),
                None => {
                    runtime.dispose();
                    break;
                }
            },

            _ = sleep_until_deadline(deadline) => {
                runtime.fire_due(Instant::now());
            }
        }
    }

    tracing::info!(table_id = %table_id, "table task stopped");
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn handle(runtime: &mut TableRuntime, command: Command) {
    tracing::trace!(table_id = %runtime.id(), command = ?command, "command received");
    let now = Instant::now();
    match command {
        Command::BeginHand { reply } => {
            let _ = reply.send(runtime.begin_hand(now));
        }
        Command::Act { seat, action, reply } => {
            let result = runtime.act(seat, action, now);
            if let Err(err) = &result {
                tracing::debug!(table_id = %runtime.id(), seat, action = ?action, error = %err, "action rejected");
            }
            let _ = reply.send(result);
        }
        Command::SetSeatCpu { seat, is_cpu, reply } => {
            let _ = reply.send(runtime.set_seat_cpu(seat, is_cpu, now));
        }
        Command::SetAutoplay { policy, reply } => {
            let _ = reply.send(runtime.set_autoplay(policy, now));
        }
        Command::Snapshot { reply } => {
            let _ = reply.send(runtime.state().clone());
        }
        // handled by the loop
        Command::Shutdown { reply } => {
            runtime.dispose();
            let _ = reply.send(());
        }
    }
}
