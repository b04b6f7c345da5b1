//! Background generation with progress events.
//!
//! [`submit`] runs the pipeline on a dedicated thread and streams
//! [`TaskEvent`]s over a channel. Exactly one terminal event
//! (`Completed` or `Failed`) ends every stream.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use stonegen_spec::GenerationParams;

use crate::error::GenerateError;
use crate::maps::MaterialMapSet;
use crate::pipeline::{generate_maps_with_cancel, CancelToken, PipelineState, ProgressSink};

/// Event emitted by a background generation.
#[derive(Debug)]
pub enum TaskEvent {
    Progress {
        stage: PipelineState,
        percent: u8,
        label: &'static str,
    },
    Completed(MaterialMapSet),
    Failed(GenerateError),
}

impl TaskEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskEvent::Progress { .. })
    }
}

struct ChannelSink {
    tx: Sender<TaskEvent>,
}

impl ProgressSink for ChannelSink {
    fn checkpoint(&mut self, stage: PipelineState, percent: u8, label: &'static str) {
        // A dropped receiver only means nobody is listening.
        let _ = self.tx.send(TaskEvent::Progress {
            stage,
            percent,
            label,
        });
    }
}

/// Handle to a running background generation.
pub struct TaskHandle {
    events: Receiver<TaskEvent>,
    cancel: CancelToken,
    thread: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Event stream for this task.
    pub fn events(&self) -> &Receiver<TaskEvent> {
        &self.events
    }

    /// Ask the task to stop at its next stage boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Block until the task finishes, discarding progress events.
    pub fn wait(mut self) -> Result<MaterialMapSet, GenerateError> {
        let result = loop {
            match self.events.recv() {
                Ok(TaskEvent::Progress { .. }) => continue,
                Ok(TaskEvent::Completed(maps)) => break Ok(maps),
                Ok(TaskEvent::Failed(err)) => break Err(err),
                Err(_) => {
                    break Err(GenerateError::ComputationFailure(
                        "generation thread exited without a result".into(),
                    ))
                }
            }
        };
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                return Err(GenerateError::ComputationFailure(
                    "generation thread panicked".into(),
                ));
            }
        }
        result
    }
}

/// Start generating `params` on a background thread.
pub fn submit(params: GenerationParams) -> Result<TaskHandle, GenerateError> {
    let (tx, rx) = unbounded();
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();

    let thread = thread::Builder::new()
        .name("stonegen-worker".into())
        .spawn(move || {
            let mut sink = ChannelSink { tx };
            let event = match generate_maps_with_cancel(&params, &mut sink, &worker_cancel) {
                Ok(output) => TaskEvent::Completed(output.maps),
                Err(err) => TaskEvent::Failed(err),
            };
            let _ = sink.tx.send(event);
        })?;

    Ok(TaskHandle {
        events: rx,
        cancel,
        thread: Some(thread),
    })
}
