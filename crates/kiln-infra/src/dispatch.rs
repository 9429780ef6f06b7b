// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Running a device on its own thread.
//!
//! A rendering device is bound to the thread that owns the native context. The
//! [`RenderThread`] builds the device on a dedicated thread and executes closures
//! sent through a [`RenderCommandSender`] in submission order. Other threads never
//! touch the device directly.

use std::thread;

use kiln_core::renderer::RenderError;

type Command<G> = Box<dyn FnOnce(&mut G) + Send>;

enum Message<G> {
    Run(Command<G>),
    Shutdown,
}

/// A cloneable handle for submitting work to a [`RenderThread`].
pub struct RenderCommandSender<G> {
    sender: flume::Sender<Message<G>>,
}

impl<G> Clone for RenderCommandSender<G> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<G: 'static> RenderCommandSender<G> {
    /// Queues `command` to run on the render thread without waiting for it.
    ///
    /// ## Errors
    /// * `RenderError::Dispatch` - If the render thread has stopped.
    pub fn execute<F>(&self, command: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut G) + Send + 'static,
    {
        self.sender
            .send(Message::Run(Box::new(command)))
            .map_err(|_| RenderError::Dispatch("render thread has stopped".to_string()))
    }

    /// Runs `command` on the render thread and waits for its result.
    ///
    /// ## Errors
    /// * `RenderError::Dispatch` - If the render thread stopped before answering.
    pub fn call<F, R>(&self, command: F) -> Result<R, RenderError>
    where
        F: FnOnce(&mut G) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = flume::bounded(1);
        self.execute(move |device| {
            let _ = reply_tx.send(command(device));
        })?;
        reply_rx
            .recv()
            .map_err(|_| RenderError::Dispatch("render thread dropped the reply".to_string()))
    }
}

/// A thread that owns a rendering device and runs submitted commands on it.
pub struct RenderThread<G> {
    sender: flume::Sender<Message<G>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl<G: 'static> RenderThread<G> {
    /// Spawns the render thread and builds the device on it with `factory`.
    ///
    /// Returns once the device exists, so a failing factory is reported here.
    ///
    /// ## Arguments
    /// * `name` - The thread name.
    /// * `factory` - Builds the device. Runs on the new thread.
    /// ## Errors
    /// * `RenderError::Dispatch` - If the thread could not be spawned.
    /// * Any error returned by `factory`.
    pub fn spawn<F>(name: &str, factory: F) -> Result<Self, RenderError>
    where
        F: FnOnce() -> Result<G, RenderError> + Send + 'static,
    {
        let (sender, receiver) = flume::unbounded::<Message<G>>();
        let (ready_tx, ready_rx) = flume::bounded::<Result<(), RenderError>>(1);

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let mut device = match factory() {
                    Ok(device) => {
                        let _ = ready_tx.send(Ok(()));
                        device
                    }
                    Err(err) => {
                        log::error!("Render thread failed to create its device: {err}");
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                log::info!("Render thread started.");

                while let Ok(message) = receiver.recv() {
                    match message {
                        Message::Run(command) => command(&mut device),
                        Message::Shutdown => break,
                    }
                }
                log::info!("Render thread stopped.");
            })
            .map_err(|e| RenderError::Dispatch(format!("failed to spawn render thread: {e}")))?;

        let ready = ready_rx
            .recv()
            .map_err(|_| RenderError::Dispatch("render thread exited during startup".to_string()))
            .and_then(|result| result);
        if let Err(err) = ready {
            let _ = handle.join();
            return Err(err);
        }

        Ok(Self {
            sender,
            handle: Some(handle),
        })
    }

    /// Returns a handle for submitting commands.
    pub fn sender(&self) -> RenderCommandSender<G> {
        RenderCommandSender {
            sender: self.sender.clone(),
        }
    }

    /// Runs every command queued so far, stops the thread and joins it.
    ///
    /// ## Errors
    /// * `RenderError::Dispatch` - If the thread panicked.
    pub fn shutdown(mut self) -> Result<(), RenderError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<(), RenderError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let _ = self.sender.send(Message::Shutdown);
        handle
            .join()
            .map_err(|_| RenderError::Dispatch("render thread panicked".to_string()))
    }
}

impl<G> Drop for RenderThread<G> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.sender.send(Message::Shutdown);
            let _ = handle.join();
        }
    }
}
