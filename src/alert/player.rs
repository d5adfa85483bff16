use rodio::{OutputStream, Sink};
use std::sync::{
    mpsc::{self, Sender},
    Mutex,
};
use std::thread::{self, JoinHandle};

use super::tone::AlarmTone;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

/// Something that can sound the alarm pattern. The alert trigger only talks
/// to this trait, so detection can run without an audio device.
pub trait AlarmPlayer: Send + Sync {
    fn name(&self) -> &str;

    /// Start the alarm pattern, replacing any pattern still playing.
    fn play_alarm(&self) -> Result<(), String>;

    /// Silence any pattern in progress. Must succeed when nothing is playing.
    fn stop(&self) -> Result<(), String>;
}

enum AudioCommand {
    PlayAlarm(Sender<Result<(), String>>),
    Stop,
    Shutdown,
}

/// Plays the alarm through the default output device.
///
/// rodio's output stream is not `Send`, so a dedicated thread owns it and is
/// driven over a channel. The thread starts on first use and is shut down and
/// joined when the handle is dropped.
pub struct AlertSoundHandle {
    tx: Mutex<Option<Sender<AudioCommand>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AlertSoundHandle {
    pub fn new() -> Self {
        Self {
            tx: Mutex::new(None),
            worker: Mutex::new(None),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<AudioCommand>, String> {
        let mut tx_guard = self.tx.lock().map_err(|e| e.to_string())?;
        if let Some(tx) = tx_guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();

        let worker = thread::Builder::new()
            .name("alert-audio".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn open_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<(), String> {
                    let (s, handle) = OutputStream::try_default()
                        .map_err(|e| format!("Failed to create audio output stream: {}", e))?;
                    let new_sink = Sink::try_new(&handle)
                        .map_err(|e| format!("Failed to create audio sink: {}", e))?;
                    *stream = Some(s);
                    *sink = Some(new_sink);
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AudioCommand::PlayAlarm(reply) => {
                            if let Some(old) = sink.take() {
                                old.stop();
                            }
                            let result = open_sink(&mut _stream, &mut sink).map(|_| {
                                if let Some(ref s) = sink {
                                    s.append(AlarmTone::new());
                                    s.play();
                                }
                            });
                            let _ = reply.send(result);
                        }
                        AudioCommand::Stop => {
                            if let Some(old) = sink.take() {
                                old.stop();
                            }
                            _stream = None;
                        }
                        AudioCommand::Shutdown => {
                            if let Some(old) = sink.take() {
                                old.stop();
                            }
                            break;
                        }
                    }
                }
            })
            .map_err(|e| e.to_string())?;

        *self.worker.lock().map_err(|e| e.to_string())? = Some(worker);
        *tx_guard = Some(tx.clone());
        Ok(tx)
    }

    /// Stop the audio thread and wait for it to release the output device.
    pub fn shutdown(&self) {
        let tx = match self.tx.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let worker = match self.worker.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(tx) = tx {
            if let Err(err) = tx.send(AudioCommand::Shutdown) {
                log_error!("Failed to send shutdown to audio thread: {err}");
            }
        }
        if let Some(handle) = worker {
            if let Err(join_err) = handle.join() {
                log_error!("Failed to join audio thread: {join_err:?}");
            } else {
                log_info!("alert audio released");
            }
        }
    }
}

impl Default for AlertSoundHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmPlayer for AlertSoundHandle {
    fn name(&self) -> &str {
        "rodio"
    }

    fn play_alarm(&self) -> Result<(), String> {
        let tx = self.ensure_thread()?;
        let (reply_tx, reply_rx) = mpsc::channel();
        tx.send(AudioCommand::PlayAlarm(reply_tx))
            .map_err(|e| e.to_string())?;
        reply_rx
            .recv()
            .map_err(|e| format!("audio thread exited: {}", e))?
    }

    fn stop(&self) -> Result<(), String> {
        if let Ok(Some(tx)) = self.tx.lock().map(|g| g.clone()) {
            let _ = tx.send(AudioCommand::Stop);
        }
        Ok(())
    }
}

impl Drop for AlertSoundHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
