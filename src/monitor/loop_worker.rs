use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::session::{MonitorOutput, MonitoringSession};
use crate::motion::Sample;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Drive `session` from the sample channel until cancelled or the producer
/// hangs up. Every warm classification is forwarded on `outputs`. The session
/// is handed back so its state can be inspected or reused.
pub async fn monitor_loop(
    mut session: MonitoringSession,
    mut samples: mpsc::Receiver<Sample>,
    outputs: mpsc::Sender<MonitorOutput>,
    cancel_token: CancellationToken,
) -> MonitoringSession {
    session.start();

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("monitor loop shutting down");
                break;
            }
            next = samples.recv() => {
                let Some(sample) = next else {
                    log_info!("sample producer closed, monitor loop exiting");
                    break;
                };
                if let Some(output) = session.process_sample(sample) {
                    if let Some(alert) = &output.alert {
                        log_info!("alert {} raised for {}", alert.id, alert.kind.label());
                    }
                    tokio::select! {
                        biased;
                        _ = cancel_token.cancelled() => {
                            log_info!("monitor loop cancelled while forwarding output");
                            break;
                        }
                        sent = outputs.send(output) => {
                            if sent.is_err() {
                                log_warn!("output receiver dropped, monitor loop exiting");
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    session.stop();
    session
}
