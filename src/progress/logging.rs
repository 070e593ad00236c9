//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, error, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { root, modules } => {
                info!(root = %root, modules, "Starting generation");
            }
            ProgressEvent::PhaseStarted { phase } => {
                info!(phase = %phase, "Starting phase");
            }
            ProgressEvent::PhaseComplete { phase, duration } => {
                info!(
                    phase = %phase,
                    duration_ms = duration.as_millis(),
                    "Phase complete"
                );
            }
            ProgressEvent::ModuleComplete {
                phase,
                module,
                index,
                total,
            } => {
                debug!(
                    phase = %phase,
                    module = %module,
                    progress = format!("{}/{}", index, total),
                    "Module complete"
                );
            }
            ProgressEvent::ModuleFailed {
                phase,
                module,
                error,
            } => {
                warn!(phase = %phase, module = %module, error = %error, "Module failed, continuing");
            }
            ProgressEvent::Completed {
                modules,
                failures,
                total_time,
            } => {
                if *failures > 0 {
                    warn!(
                        modules,
                        failures,
                        total_time_ms = total_time.as_millis(),
                        "Generation complete with failures"
                    );
                } else {
                    info!(
                        modules,
                        total_time_ms = total_time.as_millis(),
                        "Generation complete"
                    );
                }
            }
            ProgressEvent::Failed { error } => {
                error!(error = %error, "Generation failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_logging_handler_accepts_every_event() {
        let handler = LoggingHandler;
        let events = vec![
            ProgressEvent::Started {
                root: "/repo".to_string(),
                modules: 2,
            },
            ProgressEvent::ModuleFailed {
                phase: "build".to_string(),
                module: "lib".to_string(),
                error: "boom".to_string(),
            },
            ProgressEvent::Completed {
                modules: 2,
                failures: 1,
                total_time: Duration::from_millis(10),
            },
            ProgressEvent::Failed {
                error: "fatal".to_string(),
            },
        ];

        for event in &events {
            handler.on_progress(event);
        }
    }
}
