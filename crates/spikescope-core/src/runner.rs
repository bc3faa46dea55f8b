//! Playback loop runner.
//!
//! [`run_playback`] is the top-level async function that drives the
//! engine through an entire recorded spike stream: it walks the events
//! in order, advances the clock to each event's timestamp (rendering
//! one frame per tick along the way), and inserts the event into the
//! active set on arrival. The run ends when the stream is exhausted or
//! when a tick observes a quit request; there is no pause/resume.

use tracing::{info, warn};

use crate::catalog::NeuronCatalog;
use crate::control::{ControlSurface, Pacer};
use crate::engine::{EngineError, FrameSink, PlaybackEngine, TickFlow};
use crate::types::SpikeEvent;

/// Errors that can occur during the playback run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// An engine tick failed.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: EngineError,
    },
}

/// Why the playback run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Every recorded spike was replayed.
    SourceExhausted,
    /// The user asked to quit. Not an error.
    UserQuit,
}

/// Result of a playback run.
#[derive(Debug)]
pub struct PlaybackResult {
    /// Why the run ended.
    pub end_reason: EndReason,
    /// Total frames presented.
    pub frames_rendered: u64,
    /// Simulated time when the run ended.
    pub final_time: f64,
}

/// Replay a recorded spike stream to completion.
///
/// `events` must be ordered by non-decreasing time; the loaders enforce
/// this. The engine transitions `Initializing -> Running` on entry and
/// `Running -> Terminated` on every exit path. An empty stream
/// terminates immediately with zero frames rendered.
///
/// # Errors
///
/// Returns [`RunnerError::Engine`] when a tick fails (frame sink
/// failure or clock overflow). All failures are fatal for the run.
pub async fn run_playback(
    engine: &mut PlaybackEngine,
    events: &[SpikeEvent],
    catalog: &NeuronCatalog,
    sink: &mut dyn FrameSink,
    control: &mut dyn ControlSurface,
    pacer: &mut dyn Pacer,
) -> Result<PlaybackResult, RunnerError> {
    engine.mark_running();
    info!(
        events = events.len(),
        neurons = catalog.len(),
        start_time = engine.current_time(),
        "Playback starting"
    );

    for event in events {
        let flow = engine
            .advance_to(event.time, catalog, sink, control, pacer)
            .await;
        match flow {
            Ok(TickFlow::Reached) => engine.observe_spike(*event),
            Ok(TickFlow::Interrupted) => {
                info!(time = engine.current_time(), "Quit requested");
                engine.mark_terminated();
                return Ok(PlaybackResult {
                    end_reason: EndReason::UserQuit,
                    frames_rendered: engine.frames_rendered(),
                    final_time: engine.current_time(),
                });
            }
            Err(source) => {
                engine.mark_terminated();
                return Err(source.into());
            }
        }
    }

    engine.mark_terminated();
    Ok(PlaybackResult {
        end_reason: EndReason::SourceExhausted,
        frames_rendered: engine.frames_rendered(),
        final_time: engine.current_time(),
    })
}

/// Log the playback end summary.
pub fn log_playback_end(result: &PlaybackResult) {
    info!(
        reason = ?result.end_reason,
        frames_rendered = result.frames_rendered,
        final_time = result.final_time,
        "Playback ended"
    );

    if result.frames_rendered == 0 {
        warn!("Playback ended with no frames rendered");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::control::{ControlSurface, Directive, NoopControl, NoopPacer};
    use crate::engine::tests::{test_catalog, RecordingSink};
    use crate::engine::EnginePhase;
    use crate::types::NeuronId;

    fn test_engine() -> PlaybackEngine {
        PlaybackEngine::from_parts(0.0, 1e-4, 10e-4, 0.1).unwrap()
    }

    #[tokio::test]
    async fn empty_source_terminates_with_zero_frames() {
        let mut engine = test_engine();
        let catalog = test_catalog(4);
        let mut sink = RecordingSink::new();
        let mut control = NoopControl;
        let mut pacer = NoopPacer;

        assert_eq!(engine.phase(), EnginePhase::Initializing);
        let result = run_playback(
            &mut engine,
            &[],
            &catalog,
            &mut sink,
            &mut control,
            &mut pacer,
        )
        .await
        .unwrap();

        assert_eq!(result.end_reason, EndReason::SourceExhausted);
        assert_eq!(result.frames_rendered, 0);
        assert!(sink.frames.is_empty());
        assert_eq!(engine.phase(), EnginePhase::Terminated);
    }

    #[tokio::test]
    async fn replays_stream_to_exhaustion() {
        let mut engine = test_engine();
        let catalog = test_catalog(4);
        let mut sink = RecordingSink::new();
        let mut control = NoopControl;
        let mut pacer = NoopPacer;

        let events = [
            SpikeEvent::new(NeuronId::new(0), 0.0),
            SpikeEvent::new(NeuronId::new(1), 0.0002),
            SpikeEvent::new(NeuronId::new(2), 0.0002),
            SpikeEvent::new(NeuronId::new(3), 0.0005),
        ];
        let result = run_playback(
            &mut engine,
            &events,
            &catalog,
            &mut sink,
            &mut control,
            &mut pacer,
        )
        .await
        .unwrap();

        assert_eq!(result.end_reason, EndReason::SourceExhausted);
        // Ticks ran up to (not including) the last event time.
        assert_eq!(result.frames_rendered, 5);
        assert_eq!(engine.phase(), EnginePhase::Terminated);
        // All four spikes were observed (flash outlasts the run here).
        assert_eq!(engine.active().len(), 4);
    }

    #[tokio::test]
    async fn quit_request_ends_run_as_user_quit() {
        struct StopOnSecondPoll {
            polls: u32,
        }
        impl ControlSurface for StopOnSecondPoll {
            fn poll(&mut self) -> Directive {
                self.polls += 1;
                if self.polls >= 2 {
                    Directive::Stop
                } else {
                    Directive::Continue
                }
            }
        }

        let mut engine = test_engine();
        let catalog = test_catalog(4);
        let mut sink = RecordingSink::new();
        let mut control = StopOnSecondPoll { polls: 0 };
        let mut pacer = NoopPacer;

        let events = [SpikeEvent::new(NeuronId::new(0), 0.001)];
        let result = run_playback(
            &mut engine,
            &events,
            &catalog,
            &mut sink,
            &mut control,
            &mut pacer,
        )
        .await
        .unwrap();

        assert_eq!(result.end_reason, EndReason::UserQuit);
        assert_eq!(result.frames_rendered, 2);
        assert_eq!(engine.phase(), EnginePhase::Terminated);
    }

    #[tokio::test]
    async fn unknown_neuron_terminates_with_error() {
        let mut engine = test_engine();
        // Catalog covers neurons 0..2 but the stream references 7.
        let catalog = test_catalog(2);
        let mut sink = RecordingSink::new();
        let mut control = NoopControl;
        let mut pacer = NoopPacer;

        let events = [
            SpikeEvent::new(NeuronId::new(7), 0.0),
            SpikeEvent::new(NeuronId::new(0), 0.001),
        ];
        let result = run_playback(
            &mut engine,
            &events,
            &catalog,
            &mut sink,
            &mut control,
            &mut pacer,
        )
        .await;

        assert!(matches!(result, Err(RunnerError::Engine { .. })));
        assert_eq!(engine.phase(), EnginePhase::Terminated);
    }
}
