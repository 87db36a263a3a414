use crate::{
    clamp_pick_count, pick_one, sample_unique, CandidateList, Clock, CopyError, DrawConfig,
    DrawError, DrawPorts, DrawState, Event, EventBus, HistoryLog, Notice, RngState, RosterInput,
};
use std::time::Instant;
use tracing::{debug, info, warn};

pub type DrawResult = Vec<String>;

/// Handle to an in-flight spin. The driver waits until `wake_at` and passes the ticket back
/// to [`DrawSession::resume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinTicket {
    generation: u64,
    wake_at: Instant,
}

impl SpinTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn wake_at(&self) -> Instant {
        self.wake_at
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.wake_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinStep {
    Continue,
    Revealed(DrawResult),
    Aborted,
}

#[derive(Debug)]
struct SpinTask {
    generation: u64,
    started_at: Instant,
    wake_at: Instant,
    snapshot: CandidateList,
    drawing: usize,
    frames: u32,
}

pub struct DrawSession<P: DrawPorts> {
    config: DrawConfig,
    rng: RngState,
    roster: RosterInput,
    requested: f64,
    state: DrawState,
    result: DrawResult,
    history: HistoryLog,
    spin_name: Option<String>,
    spin: Option<SpinTask>,
    generation: u64,
    events: EventBus,
    ports: P,
}

impl<P: DrawPorts> DrawSession<P> {
    pub fn new(config: DrawConfig, seed: u64, ports: P) -> Self {
        Self::with_rng(config, RngState::from_seed(seed), ports)
    }

    pub fn with_rng(config: DrawConfig, rng: RngState, ports: P) -> Self {
        let config = config.sanitized();
        let history = HistoryLog::with_cap(config.history_cap);
        let requested = config.default_count as f64;
        Self {
            config,
            rng,
            roster: RosterInput::default(),
            requested,
            state: DrawState::Idle,
            result: Vec::new(),
            history,
            spin_name: None,
            spin: None,
            generation: 0,
            events: EventBus::default(),
            ports,
        }
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn is_rolling(&self) -> bool {
        self.state.is_rolling()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn roster(&self) -> &RosterInput {
        &self.roster
    }

    pub fn candidates(&self) -> &CandidateList {
        self.roster.candidates()
    }

    pub fn set_raw_text(&mut self, text: impl Into<String>) {
        self.roster.set_raw_text(text);
    }

    pub fn push_char(&mut self, ch: char) {
        self.roster.push_char(ch);
    }

    pub fn pop_char(&mut self) -> Option<char> {
        self.roster.pop_char()
    }

    pub fn set_dedupe(&mut self, dedupe: bool) {
        self.roster.set_dedupe(dedupe);
    }

    pub fn load_roster(&mut self, name: &str, text: impl Into<String>) {
        self.roster.set_raw_text(text);
        info!(preset = name, candidates = self.roster.candidates().len(), "roster loaded");
        self.ports.notify(&Notice::PresetLoaded {
            name: name.to_string(),
        });
    }

    pub fn requested(&self) -> f64 {
        self.requested
    }

    pub fn set_requested(&mut self, requested: f64) {
        self.requested = requested;
    }

    pub fn result(&self) -> &[String] {
        &self.result
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn spin_name(&self) -> Option<&str> {
        self.spin_name.as_deref()
    }

    pub fn ports(&self) -> &P {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut P {
        &mut self.ports
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.events.drain()
    }

    pub fn request_draw(&mut self, now: Instant) -> Result<SpinTicket, DrawError> {
        if self.state.is_rolling() {
            debug!(generation = self.generation, "draw requested while rolling, ignored");
            return Err(DrawError::AlreadyRolling);
        }
        let snapshot = self.roster.candidates().clone();
        if snapshot.is_empty() {
            return Err(self.reject(DrawError::EmptyRoster, Notice::EmptyRoster));
        }
        if !self.requested.is_finite() || self.requested.floor() <= 0.0 {
            return Err(self.reject(DrawError::InvalidCount, Notice::InvalidCount));
        }

        let drawing = clamp_pick_count(self.requested, snapshot.len());
        if self.requested > snapshot.len() as f64 {
            info!(
                requested = self.requested,
                available = snapshot.len(),
                drawing,
                "draw count re-scoped to roster size"
            );
            self.ports.notify(&Notice::OverRequest {
                available: snapshot.len(),
                drawing,
            });
        }

        self.generation += 1;
        self.result.clear();
        self.ports.render_result(&self.result);
        self.state = DrawState::Rolling;
        self.events.push(Event::DrawStarted {
            generation: self.generation,
            candidates: snapshot.len(),
            requested: self.requested,
            drawing,
        });
        debug!(
            generation = self.generation,
            candidates = snapshot.len(),
            drawing,
            "spin started"
        );
        self.spin = Some(SpinTask {
            generation: self.generation,
            started_at: now,
            wake_at: now,
            snapshot,
            drawing,
            frames: 0,
        });
        Ok(SpinTicket {
            generation: self.generation,
            wake_at: now,
        })
    }

    /// Advances the spin after a wake. A ticket from before the last reset (or from an
    /// earlier draw) aborts without touching any state.
    pub fn resume(&mut self, ticket: &mut SpinTicket, now: Instant) -> SpinStep {
        let roll_duration = self.config.roll_duration();
        let frame = match self.spin.as_mut() {
            Some(task) if task.generation == ticket.generation => {
                if now < task.wake_at {
                    ticket.wake_at = task.wake_at;
                    return SpinStep::Continue;
                }
                let elapsed = now.saturating_duration_since(task.started_at);
                if elapsed >= roll_duration {
                    None
                } else {
                    // With replacement: the flashing name may repeat.
                    let name = pick_one(task.snapshot.names(), &mut self.rng).cloned();
                    task.wake_at = now + self.config.tick_after(elapsed);
                    task.frames += 1;
                    ticket.wake_at = task.wake_at;
                    Some((name, elapsed))
                }
            }
            _ => {
                debug!(
                    ticket = ticket.generation,
                    current = self.generation,
                    "stale spin ticket, aborting"
                );
                self.events.push(Event::SpinAborted {
                    generation: ticket.generation,
                });
                return SpinStep::Aborted;
            }
        };

        match frame {
            Some((name, elapsed)) => {
                self.ports.render_spin_frame(name.as_deref());
                if let Some(name) = &name {
                    self.events.push(Event::SpinFrame {
                        name: name.clone(),
                        elapsed_ms: elapsed.as_millis() as u64,
                    });
                }
                self.spin_name = name;
                SpinStep::Continue
            }
            None => self.finish_spin(),
        }
    }

    pub fn run_spin<C: Clock>(&mut self, mut ticket: SpinTicket, clock: &mut C) -> SpinStep {
        loop {
            clock.sleep_until(ticket.wake_at);
            match self.resume(&mut ticket, clock.now()) {
                SpinStep::Continue => continue,
                done => return done,
            }
        }
    }

    /// `Ok(None)` means the spin was aborted.
    pub fn drive<C: Clock>(&mut self, clock: &mut C) -> Result<Option<DrawResult>, DrawError> {
        let ticket = self.request_draw(clock.now())?;
        match self.run_spin(ticket, clock) {
            SpinStep::Revealed(result) => Ok(Some(result)),
            SpinStep::Continue | SpinStep::Aborted => Ok(None),
        }
    }

    pub fn reset(&mut self) {
        if let Some(task) = self.spin.take() {
            info!(
                generation = task.generation,
                frames = task.frames,
                "reset while rolling, spin cancelled"
            );
        }
        self.generation += 1;
        self.roster.clear();
        self.result.clear();
        self.history.clear();
        self.requested = self.config.default_count as f64;
        self.spin_name = None;
        self.state = DrawState::Idle;
        self.events.push(Event::SessionReset);
        self.ports.render_spin_frame(None);
        self.ports.render_result(&self.result);
        self.ports.notify(&Notice::ResetDone);
    }

    pub fn copy_result(&mut self) -> Result<(), CopyError> {
        if self.result.is_empty() {
            self.ports.notify(&Notice::NothingToCopy);
            return Err(CopyError::Empty);
        }
        let text = self.result.join("\n");
        match self.ports.copy_text(&text) {
            Ok(()) => {
                self.events.push(Event::ResultCopied {
                    lines: self.result.len(),
                });
                self.ports.notify(&Notice::Copied);
                Ok(())
            }
            Err(CopyError::Empty) => {
                self.ports.notify(&Notice::NothingToCopy);
                Err(CopyError::Empty)
            }
            Err(err) => {
                warn!(error = %err, "copy failed");
                self.events.push(Event::CopyFailed {
                    reason: err.to_string(),
                });
                self.ports.notify(&Notice::CopyFailed);
                Err(err)
            }
        }
    }

    fn finish_spin(&mut self) -> SpinStep {
        let Some(task) = self.spin.take() else {
            return SpinStep::Aborted;
        };
        let winners = sample_unique(task.snapshot.names(), task.drawing as i64, &mut self.rng);
        self.result = winners.clone();
        self.history.push(winners.clone());
        self.ports.render_result(&self.result);
        self.ports.celebrate(self.config.celebration_bursts);
        self.state = DrawState::Revealed;
        info!(
            generation = task.generation,
            frames = task.frames,
            winners = winners.len(),
            "draw revealed"
        );
        self.events.push(Event::DrawRevealed {
            generation: task.generation,
            winners: winners.clone(),
            frames: task.frames,
        });
        SpinStep::Revealed(winners)
    }

    fn reject(&mut self, err: DrawError, notice: Notice) -> DrawError {
        debug!(error = %err, "draw rejected");
        self.events.push(Event::rejected(&err));
        self.ports.notify(&notice);
        err
    }
}
