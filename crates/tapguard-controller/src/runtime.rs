//! The cooperative poll-and-react loop.
//!
//! Each [`ControlLoop::step`] reads the clock once, then:
//!
//! 1. ticks the controller for window expiry and flash frames
//! 2. polls the reader; a credential is handled by the controller, the
//!    reader session is released, the feedback is presented and a grant
//!    unlocks the door
//! 3. lets the presenter and the latch expire their timers
//!
//! [`ControlLoop::run`] repeats `step` on a fixed interval until the
//! shutdown future completes or a step fails.

use std::future::Future;

use tapguard_core::Clock;
use tapguard_hardware::{AudioDevice, ByteStore, CredentialReader, Indicator, LockActuator};
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use crate::config::{LoopConfig, as_millis};
use crate::controller::AccessController;
use crate::error::ControllerResult;
use crate::feedback::FeedbackEvent;
use crate::latch::DoorLatch;
use crate::presenter::FeedbackPresenter;

/// Wires a reader, the controller and the output drivers to a clock.
pub struct ControlLoop<R, S, I, A, L, C> {
    reader: R,
    controller: AccessController<S>,
    presenter: FeedbackPresenter<I, A>,
    latch: DoorLatch<L>,
    clock: C,
    config: LoopConfig,
}

impl<R, S, I, A, L, C> ControlLoop<R, S, I, A, L, C>
where
    R: CredentialReader,
    S: ByteStore,
    I: Indicator,
    A: AudioDevice,
    L: LockActuator,
    C: Clock,
{
    pub fn new(
        reader: R,
        controller: AccessController<S>,
        presenter: FeedbackPresenter<I, A>,
        lock: L,
        clock: C,
        config: LoopConfig,
    ) -> Self {
        let latch = DoorLatch::new(lock, as_millis(config.unlock_duration));
        Self {
            reader,
            controller,
            presenter,
            latch,
            clock,
            config,
        }
    }

    /// Engage the lock and show the ready state.
    pub fn start(&mut self) -> ControllerResult<()> {
        let now = self.clock.now_ms();
        self.latch.engage()?;
        self.presenter.present(FeedbackEvent::Ready, now)?;
        info!(
            store_size = self.controller.store().len(),
            capacity = self.controller.store().capacity(),
            "Access controller ready"
        );
        Ok(())
    }

    /// Run one poll-and-react cycle.
    ///
    /// Returns the event produced by a credential read, if one was read.
    pub fn step(&mut self) -> ControllerResult<Option<FeedbackEvent>> {
        let now = self.clock.now_ms();

        if let Some(event) = self.controller.tick(now) {
            self.presenter.present(event, now)?;
        }

        let handled = match self.reader.poll_for_credential()? {
            Some(id) => {
                let event = self.controller.handle_credential(id, now)?;
                self.reader.release_session()?;
                self.presenter.present(event, now)?;
                if event == FeedbackEvent::AccessGranted {
                    self.latch.release(now)?;
                }
                Some(event)
            }
            None => None,
        };

        self.presenter.update(now)?;
        self.latch.update(now)?;

        Ok(handled)
    }

    /// Start, then step every poll interval until `shutdown` resolves.
    ///
    /// The lock is engaged again before returning normally.
    ///
    /// # Errors
    ///
    /// The first failing step stops the loop and its error is returned.
    pub async fn run<F>(&mut self, shutdown: F) -> ControllerResult<()>
    where
        F: Future<Output = ()>,
    {
        self.start()?;

        let mut ticker = time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping control loop");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.step() {
                        error!(error = %e, "Control loop stopped");
                        return Err(e);
                    }
                }
            }
        }

        self.latch.engage()?;
        Ok(())
    }

    pub fn controller(&self) -> &AccessController<S> {
        &self.controller
    }

    pub fn presenter(&self) -> &FeedbackPresenter<I, A> {
        &self.presenter
    }

    pub fn latch(&self) -> &DoorLatch<L> {
        &self.latch
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }
}
