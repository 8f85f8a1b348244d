//! Homing axis
//!
//! Pairs a stepper with its home sensor and executes the homing cycle
//! described by a [`HomingPlan`]:
//!
//! 1. Assert the seek direction
//! 2. Poll the sensor; while it is clear, emit one step and poll again
//! 3. On trigger, drive the pulse line low and wait out the debounce time
//! 4. Wait the settle time, then assert the offset direction
//! 5. Emit the fixed offset steps to reach the home position
//!
//! Each call to [`HomingAxis::update`] does one unit of that work, so the
//! caller can check for an interrupt between steps.

use embedded_hal::delay::DelayNs;

use miror_core::homing::{
    HomingError, HomingEvent, HomingFault, HomingPhase, HomingPlan, HomingReport,
};
use miror_core::traits::{HomeSensor, StepperDriver};

/// Outcome of one [`HomingAxis::update`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingProgress {
    /// Cycle not started
    Idle,
    /// Step taken, phase unchanged
    Running,
    /// Entered a new phase
    PhaseChanged(HomingPhase),
    /// Motor is at its home position
    Complete(HomingReport),
}

/// One motor with its home sensor
pub struct HomingAxis<S, H, D> {
    stepper: S,
    sensor: H,
    /// Delay used for debounce and settle waits
    delay: D,
    plan: HomingPlan,
    phase: HomingPhase,
    seek_steps: u32,
    offset_steps: u32,
    error: Option<HomingError>,
}

impl<S, H, D> HomingAxis<S, H, D>
where
    S: StepperDriver,
    H: HomeSensor,
    D: DelayNs,
{
    /// Create a new homing axis
    pub fn new(stepper: S, sensor: H, delay: D, plan: HomingPlan) -> Self {
        Self {
            stepper,
            sensor,
            delay,
            plan,
            phase: HomingPhase::Idle,
            seek_steps: 0,
            offset_steps: 0,
            error: None,
        }
    }

    /// Get current phase
    pub fn phase(&self) -> HomingPhase {
        self.phase
    }

    /// Get the plan this axis executes
    pub fn plan(&self) -> &HomingPlan {
        &self.plan
    }

    /// Progress so far
    pub fn report(&self) -> HomingReport {
        HomingReport {
            seek_steps: self.seek_steps,
            offset_steps: self.offset_steps,
            position: self.stepper.position(),
        }
    }

    /// Start the homing cycle
    ///
    /// Returns Err(Busy) if a cycle is already running.
    pub fn start(&mut self) -> Result<(), HomingError> {
        if self.phase.is_active() {
            return Err(HomingError::Busy);
        }

        self.seek_steps = 0;
        self.offset_steps = 0;
        self.error = None;

        self.phase = self.phase.transition(HomingEvent::Start);
        if let Err(e) = self.stepper.set_direction(self.plan.seek_direction) {
            self.fail(e.into());
            return Err(e.into());
        }
        Ok(())
    }

    /// Stop the cycle and leave the pulse line low
    pub fn abort(&mut self) {
        if self.phase.is_active() {
            self.fail(HomingError::Aborted);
        }
    }

    /// Do one unit of homing work
    ///
    /// # Returns
    /// * `Ok(Complete)` - Motor is home
    /// * `Ok(PhaseChanged)` / `Ok(Running)` - Cycle in progress
    /// * `Err` - Cycle failed; the pulse line has been driven low
    pub fn update(&mut self) -> Result<HomingProgress, HomingError> {
        let result = self.advance();
        if let Err(e) = result {
            if self.phase.is_active() {
                self.fail(e);
            }
        }
        result
    }

    /// Run the whole cycle
    ///
    /// `abort` is checked before every unit of work; `on_phase` is called
    /// with every phase entered, including the final one.
    pub fn home<A, P>(
        &mut self,
        mut abort: A,
        mut on_phase: P,
    ) -> Result<HomingReport, HomingError>
    where
        A: FnMut() -> bool,
        P: FnMut(HomingPhase),
    {
        self.start()?;
        on_phase(self.phase);

        loop {
            if abort() {
                self.abort();
                on_phase(self.phase);
                return Err(HomingError::Aborted);
            }

            match self.update() {
                Ok(HomingProgress::Complete(report)) => {
                    on_phase(self.phase);
                    return Ok(report);
                }
                Ok(HomingProgress::PhaseChanged(phase)) => on_phase(phase),
                Ok(HomingProgress::Running | HomingProgress::Idle) => {}
                Err(e) => {
                    on_phase(self.phase);
                    return Err(e);
                }
            }
        }
    }

    /// Hand back the stepper, sensor and delay
    pub fn into_parts(self) -> (S, H, D) {
        (self.stepper, self.sensor, self.delay)
    }

    fn advance(&mut self) -> Result<HomingProgress, HomingError> {
        match self.phase {
            HomingPhase::Idle => Ok(HomingProgress::Idle),

            HomingPhase::Seeking => {
                if self.sensor.is_triggered()? {
                    self.stepper.stop()?;
                    return Ok(self.enter(HomingEvent::SensorTriggered));
                }

                if !self.plan.may_seek(self.seek_steps) {
                    return Err(HomingError::SensorNotTriggered {
                        steps: self.seek_steps,
                    });
                }

                self.stepper.step()?;
                self.seek_steps = self.seek_steps.saturating_add(1);
                Ok(HomingProgress::Running)
            }

            HomingPhase::Debouncing => {
                self.delay.delay_ms(self.plan.debounce_ms);
                Ok(self.enter(HomingEvent::DebounceElapsed))
            }

            HomingPhase::Settling => {
                self.delay.delay_ms(self.plan.settle_ms);
                if self.plan.reverses() {
                    self.stepper.set_direction(self.plan.offset_direction)?;
                }
                Ok(self.enter(HomingEvent::SettleElapsed))
            }

            HomingPhase::Offsetting => {
                if self.offset_steps >= self.plan.offset_steps {
                    self.stepper.stop()?;
                    self.phase = self.phase.transition(HomingEvent::OffsetComplete);
                    return Ok(HomingProgress::Complete(self.report()));
                }

                self.stepper.step()?;
                self.offset_steps = self.offset_steps.saturating_add(1);
                Ok(HomingProgress::Running)
            }

            HomingPhase::Homed => Ok(HomingProgress::Complete(self.report())),

            HomingPhase::Failed(_) => Err(self.error.unwrap_or(HomingError::Aborted)),
        }
    }

    fn enter(&mut self, event: HomingEvent) -> HomingProgress {
        self.phase = self.phase.transition(event);
        HomingProgress::PhaseChanged(self.phase)
    }

    fn fail(&mut self, e: HomingError) {
        // Best effort: the line may be the thing that failed
        let _ = self.stepper.stop();
        let event = match e.fault() {
            HomingFault::Aborted => HomingEvent::Abort,
            HomingFault::SensorNotTriggered => HomingEvent::SeekLimitReached,
            HomingFault::Hardware => HomingEvent::HardwareFault,
        };
        self.error = Some(e);
        self.phase = self.phase.transition(event);
    }
}
