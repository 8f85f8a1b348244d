//! Pulse/direction stepper driver
//!
//! Drives an external stepper driver (DM542, TB6600, A4988...) with two
//! GPIO lines: every rising edge on the pulse line is one step, the level
//! of the direction line selects the rotation direction.
//!
//! Pulses are shaped in software as a symmetric square wave: the line is
//! held high for `step_delay_us`, then low for `step_delay_us`. Accuracy
//! is whatever the delay provider gives; nothing here compensates for
//! scheduling jitter.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use miror_core::traits::{Direction, HwError, StepperDriver};

/// Pulse/direction stepper
pub struct StepDirStepper<STEP, DIR, D> {
    step: STEP,
    dir: DIR,
    delay: D,
    /// Half period of the step square wave
    step_delay_us: u32,
    direction: Direction,
    /// Signed step count
    position: i32,
}

impl<STEP, DIR, D> StepDirStepper<STEP, DIR, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    D: DelayNs,
{
    /// Create a new stepper
    ///
    /// Both lines are driven low, so the motor starts out stopped with
    /// the counter-clockwise direction asserted.
    pub fn new(step: STEP, dir: DIR, delay: D, step_delay_us: u32) -> Result<Self, HwError> {
        let mut stepper = Self {
            step,
            dir,
            delay,
            step_delay_us,
            direction: Direction::CounterClockwise,
            position: 0,
        };
        stepper.step.set_low().map_err(|_| HwError::StepLine)?;
        stepper.dir.set_low().map_err(|_| HwError::DirectionLine)?;
        Ok(stepper)
    }

    /// Drive the pulse line low and hand back the pins and delay
    pub fn release(mut self) -> Result<(STEP, DIR, D), HwError> {
        self.stop()?;
        Ok((self.step, self.dir, self.delay))
    }
}

impl<STEP, DIR, D> StepperDriver for StepDirStepper<STEP, DIR, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    D: DelayNs,
{
    fn set_direction(&mut self, dir: Direction) -> Result<(), HwError> {
        let result = if dir.is_high() {
            self.dir.set_high()
        } else {
            self.dir.set_low()
        };
        result.map_err(|_| HwError::DirectionLine)?;
        self.direction = dir;
        Ok(())
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn step(&mut self) -> Result<(), HwError> {
        self.step.set_high().map_err(|_| HwError::StepLine)?;
        self.delay.delay_us(self.step_delay_us);
        self.step.set_low().map_err(|_| HwError::StepLine)?;
        self.delay.delay_us(self.step_delay_us);
        self.position = self.position.wrapping_add(self.direction.step_delta());
        Ok(())
    }

    fn stop(&mut self) -> Result<(), HwError> {
        self.step.set_low().map_err(|_| HwError::StepLine)
    }

    fn position(&self) -> i32 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;
    use crate::mock::{new_log, step_pulses, BrokenOut, Line, MockDelay, MockOut, Op};

    #[test]
    fn test_new_drives_lines_low() {
        let log = new_log();
        let stepper = StepDirStepper::new(
            MockOut::new(Line::Step, &log),
            MockOut::new(Line::Dir, &log),
            MockDelay::new(&log),
            1000,
        )
        .unwrap();

        assert_eq!(*log.borrow(), vec![Op::Step(false), Op::Dir(false)]);
        assert_eq!(stepper.direction(), Direction::CounterClockwise);
        assert_eq!(stepper.position(), 0);
    }

    #[test]
    fn test_step_is_square_wave() {
        let log = new_log();
        let mut stepper = StepDirStepper::new(
            MockOut::new(Line::Step, &log),
            MockOut::new(Line::Dir, &log),
            MockDelay::new(&log),
            1000,
        )
        .unwrap();
        log.borrow_mut().clear();

        stepper.step().unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                Op::Step(true),
                Op::DelayNs(1_000_000),
                Op::Step(false),
                Op::DelayNs(1_000_000),
            ]
        );
    }

    #[test]
    fn test_position_follows_direction() {
        let log = new_log();
        let mut stepper = StepDirStepper::new(
            MockOut::new(Line::Step, &log),
            MockOut::new(Line::Dir, &log),
            MockDelay::new(&log),
            10,
        )
        .unwrap();

        stepper.set_direction(Direction::Clockwise).unwrap();
        for _ in 0..5 {
            stepper.step().unwrap();
        }
        assert_eq!(stepper.position(), 5);

        stepper.set_direction(Direction::CounterClockwise).unwrap();
        for _ in 0..2 {
            stepper.step().unwrap();
        }
        assert_eq!(stepper.position(), 3);
        assert_eq!(step_pulses(&log), 7);
    }

    #[test]
    fn test_position_wraps() {
        let log = new_log();
        let mut stepper = StepDirStepper::new(
            MockOut::new(Line::Step, &log),
            MockOut::new(Line::Dir, &log),
            MockDelay::new(&log),
            10,
        )
        .unwrap();
        stepper.set_direction(Direction::Clockwise).unwrap();
        stepper.position = i32::MAX;

        stepper.step().unwrap();
        assert_eq!(stepper.position(), i32::MIN);
    }

    #[test]
    fn test_direction_line_levels() {
        let log = new_log();
        let mut stepper = StepDirStepper::new(
            MockOut::new(Line::Step, &log),
            MockOut::new(Line::Dir, &log),
            MockDelay::new(&log),
            10,
        )
        .unwrap();
        log.borrow_mut().clear();

        stepper.set_direction(Direction::Clockwise).unwrap();
        stepper.set_direction(Direction::CounterClockwise).unwrap();

        assert_eq!(*log.borrow(), vec![Op::Dir(true), Op::Dir(false)]);
    }

    #[test]
    fn test_release_drives_pulse_low() {
        let log = new_log();
        let stepper = StepDirStepper::new(
            MockOut::new(Line::Step, &log),
            MockOut::new(Line::Dir, &log),
            MockDelay::new(&log),
            10,
        )
        .unwrap();
        log.borrow_mut().clear();

        let (_step, _dir, _delay) = stepper.release().unwrap();
        assert_eq!(*log.borrow(), vec![Op::Step(false)]);
    }

    #[test]
    fn test_broken_step_line() {
        let log = new_log();
        let result = StepDirStepper::new(
            BrokenOut,
            MockOut::new(Line::Dir, &log),
            MockDelay::new(&log),
            10,
        );
        assert!(matches!(result, Err(HwError::StepLine)));
    }

    #[test]
    fn test_broken_direction_line() {
        let log = new_log();
        let result = StepDirStepper::new(
            MockOut::new(Line::Step, &log),
            BrokenOut,
            MockDelay::new(&log),
            10,
        );
        assert!(matches!(result, Err(HwError::DirectionLine)));
    }
}
