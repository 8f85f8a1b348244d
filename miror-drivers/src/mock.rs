//! Mock pins and delays for driver tests
//!
//! Output pins and the delay share one log so tests can check the exact
//! order of line changes and waits.

extern crate std;

use core::convert::Infallible;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// One recorded hardware operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Step(bool),
    Dir(bool),
    DelayNs(u32),
}

pub type Log = Rc<RefCell<Vec<Op>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

#[derive(Clone, Copy)]
pub enum Line {
    Step,
    Dir,
}

/// Output pin recording every level change
pub struct MockOut {
    line: Line,
    log: Log,
    high: bool,
}

impl MockOut {
    pub fn new(line: Line, log: &Log) -> Self {
        Self {
            line,
            log: log.clone(),
            high: false,
        }
    }

    fn record(&mut self, high: bool) {
        self.high = high;
        let op = match self.line {
            Line::Step => Op::Step(high),
            Line::Dir => Op::Dir(high),
        };
        self.log.borrow_mut().push(op);
    }
}

impl ErrorType for MockOut {
    type Error = Infallible;
}

impl OutputPin for MockOut {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true);
        Ok(())
    }
}

/// Output pin that always fails
pub struct BrokenOut;

#[derive(Debug)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl ErrorType for BrokenOut {
    type Error = PinFault;
}

impl OutputPin for BrokenOut {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(PinFault)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(PinFault)
    }
}

/// Delay recording requested waits
pub struct MockDelay {
    log: Log,
}

impl MockDelay {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Op::DelayNs(ns));
    }
}

/// Input pin that reads high once it has been polled `high_after` times
///
/// The poll counter is shared so tests can inspect it after handing the
/// pin to a driver.
pub struct MockIn {
    polls: Rc<Cell<u32>>,
    high_after: Option<u32>,
}

impl MockIn {
    pub fn new(high_after: Option<u32>) -> (Self, Rc<Cell<u32>>) {
        let polls = Rc::new(Cell::new(0));
        (
            Self {
                polls: polls.clone(),
                high_after,
            },
            polls,
        )
    }
}

impl ErrorType for MockIn {
    type Error = Infallible;
}

impl InputPin for MockIn {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let n = self.polls.get();
        self.polls.set(n + 1);
        Ok(self.high_after.map_or(false, |after| n >= after))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Count recorded rising edges on the step line
pub fn step_pulses(log: &Log) -> usize {
    log.borrow()
        .iter()
        .filter(|op| **op == Op::Step(true))
        .count()
}

/// Sum of all recorded delays in nanoseconds
pub fn total_delay_ns(log: &Log) -> u64 {
    log.borrow()
        .iter()
        .map(|op| match op {
            Op::DelayNs(ns) => *ns as u64,
            _ => 0,
        })
        .sum()
}
