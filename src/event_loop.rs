use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Receives everything the loop pumps: elapsed time and input events.
pub trait LoopHandler {
    /// Time until the handler next needs a tick, e.g. a pending click timer.
    fn next_deadline(&self) -> Option<Duration> {
        None
    }

    /// Called once per loop turn with the wall time since the previous turn.
    fn tick(&mut self, elapsed: Duration) -> io::Result<ControlFlow>;

    fn handle_event(&mut self, event: Event) -> io::Result<ControlFlow>;
}

/// The main UI loop.
///
/// Each turn ticks the handler (advancing timers and redrawing), then waits
/// for input no longer than the frame interval or the handler's next
/// deadline, whichever is sooner. Queued events are drained in one burst so
/// a fast drag does not fall behind the pointer.
pub struct EventLoop<D> {
    driver: D,
    frame_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, frame_interval: Duration) -> Self {
        Self {
            driver,
            frame_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn poll_timeout(&self, next_deadline: Option<Duration>) -> Duration {
        match next_deadline {
            Some(deadline) => deadline.min(self.frame_interval),
            None => self.frame_interval,
        }
    }

    pub fn run<H: LoopHandler>(&mut self, handler: &mut H) -> io::Result<()> {
        let mut last = Instant::now();
        loop {
            let now = Instant::now();
            let elapsed = now.duration_since(last);
            last = now;
            if handler.tick(elapsed)? == ControlFlow::Quit {
                return Ok(());
            }

            let timeout = self.poll_timeout(handler.next_deadline());
            if self.driver.poll(timeout)? {
                loop {
                    let event = self.driver.read()?;
                    if handler.handle_event(event)? == ControlFlow::Quit {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }
}
