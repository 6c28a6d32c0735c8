//! Notifications from the emulator to its host.
//!
//! An observer is handed to [`crate::Scheduler::new`] and owned by that emulator from then on.

use std::sync::mpsc::Sender;

use crate::error::Fault;

/// Receives events as they happen. Every method does nothing by default
pub trait Observer: Send {
    /// A sprite was drawn; `collision` is the value written to VF
    fn on_draw(&mut self, _collision: bool) {}

    fn on_clear(&mut self) {}

    /// The sound timer went from zero to non-zero, or back
    fn on_sound(&mut self, _on: bool) {}

    /// Execution is suspended until a key press is stored in `register`
    fn on_key_wait(&mut self, _register: u8) {}

    /// The machine stopped, it won't run again until it is reset
    fn on_fault(&mut self, _fault: &Fault) {}
}

/// Ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {}

/// Writes every event to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_draw(&mut self, collision: bool) {
        log::trace!("draw, collision: {collision}");
    }

    fn on_clear(&mut self) {
        log::trace!("clear screen");
    }

    fn on_sound(&mut self, on: bool) {
        log::info!("sound {}", if on { "on" } else { "off" });
    }

    fn on_key_wait(&mut self, register: u8) {
        log::info!("waiting for a key press to store in V{register:X}");
    }

    fn on_fault(&mut self, fault: &Fault) {
        log::error!("{fault}");
    }
}

/// The events an [`Observer`] sees, as values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Draw { collision: bool },
    Clear,
    Sound { on: bool },
    KeyWait { register: u8 },
    Fault(Fault),
}

/// Forwards events to another thread. A receiver that hung up is not an error for the emulator
impl Observer for Sender<Event> {
    fn on_draw(&mut self, collision: bool) {
        let _ = self.send(Event::Draw { collision });
    }

    fn on_clear(&mut self) {
        let _ = self.send(Event::Clear);
    }

    fn on_sound(&mut self, on: bool) {
        let _ = self.send(Event::Sound { on });
    }

    fn on_key_wait(&mut self, register: u8) {
        let _ = self.send(Event::KeyWait { register });
    }

    fn on_fault(&mut self, fault: &Fault) {
        let _ = self.send(Event::Fault(*fault));
    }
}
