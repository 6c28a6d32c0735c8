use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::cpu::{Cpu, Step};
use crate::display::Framebuffer;
use crate::error::Fault;
use crate::instruction::Instruction;
use crate::observer::Observer;
use crate::registers::VF;
use crate::rombuffer::RomBuffer;

/// A scheduler shared between a thread that runs it and threads that feed it keys or read the
/// screen. Each operation holds the lock for its whole duration.
pub type SharedScheduler = Arc<Mutex<Scheduler>>;

/// Drives a [`Cpu`]: runs it in frames of a fixed number of instructions per timer tick, keeps
/// track of whether it is running, and tells an [`Observer`] what happened.
pub struct Scheduler {
    cpu: Cpu,
    config: Config,
    observer: Box<dyn Observer>,
    running: bool,
    fault: Option<Fault>,
}

impl Scheduler {
    /// A paused machine with empty program memory
    pub fn new(config: Config, observer: impl Observer + 'static) -> Self {
        Self {
            cpu: Cpu::new(&RomBuffer::default(), &config),
            config,
            observer: Box::new(observer),
            running: false,
            fault: None,
        }
    }

    pub fn with_rom(
        rom: &RomBuffer,
        config: Config,
        observer: impl Observer + 'static,
    ) -> Self {
        let mut scheduler = Self::new(config, observer);
        scheduler.cpu.reset(rom);
        scheduler
    }

    /// Loads `rom` and puts the machine back in its power on state, paused. A rom that does
    /// not fit is rejected before anything changes.
    pub fn reset(&mut self, rom: &[u8]) -> Result<(), Fault> {
        let rom = RomBuffer::try_from(rom)?;
        self.load(&rom);
        Ok(())
    }

    /// Same as [`Scheduler::reset`], with a rom that is already known to fit
    pub fn load(&mut self, rom: &RomBuffer) {
        let sound_was_on = self.cpu.sound_on();
        self.cpu.reset(rom);
        self.running = false;
        self.fault = None;
        if sound_was_on {
            self.observer.on_sound(false);
        }
    }

    /// Starts running. Does nothing after a fault, only a reset clears it
    pub fn start(&mut self) {
        if let Some(fault) = self.fault {
            log::warn!("not starting, the machine faulted: {fault}");
            return;
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Runs a single cycle, whether or not the machine is running. A fault stops the machine
    /// and is kept until the next reset; stepping again returns the same fault.
    pub fn step(&mut self) -> Result<Step, Fault> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }

        let sound_was_on = self.cpu.sound_on();
        match self.cpu.cycle() {
            Ok(step) => {
                if let Step::Executed(instruction) = step {
                    self.notify(&instruction, sound_was_on);
                }
                Ok(step)
            }
            Err(fault) => {
                log::warn!("{fault}");
                self.fault = Some(fault);
                self.running = false;
                self.observer.on_fault(&fault);
                Err(fault)
            }
        }
    }

    fn notify(&mut self, instruction: &Instruction, sound_was_on: bool) {
        match *instruction {
            Instruction::Draw { .. } => self.observer.on_draw(self.cpu.register(VF) == 1),
            Instruction::ClearScreen => self.observer.on_clear(),
            Instruction::WaitForKey { x } => self.observer.on_key_wait(x),
            _ => {}
        }
        let sound_on = self.cpu.sound_on();
        if sound_on != sound_was_on {
            self.observer.on_sound(sound_on);
        }
    }

    /// One frame: `instructions_per_tick` cycles followed by one timer tick. Returns the number
    /// of instructions executed, which is lower than asked for while waiting for a key.
    ///
    /// Does nothing while stopped. A fault ends the frame early and the timers do not tick.
    pub fn run_frame(&mut self) -> Result<usize, Fault> {
        if !self.running {
            return Ok(0);
        }

        let mut executed = 0;
        for _ in 0..self.config.instructions_per_tick {
            match self.step()? {
                Step::Executed(_) => executed += 1,
                Step::WaitingForKey => break,
            }
        }
        self.tick_timers();
        Ok(executed)
    }

    /// One 60hz tick of both timers, independent of instruction execution
    pub fn tick_timers(&mut self) {
        let sound_was_on = self.cpu.sound_on();
        self.cpu.tick_timers();
        if sound_was_on && !self.cpu.sound_on() {
            self.observer.on_sound(false);
        }
    }

    pub fn key_down(&mut self, key: u8) {
        self.cpu.set_key_state(key, true);
    }

    pub fn key_up(&mut self, key: u8) {
        self.cpu.set_key_state(key, false);
    }

    /// A copy of the screen, unaffected by anything that runs after it is taken
    pub fn snapshot(&self) -> Framebuffer {
        self.cpu.framebuffer()
    }

    pub fn delay(&self) -> u8 {
        self.cpu.delay_timer()
    }

    pub fn sound_on(&self) -> bool {
        self.cpu.sound_on()
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.cpu.waiting_for_key().is_some()
    }

    /// The fault that stopped the machine, if any
    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Wraps the scheduler for use from several threads
    pub fn shared(self) -> SharedScheduler {
        Arc::new(Mutex::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{Event, NullObserver};
    use std::sync::mpsc;

    fn scheduler(rom: &[u8]) -> Scheduler {
        let mut scheduler = Scheduler::new(Config::default(), NullObserver);
        scheduler.reset(rom).unwrap();
        scheduler
    }

    #[test]
    fn is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Scheduler>();
        assert_send::<SharedScheduler>();
    }

    #[test]
    fn starts_paused() {
        let mut scheduler = scheduler(&[0x12, 0x00]);
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.run_frame(), Ok(0));
        assert_eq!(scheduler.cpu().program_counter(), 0x200);
    }

    #[test]
    fn runs_a_frame_of_instructions() {
        // 0x200: add 1 to v0, 0x202: jump back
        let config = Config::default().with_instructions_per_tick(10);
        let mut scheduler = Scheduler::new(config, NullObserver);
        scheduler.reset(&[0x70, 0x01, 0x12, 0x00]).unwrap();
        scheduler.start();
        assert_eq!(scheduler.run_frame(), Ok(10));
        assert_eq!(scheduler.cpu().register(0), 5);
    }

    #[test]
    fn frame_ticks_the_timers_once() {
        let mut scheduler = scheduler(&[0x60, 0x0A, 0xF0, 0x15, 0x12, 0x04]);
        scheduler.start();
        scheduler.run_frame().unwrap();
        assert_eq!(scheduler.delay(), 9);
        scheduler.run_frame().unwrap();
        assert_eq!(scheduler.delay(), 8);
    }

    #[test]
    fn step_runs_while_stopped() {
        let mut scheduler = scheduler(&[0x60, 0x0A]);
        assert!(matches!(
            scheduler.step(),
            Ok(Step::Executed(Instruction::LoadRegister { x: 0, kk: 0x0A }))
        ));
        assert!(!scheduler.is_running());
    }

    #[test]
    fn reset_rejects_oversized_roms_without_changing_anything() {
        let mut scheduler = scheduler(&[0x60, 0x0A]);
        scheduler.step().unwrap();
        let too_big = vec![0; 4096];
        assert!(matches!(
            scheduler.reset(&too_big),
            Err(Fault::RomTooLarge { size: 4096, .. })
        ));
        assert_eq!(scheduler.cpu().program_counter(), 0x202);
        assert_eq!(scheduler.cpu().register(0), 0x0A);
    }

    #[test]
    fn fault_stops_the_machine_until_reset() {
        let (sender, receiver) = mpsc::channel();
        let mut scheduler = Scheduler::new(Config::default(), sender);
        scheduler.reset(&[0x00, 0xEE]).unwrap();
        scheduler.start();

        let fault = Fault::StackUnderflow { address: 0x200 };
        assert_eq!(scheduler.run_frame(), Err(fault));
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.fault(), Some(fault));
        assert_eq!(scheduler.step(), Err(fault));
        assert_eq!(receiver.try_recv(), Ok(Event::Fault(fault)));
        assert!(receiver.try_recv().is_err());

        scheduler.start();
        assert!(!scheduler.is_running());

        scheduler.reset(&[0x12, 0x00]).unwrap();
        assert_eq!(scheduler.fault(), None);
        scheduler.start();
        assert!(scheduler.is_running());
    }

    #[test]
    fn faulting_frame_does_not_tick_timers() {
        let mut scheduler = scheduler(&[0x60, 0x05, 0xF0, 0x15, 0xFF, 0xFF]);
        scheduler.start();
        assert!(scheduler.run_frame().is_err());
        assert_eq!(scheduler.delay(), 5);
    }

    #[test]
    fn frame_ends_early_while_waiting_for_a_key() {
        let mut scheduler = scheduler(&[0xF1, 0x0A, 0x12, 0x02]);
        scheduler.start();
        assert_eq!(scheduler.run_frame(), Ok(1));
        assert!(scheduler.is_waiting_for_key());
        assert_eq!(scheduler.run_frame(), Ok(0));

        scheduler.key_down(0x7);
        scheduler.key_up(0x7);
        assert!(!scheduler.is_waiting_for_key());
        assert_eq!(scheduler.cpu().register(1), 0x7);
        assert_eq!(scheduler.run_frame(), Ok(5));
    }

    #[test]
    fn notifies_observers() {
        // cls, draw the 0 glyph twice, set sound to 1, wait for a key
        let rom = [
            0x00, 0xE0, 0xD0, 0x05, 0xD0, 0x05, 0x61, 0x01, 0xF1, 0x18, 0xF2, 0x0A,
        ];
        let (sender, receiver) = mpsc::channel();
        let mut scheduler = Scheduler::new(Config::default().with_instructions_per_tick(6), sender);
        scheduler.reset(&rom).unwrap();
        scheduler.start();
        scheduler.run_frame().unwrap();

        let events: Vec<Event> = receiver.try_iter().collect();
        assert_eq!(
            events,
            vec![
                Event::Clear,
                Event::Draw { collision: false },
                Event::Draw { collision: true },
                Event::Sound { on: true },
                Event::KeyWait { register: 2 },
                Event::Sound { on: false },
            ]
        );
    }
}
