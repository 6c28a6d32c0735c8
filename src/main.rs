use std::path::PathBuf;
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use blit8_emulator::constants::{CYCLES_PER_FRAME, DEFAULT_SEED, NUM_KEYS, TIMER_HZ};
use blit8_emulator::{Config, LogObserver, Quirks, RomBuffer, Scheduler};
use clap::Parser;

/// Runs a CHIP-8 rom without a window and prints the screen it ends on
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the rom file to run
    rom: PathBuf,

    #[arg(long, default_value_t = CYCLES_PER_FRAME, help = "Instructions per 60hz timer tick")]
    instructions_per_tick: usize,

    #[arg(long, default_value_t = 600, help = "Frames to run before printing the screen")]
    frames: u64,

    #[arg(long, default_value_t = DEFAULT_SEED, help = "Seed for the random number generator")]
    seed: u64,

    /// Sleep between frames so the rom runs at 60 frames per second
    #[arg(long)]
    realtime: bool,

    /// Keys to press, as comma separated frame:key pairs with the key in hex, e.g. "30:5,90:a".
    /// A key is held down for a single frame
    #[arg(long, value_delimiter = ',')]
    keys: Vec<KeyPress>,

    /// 8xy6 and 8xyE shift vy instead of vx
    #[arg(long)]
    quirk_shift_vy: bool,

    /// Fx55 and Fx65 move I past the registers they touch
    #[arg(long)]
    quirk_memory_i: bool,

    /// Bnnn jumps to nnn + vx, where x is the highest nibble of nnn
    #[arg(long)]
    quirk_jump_vx: bool,

    /// 8xy1, 8xy2 and 8xy3 clear VF
    #[arg(long)]
    quirk_logic_vf: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyPress {
    frame: u64,
    key: u8,
}

impl FromStr for KeyPress {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (frame, key) = s
            .split_once(':')
            .with_context(|| format!("expected frame:key, got {s:?}"))?;
        let frame = frame
            .trim()
            .parse()
            .with_context(|| format!("invalid frame in {s:?}"))?;
        let key = u8::from_str_radix(key.trim(), 16)
            .with_context(|| format!("invalid key in {s:?}"))?;
        if key >= NUM_KEYS {
            bail!("key {key:#X} is not on the keypad, keys go from 0 to F");
        }
        Ok(Self { frame, key })
    }
}

impl Args {
    fn config(&self) -> Config {
        Config::default()
            .with_instructions_per_tick(self.instructions_per_tick)
            .with_seed(self.seed)
            .with_quirks(Quirks {
                shift_reads_vy: self.quirk_shift_vy,
                memory_increments_i: self.quirk_memory_i,
                jump_reads_vx: self.quirk_jump_vx,
                logic_resets_vf: self.quirk_logic_vf,
            })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = RomBuffer::read(&args.rom)
        .with_context(|| format!("failed to load {}", args.rom.display()))?;
    if rom.is_empty() {
        log::warn!("{} is empty, the first fetch will fault", args.rom.display());
    }
    let mut scheduler = Scheduler::with_rom(&rom, args.config(), LogObserver);
    log::info!(
        "running {} ({} bytes) for {} frames",
        args.rom.display(),
        rom.len(),
        args.frames
    );

    let frame_time = Duration::from_secs(1) / TIMER_HZ;
    scheduler.start();
    for frame in 0..args.frames {
        let started = Instant::now();

        let pressed: Vec<u8> = args
            .keys
            .iter()
            .filter(|press| press.frame == frame)
            .map(|press| press.key)
            .collect();
        for &key in &pressed {
            scheduler.key_down(key);
        }

        if let Err(fault) = scheduler.run_frame() {
            println!("{}", scheduler.snapshot());
            return Err(fault).with_context(|| format!("stopped at frame {frame}"));
        }

        for &key in &pressed {
            scheduler.key_up(key);
        }

        if args.realtime {
            thread::sleep(frame_time.saturating_sub(started.elapsed()));
        }
    }

    println!("{}", scheduler.snapshot());
    Ok(())
}
