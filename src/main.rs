use std::cell::Cell;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use structopt::StructOpt;

use tape_reader::config::{ReaderConfig, Speed};
use tape_reader::reader::decoder::Pulse;
use tape_reader::reader::scheduler::RealTimeScheduler;
use tape_reader::reader::{Reader, ReaderState};

const POLL: Duration = Duration::from_millis(50);

/// Read tapes the way the processor would, printing every pulse.
#[derive(StructOpt, Debug)]
#[structopt(name = "tape-reader")]
struct Opt {
    /// Read with the optical reader instead of the mechanical one
    #[structopt(short, long)]
    fast: bool,

    /// Milliseconds per character on the mechanical reader
    #[structopt(long, default_value = "100")]
    mechanical_ms: u64,

    /// Microseconds per character on the optical reader
    #[structopt(long, default_value = "1850")]
    optical_us: u64,

    /// Tapes to load, in order
    #[structopt(parse(from_os_str), required = true)]
    input: Vec<PathBuf>,
}

fn main() -> std::io::Result<()> {
    env_logger::init();

    let opt = Opt::from_args();
    let config = ReaderConfig::new(
        Duration::from_millis(opt.mechanical_ms),
        Duration::from_micros(opt.optical_us),
    );
    let speed = Speed::from(opt.fast);

    let mut reader = Reader::with_scheduler(RealTimeScheduler::new(), config);
    for path in &opt.input {
        log::info!("Loading {:?}", path);
        let data = std::fs::read(path)?;
        reader.append(&String::from_utf8_lossy(&data));
    }

    // A held read would never be answered
    if reader.state() == ReaderState::Empty {
        log::warn!("Nothing to read");
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let received = Rc::new(Cell::new(None));

    // Keep reading until the reader runs out of tape
    loop {
        let slot = received.clone();
        reader.read(speed, move |pulse| slot.set(Some(pulse)));

        let pulse = loop {
            reader.scheduler().wait(POLL);
            reader.tick();
            if let Some(pulse) = received.take() {
                break pulse;
            }
        };

        match pulse {
            Pulse::Digit(d) => write!(out, "{}", d)?,
            Pulse::Finish => writeln!(out)?,
        }
        out.flush()?;

        if reader.state() == ReaderState::Empty {
            break;
        }
    }

    Ok(())
}
