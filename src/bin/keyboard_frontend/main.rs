use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use structopt::StructOpt;

use tape_reader::config::{ReaderConfig, Speed};
use tape_reader::reader::decoder::Pulse;
use tape_reader::reader::scheduler::RealTimeScheduler;
use tape_reader::reader::Reader;

mod key_buffer;
mod key_manager;
use crossterm::event::KeyCode;
use crossterm::terminal;
use key_manager::KeyManager;

const IDLE: Duration = Duration::from_millis(50);

/// The program options.
#[derive(StructOpt)]
struct Opt {
    /// Read with the optical reader instead of the mechanical one
    #[structopt(short, long)]
    fast: bool,
}

fn main() -> std::io::Result<()> {
    pretty_env_logger::init();

    let opt = Opt::from_args();
    let speed = Speed::from(opt.fast);

    terminal::enable_raw_mode().map_err(terminal_error)?;
    let mut reader = Reader::with_scheduler(RealTimeScheduler::new(), ReaderConfig::default());
    reader.on_shutdown(|| {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("Could not restore the terminal: {}", e);
        }
    });

    let key_manager = KeyManager::new();
    let received = Rc::new(Cell::new(None));
    let mut waiting = false;

    print!("Type digits, Enter ends a line, Esc switches the reader off.\r\n");
    io::stdout().flush()?;

    while !reader.is_shut_down() {
        // The processor always has a read outstanding
        if !waiting {
            let slot = received.clone();
            reader.read(speed, move |pulse| slot.set(Some(pulse)));
            waiting = true;
        }

        let timeout = reader
            .scheduler()
            .next_deadline()
            .map_or(IDLE, |deadline| deadline.saturating_duration_since(Instant::now()).min(IDLE));

        let mut text = String::new();
        for key in key_manager.keys(timeout) {
            if key == KeyCode::Esc {
                reader.shut_down();
                break;
            }
            if let Some(c) = key_to_char(key) {
                text.push(c);
            }
        }
        if reader.is_shut_down() {
            break;
        }

        if !text.is_empty() {
            reader.append(&text);
        }
        reader.tick();

        if let Some(pulse) = received.take() {
            waiting = false;
            match pulse {
                Pulse::Digit(d) => print!("{}", d),
                Pulse::Finish => print!("\r\n"),
            }
            io::stdout().flush()?;
        }
    }

    Ok(())
}

/// The tape character punched for a key, if any.
fn key_to_char(key: KeyCode) -> Option<char> {
    match key {
        KeyCode::Char(c) => Some(c),
        KeyCode::Enter => Some('\r'),
        KeyCode::Tab => Some('\t'),
        _ => None,
    }
}

fn terminal_error(e: crossterm::ErrorKind) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_punches_carriage_return() {
        assert_eq!(key_to_char(KeyCode::Enter), Some('\r'));
        assert_eq!(key_to_char(KeyCode::Char('7')), Some('7'));
        assert_eq!(key_to_char(KeyCode::Left), None);
    }
}
