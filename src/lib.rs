/*!

An emulated paper tape reader that feeds decimal digit pulses to a processor emulator
at the speed of the real device.

# Tape file driver

To watch a tape being read, run `cargo run --release -- <tape>...`.
Every digit on the tape is printed as it arrives, and each line ends where the reader sends a finish pulse.
Pass `--fast` to use the optical reader instead of the mechanical one.

# Keyboard frontend

`cargo run --release --bin keyboard_frontend` turns the keyboard into the tape source.
Typed digits are read back at reader speed, Enter ends a line and Esc switches the reader off.

# Library

The processor asks for one pulse at a time and gets it through a callback.
A pulse is either a digit in `0..=9` or a finish pulse, which the processor sees as `-1`.

```rust
use std::cell::RefCell;
use std::rc::Rc;
use tape_reader::config::Speed;
use tape_reader::reader::Reader;

let mut reader = Reader::new();
let pulses = Rc::new(RefCell::new(Vec::new()));

reader.append("12\r\n");
for _ in 0..3 {
    let pulses = pulses.clone();
    reader.read(Speed::Optical, move |pulse| pulses.borrow_mut().push(pulse.value()));
    reader.run_until_idle(); // Let the virtual clock run until the pulse arrives
}

assert_eq!(*pulses.borrow(), vec![1, 2, -1]);
```

A read issued before any tape is loaded is held, and answered as soon as tape arrives.

```rust
use std::cell::Cell;
use std::rc::Rc;
use tape_reader::config::Speed;
use tape_reader::reader::Reader;

let mut reader = Reader::new();
let pulse = Rc::new(Cell::new(None));

let slot = pulse.clone();
reader.read(Speed::Mechanical, move |p| slot.set(Some(p.value())));
reader.run_until_idle();
assert_eq!(pulse.get(), None);

reader.append("9");
reader.run_until_idle();
assert_eq!(pulse.get(), Some(9));
```

## Custom timing

`Reader::new()` runs on a `ManualScheduler`, whose clock only moves when told to.
To follow the wall clock, or your own emulator's clock, implement `Scheduler` and hand it over.

```ignore
use tape_reader::config::ReaderConfig;
use tape_reader::reader::Reader;

let mut reader = Reader::with_scheduler(MyScheduler::new(), ReaderConfig::default());
```

Call `Reader::tick()` from your main loop to deliver the pulses that are due.
*/

pub mod config;
pub mod reader;
