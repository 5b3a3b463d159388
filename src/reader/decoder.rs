use std::fmt;

/// A single pulse sent from the reader to the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pulse {
    Digit(u8),
    Finish,
}

impl Pulse {
    /// The integer the processor sees, `-1` for a finish pulse.
    pub fn value(self) -> i8 {
        match self {
            Pulse::Digit(d) => d as i8,
            Pulse::Finish => -1,
        }
    }
}

impl From<Pulse> for i8 {
    fn from(pulse: Pulse) -> i8 {
        pulse.value()
    }
}

impl fmt::Display for Pulse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pulse::Digit(d) => write!(f, "{}", d),
            Pulse::Finish => write!(f, "finish"),
        }
    }
}

/// What one decode step found on the tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Digit(u8),
    /// A CR, LF or CR LF.
    EndOfLine,
    /// The tape ran out before anything else was found.
    Exhausted,
}

impl Decoded {
    pub fn pulse(self) -> Pulse {
        match self {
            Decoded::Digit(d) => Pulse::Digit(d),
            Decoded::EndOfLine | Decoded::Exhausted => Pulse::Finish,
        }
    }
}

/// Scan `tape` from `cursor` up to and including the next pulse.
///
/// Returns what was found and the cursor just past it. Characters that are
/// neither digits nor line delimiters are skipped.
pub fn decode(tape: &[char], cursor: usize) -> (Decoded, usize) {
    let mut cursor = cursor;
    while let Some(&c) = tape.get(cursor) {
        cursor += 1;
        match c {
            '0'..='9' => return (Decoded::Digit(c as u8 - b'0'), cursor),
            '\r' => {
                if tape.get(cursor) == Some(&'\n') {
                    cursor += 1;
                }
                return (Decoded::EndOfLine, cursor);
            }
            '\n' => return (Decoded::EndOfLine, cursor),
            other => log::trace!("Skipping {:?}", other),
        }
    }

    (Decoded::Exhausted, cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test_case("0" => (Decoded::Digit(0), 1) ; "zero")]
    #[test_case("9" => (Decoded::Digit(9), 1) ; "nine")]
    #[test_case("\r" => (Decoded::EndOfLine, 1) ; "carriage return")]
    #[test_case("\n" => (Decoded::EndOfLine, 1) ; "line feed")]
    #[test_case("\r\n" => (Decoded::EndOfLine, 2) ; "crlf is one pulse")]
    #[test_case("\n\r" => (Decoded::EndOfLine, 1) ; "lfcr is two pulses")]
    #[test_case("#5" => (Decoded::Digit(5), 2) ; "leading junk is skipped")]
    #[test_case("A:z~7" => (Decoded::Digit(7), 5) ; "characters above nine are skipped")]
    #[test_case("é3" => (Decoded::Digit(3), 2) ; "non ascii is skipped")]
    #[test_case("" => (Decoded::Exhausted, 0) ; "empty tape")]
    #[test_case("abc" => (Decoded::Exhausted, 3) ; "only junk")]
    fn decode_from_start(text: &str) -> (Decoded, usize) {
        decode(&chars(text), 0)
    }

    #[test]
    fn decode_stops_after_one_pulse() {
        let tape = chars("12\r\n3");
        let mut cursor = 0;
        let mut found = Vec::new();
        loop {
            let (decoded, next) = decode(&tape, cursor);
            found.push(decoded);
            cursor = next;
            if decoded == Decoded::Exhausted {
                break;
            }
        }
        assert_eq!(
            found,
            vec![
                Decoded::Digit(1),
                Decoded::Digit(2),
                Decoded::EndOfLine,
                Decoded::Digit(3),
                Decoded::Exhausted
            ]
        );
    }

    #[test]
    fn cursor_past_end_is_exhausted() {
        assert_eq!(decode(&chars("1"), 1), (Decoded::Exhausted, 1));
    }

    #[test]
    fn finish_pulses_share_a_value() {
        assert_eq!(Decoded::EndOfLine.pulse().value(), -1);
        assert_eq!(Decoded::Exhausted.pulse().value(), -1);
        assert_eq!(i8::from(Pulse::Digit(4)), 4);
    }
}
