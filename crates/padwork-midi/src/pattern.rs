//! Arpeggio pitch sequencing.
//!
//! Held notes are sorted ascending and expanded over the octave range
//! (octave-major: every base note at +0, then every base note at +12, ...).
//! Each repeat boundary consumes one step of the sequence.

use padwork_core::ArpPattern;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

pub const MAX_NOTE: u8 = 127;

/// A pitch held on the grid together with the velocity it was struck with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeldNote {
    pub note: u8,
    pub velocity: u8,
}

impl HeldNote {
    pub fn new(note: u8, velocity: u8) -> Self {
        Self { note, velocity }
    }
}

pub type NoteBatch = SmallVec<[HeldNote; 8]>;

/// Build the ascending pitch sequence for `held`, skipping pitches above 127.
pub fn pitch_sequence(held: &[HeldNote], octave_range: u8) -> SmallVec<[HeldNote; 16]> {
    let mut base: NoteBatch = held.iter().copied().collect();
    base.sort_by_key(|n| n.note);
    base.dedup_by_key(|n| n.note);

    let mut sequence = SmallVec::new();
    for octave in 0..=octave_range as u16 {
        for held in &base {
            let pitch = held.note as u16 + 12 * octave;
            if pitch <= MAX_NOTE as u16 {
                sequence.push(HeldNote::new(pitch as u8, held.velocity));
            }
        }
    }
    sequence
}

/// Steps through the sequence, one call per boundary.
#[derive(Debug)]
pub struct Arpeggiator {
    step: usize,
    rng: StdRng,
}

impl Arpeggiator {
    pub fn new(seed: u64) -> Self {
        Self {
            step: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Restart from the first step (on ARMED -> RUNNING).
    pub fn reset(&mut self) {
        self.step = 0;
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Pitches to strike on the next boundary.
    pub fn next_notes(
        &mut self,
        pattern: ArpPattern,
        held: &[HeldNote],
        octave_range: u8,
    ) -> NoteBatch {
        let mut out = NoteBatch::new();
        if held.is_empty() {
            return out;
        }

        if pattern == ArpPattern::All {
            let octave = (self.step % (octave_range as usize + 1)) as u16;
            for held in held {
                let pitch = held.note as u16 + 12 * octave;
                if pitch <= MAX_NOTE as u16 {
                    out.push(HeldNote::new(pitch as u8, held.velocity));
                }
            }
            if out.is_empty() {
                out.extend(held.iter().copied().filter(|n| n.note <= MAX_NOTE));
            }
            out.sort_by_key(|n| n.note);
        } else {
            let sequence = pitch_sequence(held, octave_range);
            let len = sequence.len();
            if len == 0 {
                return out;
            }
            let index = match pattern {
                ArpPattern::Up => self.step % len,
                ArpPattern::Down => len - 1 - self.step % len,
                ArpPattern::UpDown => ping_pong(self.step, len),
                ArpPattern::Random => self.rng.gen_range(0..len),
                ArpPattern::All => 0,
            };
            out.push(sequence[index]);
        }

        self.step = self.step.wrapping_add(1);
        out
    }
}

/// 0, 1, .., len-1, len-2, .., 1, 0, 1, ..
fn ping_pong(step: usize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let cycle = 2 * len - 2;
    let pos = step % cycle;
    if pos < len {
        pos
    } else {
        cycle - pos
    }
}
