//! Snowflake id generation
//!
//! Ids are 63-bit integers laid out as `timestamp(41) | machine(10) | sequence(12)`,
//! so they are unique across machines without coordination and sort by
//! creation time.

use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// 2015-01-01T00:00:00Z in milliseconds since the Unix epoch
pub const DEFAULT_EPOCH_MS: u64 = 1_420_070_400_000;

const MACHINE_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const MAX_MACHINE_ID: u16 = (1 << MACHINE_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

struct GeneratorState {
    last_ms: u64,
    sequence: u64,
}

/// Time-ordered unique id generator
pub struct IdGenerator {
    epoch_ms: u64,
    machine_id: u16,
    state: Mutex<GeneratorState>,
}

impl IdGenerator {
    /// Create a generator for the given machine, using [`DEFAULT_EPOCH_MS`]
    pub fn new(machine_id: u16) -> Result<Self> {
        Self::with_epoch(machine_id, DEFAULT_EPOCH_MS)
    }

    pub fn with_epoch(machine_id: u16, epoch_ms: u64) -> Result<Self> {
        if machine_id > MAX_MACHINE_ID {
            return Err(Error::Config(format!(
                "machine id {} exceeds {}",
                machine_id, MAX_MACHINE_ID
            )));
        }

        Ok(Self {
            epoch_ms,
            machine_id,
            state: Mutex::new(GeneratorState {
                last_ms: 0,
                sequence: 0,
            }),
        })
    }

    pub fn machine_id(&self) -> u16 {
        self.machine_id
    }

    /// Generate the next id
    pub fn next_id(&self) -> i64 {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        // never step back if the wall clock does
        let mut now = self.elapsed_ms().max(state.last_ms);

        if now == state.last_ms {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                while now <= state.last_ms {
                    std::hint::spin_loop();
                    now = self.elapsed_ms();
                }
            }
        } else {
            state.sequence = 0;
        }
        state.last_ms = now;

        let id = (now << (MACHINE_BITS + SEQUENCE_BITS))
            | (u64::from(self.machine_id) << SEQUENCE_BITS)
            | state.sequence;
        (id & i64::MAX as u64) as i64
    }

    fn elapsed_ms(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        now.saturating_sub(self.epoch_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_increase() {
        let ids = IdGenerator::new(1).unwrap();

        let mut previous = ids.next_id();
        for _ in 0..10_000 {
            let next = ids.next_id();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_machine_id_is_encoded() {
        let ids = IdGenerator::new(513).unwrap();
        let id = ids.next_id() as u64;

        assert_eq!((id >> SEQUENCE_BITS) & u64::from(MAX_MACHINE_ID), 513);
        assert_eq!(ids.machine_id(), 513);
    }

    #[test]
    fn test_machine_id_out_of_range() {
        assert!(matches!(IdGenerator::new(1024), Err(Error::Config(_))));
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let ids = Arc::new(IdGenerator::new(1).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..5_000).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 20_000);
    }
}
