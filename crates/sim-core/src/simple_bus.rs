//! Flat 64K test bus.

use crate::{Bus, IoBus};

/// Flat 64KB RAM bus with a built-in tick counter, for tests and tools.
///
/// I/O reads return 0xFF (open bus); I/O writes are recorded so tests can
/// assert on them.
pub struct SimpleBus {
    ram: Vec<u8>,
    ticks: u64,
    io_writes: Vec<(u16, u8)>,
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: vec![0; 0x1_0000],
            ticks: 0,
            io_writes: Vec::new(),
        }
    }

    /// Copy bytes into RAM starting at `addr`.
    pub fn load(&mut self, addr: u16, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            self.ram[addr.wrapping_add(i as u16) as usize] = byte;
        }
    }

    /// Read RAM without going through the bus cycle machinery.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    /// Total ticks accumulated.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// I/O writes seen so far, in order.
    #[must_use]
    pub fn io_writes(&self) -> &[(u16, u8)] {
        &self.io_writes
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.ram[addr as usize] = value;
    }

    fn tick(&mut self, t: u32) {
        self.ticks += u64::from(t);
    }
}

impl IoBus for SimpleBus {
    fn read_io(&mut self, _port: u16) -> u8 {
        0xFF
    }

    fn write_io(&mut self, port: u16, value: u8) {
        self.io_writes.push((port, value));
    }
}
