//! Memory and I/O bus interfaces.

/// Memory bus interface.
///
/// The CPU issues typed bus cycles: it places an address on the bus, accesses
/// the memory cell, and then advances the clock by the cycle's tick count via
/// `tick()`. Reads and writes themselves are pure data access; all timing
/// flows through `tick()`.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, addr: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, addr: u16, value: u8);

    /// Advance the clock by the given number of ticks.
    fn tick(&mut self, t: u32);

    /// Observe the address placed on the address bus at the start of a cycle.
    ///
    /// Called for memory, refresh, and I/O cycles. The default does nothing;
    /// hosts that model contention or want a bus trace can override it.
    fn set_addr_bus(&mut self, _addr: u16) {}
}

/// I/O port bus interface.
///
/// Port addresses are the full 16-bit address bus value (the Z80 places the
/// accumulator or B on the high byte).
pub trait IoBus {
    /// Read a byte from the given port.
    fn read_io(&mut self, port: u16) -> u8;

    /// Write a byte to the given port.
    fn write_io(&mut self, port: u16, value: u8);
}
