//! Z80 CPU execution engine.

#![allow(clippy::cast_possible_truncation)] // Intentional truncation for low byte extraction.

use sim_core::{Bus, Cpu, IoBus};

use crate::bits::{disp_target, high8, low8, make16};
use crate::decode::{decode, DecoderState, IndexReg, Prefix, Reg16, Reg16Stack, Reg8};
use crate::registers::Registers;

/// Z80 CPU.
///
/// The CPU does not own the bus; it is passed to `step()` and drives memory,
/// I/O ports and the clock through typed bus cycles. One `step()` executes a
/// complete instruction including any DD/FD/CB/ED prefix chain.
pub struct Z80 {
    /// Architectural register state.
    pub regs: Registers,

    /// Decoder prefix state.
    pub(crate) decoder: DecoderState,

    /// Address latched by the most recent memory read cycle.
    pub(crate) last_read_addr: u16,

    /// Blocks interrupt acceptance for exactly one instruction, after EI or
    /// a DD/FD prefix (and NONI).
    pub(crate) disable_int: bool,

    /// Ticks issued so far by the current step.
    pub(crate) ticks: u32,
}

impl Z80 {
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::default(),
            decoder: DecoderState::default(),
            last_read_addr: 0,
            disable_int: false,
            ticks: 0,
        }
    }

    /// Execute one complete instruction. Returns the ticks consumed.
    ///
    /// While halted, burns one 4-tick refresh cycle instead.
    pub fn step<B: Bus + IoBus>(&mut self, bus: &mut B) -> u32 {
        self.ticks = 0;

        if self.regs.halted {
            let pc = self.regs.pc;
            let _ = Exec {
                cpu: &mut *self,
                bus,
            }
            .fetch_cycle(pc);
            return self.ticks;
        }

        loop {
            self.disable_int = false;
            decode(&mut Exec {
                cpu: &mut *self,
                bus: &mut *bus,
            });
            if self.decoder.prefix == Prefix::None && self.decoder.next_index_rp == IndexReg::Hl {
                break;
            }
        }
        self.ticks
    }

    /// Request a maskable interrupt. Returns true if it was accepted.
    ///
    /// Refused while IFF1 is clear or interrupts are inhibited by the
    /// instruction that just executed (EI, DD/FD prefix, NONI).
    pub fn intr<B: Bus + IoBus>(&mut self, bus: &mut B) -> bool {
        if !self.regs.iff1 || self.disable_int {
            return false;
        }
        self.ticks = 0;
        self.regs.halted = false;
        self.regs.iff1 = false;
        self.regs.iff2 = false;

        let im = self.regs.im;
        let mut ex = Exec { cpu: self, bus };
        let pc = ex.cpu.regs.pc;
        if im == 2 {
            // Mode 2: vector table. 19 ticks total.
            ex.internal(7);
            ex.push_word(pc);
            let table = make16(ex.cpu.regs.i(), 0xFF);
            let lo = ex.read_cycle(table, 3);
            let hi = ex.read_cycle(table.wrapping_add(1), 3);
            let target = make16(hi, lo);
            ex.cpu.regs.pc = target;
            ex.cpu.regs.wz = target;
        } else {
            // Mode 0/1: jump to 0x0038. 13 ticks total.
            ex.internal(7);
            ex.push_word(pc);
            ex.cpu.regs.pc = 0x0038;
            ex.cpu.regs.wz = 0x0038;
        }
        true
    }

    /// Deliver a non-maskable interrupt. 11 ticks; jumps to 0x0066.
    pub fn nmi<B: Bus + IoBus>(&mut self, bus: &mut B) {
        self.ticks = 0;
        self.regs.halted = false;
        self.regs.iff2 = self.regs.iff1;
        self.regs.iff1 = false;

        let mut ex = Exec { cpu: self, bus };
        let pc = ex.cpu.regs.pc;
        ex.internal(5);
        ex.push_word(pc);
        ex.cpu.regs.pc = 0x0066;
        ex.cpu.regs.wz = 0x0066;
    }

    /// Reset to the power-on state.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.decoder = DecoderState::default();
        self.last_read_addr = 0;
        self.disable_int = false;
        self.ticks = 0;
    }

    /// Address of the most recent memory read (diagnostic).
    #[must_use]
    pub fn last_read_addr(&self) -> u16 {
        self.last_read_addr
    }

    /// True while interrupt acceptance is inhibited for one instruction.
    #[must_use]
    pub fn int_disabled(&self) -> bool {
        self.disable_int
    }

    /// Pending extended-table prefix (diagnostic).
    #[must_use]
    pub fn prefix(&self) -> Prefix {
        self.decoder.prefix
    }

    /// Index pair the next decode will substitute for HL (diagnostic).
    #[must_use]
    pub fn next_index_rp(&self) -> IndexReg {
        self.decoder.next_index_rp
    }

    /// Get the program counter.
    #[must_use]
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    pub fn set_pc(&mut self, value: u16) {
        self.regs.pc = value;
    }

    /// Get the stack pointer.
    #[must_use]
    pub fn sp(&self) -> u16 {
        self.regs.sp
    }

    pub fn set_sp(&mut self, value: u16) {
        self.regs.sp = value;
    }

    /// Get the A register.
    #[must_use]
    pub fn a(&self) -> u8 {
        self.regs.a()
    }

    /// Get the F register (flags).
    #[must_use]
    pub fn f(&self) -> u8 {
        self.regs.f()
    }

    /// Get the AF register pair.
    #[must_use]
    pub fn af(&self) -> u16 {
        self.regs.af
    }

    /// Get the BC register pair.
    #[must_use]
    pub fn bc(&self) -> u16 {
        self.regs.bc
    }

    /// Get the DE register pair.
    #[must_use]
    pub fn de(&self) -> u16 {
        self.regs.de
    }

    /// Get the HL register pair.
    #[must_use]
    pub fn hl(&self) -> u16 {
        self.regs.hl
    }

    /// True after HALT until the next interrupt.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.regs.halted
    }
}

impl Default for Z80 {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Bus + IoBus> Cpu<B> for Z80 {
    fn step(&mut self, bus: &mut B) -> u32 {
        Z80::step(self, bus)
    }

    fn reset(&mut self) {
        Z80::reset(self);
    }

    fn intr(&mut self, bus: &mut B) -> bool {
        Z80::intr(self, bus)
    }

    fn nmi(&mut self, bus: &mut B) {
        Z80::nmi(self, bus);
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }
}

/// One instruction's view of the CPU and its bus.
///
/// Implements [`crate::Handler`]: the decoder pulls opcode and operand bytes
/// through it, and the instruction handlers mutate CPU state while issuing
/// the exact bus-cycle sequence of the instruction tables.
pub(crate) struct Exec<'a, B: Bus + IoBus> {
    pub(crate) cpu: &'a mut Z80,
    pub(crate) bus: &'a mut B,
}

impl<B: Bus + IoBus> Exec<'_, B> {
    pub(crate) fn tick(&mut self, t: u32) {
        self.cpu.ticks += t;
        self.bus.tick(t);
    }

    /// M1 cycle: address bus carries the fetch address for two ticks, then IR
    /// for the refresh half. Latches the read address and bumps R.
    pub(crate) fn fetch_cycle(&mut self, addr: u16) -> u8 {
        self.bus.set_addr_bus(addr);
        let b = self.bus.read(addr);
        self.tick(2);
        self.bus.set_addr_bus(self.cpu.regs.ir);
        self.tick(2);
        self.cpu.last_read_addr = addr;
        self.cpu.regs.refresh();
        b
    }

    pub(crate) fn read_cycle(&mut self, addr: u16, t: u32) -> u8 {
        self.bus.set_addr_bus(addr);
        let b = self.bus.read(addr);
        self.tick(t);
        self.cpu.last_read_addr = addr;
        b
    }

    pub(crate) fn write_cycle(&mut self, addr: u16, value: u8, t: u32) {
        self.bus.set_addr_bus(addr);
        self.bus.write(addr, value);
        self.tick(t);
    }

    pub(crate) fn input_cycle(&mut self, port: u16) -> u8 {
        self.bus.set_addr_bus(port);
        let b = self.bus.read_io(port);
        self.tick(4);
        b
    }

    pub(crate) fn output_cycle(&mut self, port: u16, value: u8) {
        self.bus.set_addr_bus(port);
        self.bus.write_io(port, value);
        self.tick(4);
    }

    /// Internal cycle: no bus activity, just ticks.
    pub(crate) fn internal(&mut self, t: u32) {
        self.tick(t);
    }

    /// Immediate read at PC with the given cycle length.
    pub(crate) fn imm8_cycle(&mut self, t: u32) -> u8 {
        let pc = self.cpu.regs.pc;
        let b = self.read_cycle(pc, t);
        self.cpu.regs.pc = pc.wrapping_add(1);
        b
    }

    /// The register pair currently standing in for HL.
    pub(crate) fn index_rp(&self) -> u16 {
        match self.cpu.decoder.index_rp {
            IndexReg::Hl => self.cpu.regs.hl,
            IndexReg::Ix => self.cpu.regs.ix,
            IndexReg::Iy => self.cpu.regs.iy,
        }
    }

    pub(crate) fn set_index_rp(&mut self, value: u16) {
        match self.cpu.decoder.index_rp {
            IndexReg::Hl => self.cpu.regs.hl = value,
            IndexReg::Ix => self.cpu.regs.ix = value,
            IndexReg::Iy => self.cpu.regs.iy = value,
        }
    }

    fn indexed(&self) -> bool {
        self.cpu.decoder.index_rp != IndexReg::Hl
    }

    /// Read the memory operand at I+d (or HL when no index prefix is
    /// active). Indexed access latches the effective address into MEMPTR.
    fn read_at_disp(&mut self, d: u8, long_read: bool) -> u8 {
        let addr = disp_target(self.index_rp(), d);
        let v = self.read_cycle(addr, if long_read { 4 } else { 3 });
        if self.indexed() {
            self.cpu.regs.wz = addr;
        }
        v
    }

    fn write_at_disp(&mut self, d: u8, n: u8) {
        let addr = disp_target(self.index_rp(), d);
        self.write_cycle(addr, n, 3);
        if self.indexed() {
            self.cpu.regs.wz = addr;
        }
    }

    /// Read an 8-bit operand. `long_read` selects the 4-tick read cycle used
    /// by read-modify-write instructions.
    pub(crate) fn get_r(&mut self, r: Reg8, d: u8, long_read: bool) -> u8 {
        match r {
            Reg8::B => self.cpu.regs.b(),
            Reg8::C => self.cpu.regs.c(),
            Reg8::D => self.cpu.regs.d(),
            Reg8::E => self.cpu.regs.e(),
            Reg8::H => self.cpu.regs.h(),
            Reg8::L => self.cpu.regs.l(),
            Reg8::AtHl => self.read_at_disp(d, long_read),
            Reg8::A => self.cpu.regs.a(),
        }
    }

    /// Write an 8-bit operand.
    pub(crate) fn set_r(&mut self, r: Reg8, d: u8, n: u8) {
        match r {
            Reg8::B => self.cpu.regs.set_b(n),
            Reg8::C => self.cpu.regs.set_c(n),
            Reg8::D => self.cpu.regs.set_d(n),
            Reg8::E => self.cpu.regs.set_e(n),
            Reg8::H => self.cpu.regs.set_h(n),
            Reg8::L => self.cpu.regs.set_l(n),
            Reg8::AtHl => self.write_at_disp(d, n),
            Reg8::A => self.cpu.regs.set_a(n),
        }
    }

    /// Read a register pair; HL resolves through the index prefix.
    pub(crate) fn get_rp(&mut self, rp: Reg16) -> u16 {
        match rp {
            Reg16::Bc => self.cpu.regs.bc,
            Reg16::De => self.cpu.regs.de,
            Reg16::Hl => self.index_rp(),
            Reg16::Sp => self.cpu.regs.sp,
        }
    }

    pub(crate) fn set_rp(&mut self, rp: Reg16, value: u16) {
        match rp {
            Reg16::Bc => self.cpu.regs.bc = value,
            Reg16::De => self.cpu.regs.de = value,
            Reg16::Hl => self.set_index_rp(value),
            Reg16::Sp => self.cpu.regs.sp = value,
        }
    }

    pub(crate) fn get_rp2(&mut self, rp: Reg16Stack) -> u16 {
        match rp {
            Reg16Stack::Bc => self.cpu.regs.bc,
            Reg16Stack::De => self.cpu.regs.de,
            Reg16Stack::Hl => self.index_rp(),
            Reg16Stack::Af => self.cpu.regs.af,
        }
    }

    pub(crate) fn set_rp2(&mut self, rp: Reg16Stack, value: u16) {
        match rp {
            Reg16Stack::Bc => self.cpu.regs.bc = value,
            Reg16Stack::De => self.cpu.regs.de = value,
            Reg16Stack::Hl => self.set_index_rp(value),
            Reg16Stack::Af => self.cpu.regs.af = value,
        }
    }

    pub(crate) fn condition(&self, cc: crate::decode::Condition) -> bool {
        (self.cpu.regs.f() & cc.mask() != 0) == cc.expected()
    }

    /// Push a word: high byte at SP-1, low byte at SP-2.
    pub(crate) fn push_word(&mut self, nn: u16) {
        let mut sp = self.cpu.regs.sp;
        sp = sp.wrapping_sub(1);
        self.write_cycle(sp, high8(nn), 3);
        sp = sp.wrapping_sub(1);
        self.write_cycle(sp, low8(nn), 3);
        self.cpu.regs.sp = sp;
    }

    /// Pop a word: low byte first.
    pub(crate) fn pop_word(&mut self) -> u16 {
        let mut sp = self.cpu.regs.sp;
        let lo = self.read_cycle(sp, 3);
        sp = sp.wrapping_add(1);
        let hi = self.read_cycle(sp, 3);
        sp = sp.wrapping_add(1);
        self.cpu.regs.sp = sp;
        make16(hi, lo)
    }

    pub(crate) fn do_call(&mut self, nn: u16) {
        let pc = self.cpu.regs.pc;
        self.push_word(pc);
        self.cpu.regs.wz = nn;
        self.cpu.regs.pc = nn;
    }

    pub(crate) fn do_return(&mut self) {
        let pc = self.pop_word();
        self.cpu.regs.wz = pc;
        self.cpu.regs.pc = pc;
    }

    /// Taken relative jump: 5-tick internal cycle, then PC and MEMPTR move to
    /// the target.
    pub(crate) fn relative_jump(&mut self, d: u8) {
        self.internal(5);
        let target = disp_target(self.cpu.regs.pc, d);
        self.cpu.regs.wz = target;
        self.cpu.regs.pc = target;
    }
}

// Instruction execution split into a separate file for readability.
mod execute;
