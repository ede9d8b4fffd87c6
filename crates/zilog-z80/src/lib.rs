//! Cycle-accurate Z80 CPU core.
//!
//! One prefix-aware decoder classifies every opcode by its `x`/`y`/`z`
//! bit-fields and dispatches to a [`Handler`]. Two handlers exist: the
//! execution engine ([`Z80`]), which mutates CPU state and issues timed bus
//! cycles, and the [`Disassembler`], which walks a byte slice and formats
//! mnemonics. `step()` runs one complete instruction, including DD/FD/CB/ED
//! prefix chains, and accounts for every tick of the bus protocol.

mod alu;
mod bits;
mod cpu;
mod decode;
mod disasm;
mod flags;
mod registers;

pub use cpu::Z80;
pub use decode::{
    decode, Alu, BlockCp, BlockIn, BlockLd, BlockOut, Condition, DecoderState, Handler, IndexReg,
    Prefix, Reg16, Reg16Stack, Reg8, Rot,
};
pub use disasm::Disassembler;
pub use flags::{CF, HF, NF, PF, SF, XF, YF, ZF};
pub use registers::Registers;
