//! Disassembler façade over the shared decoder.
//!
//! Implements the same [`Handler`] surface as the execution engine, but the
//! cycle hooks are no-ops and fetches advance a cursor over a byte slice.
//! Handlers format canonical lowercase mnemonics.

#![allow(clippy::cast_possible_wrap)] // Intentional i8 casts for displacements.

use crate::bits::{make16, sign_extend};
use crate::decode::{
    decode, Alu, BlockCp, BlockIn, BlockLd, BlockOut, Condition, DecoderState, Handler, IndexReg,
    Prefix, Reg16, Reg16Stack, Reg8, Rot,
};

/// Streaming disassembler.
///
/// Each call to [`disassemble`](Self::disassemble) consumes one complete
/// instruction, prefixes included, and returns its mnemonic. Reads past the
/// end of the slice yield 0x00.
pub struct Disassembler<'a> {
    bytes: &'a [u8],
    pos: usize,
    state: DecoderState,
    out: String,
}

impl<'a> Disassembler<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            state: DecoderState::default(),
            out: String::new(),
        }
    }

    /// Current cursor position in the byte slice.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Disassemble the next instruction.
    pub fn disassemble(&mut self) -> String {
        loop {
            decode(self);
            if self.state.prefix == Prefix::None && self.state.next_index_rp == IndexReg::Hl {
                break;
            }
        }
        std::mem::take(&mut self.out)
    }

    fn next_byte(&mut self) -> u8 {
        let b = self.bytes.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        b
    }

    fn emit(&mut self, s: String) {
        self.out = s;
    }

    fn idx_name(&self) -> &'static str {
        match self.state.index_rp {
            IndexReg::Hl => "hl",
            IndexReg::Ix => "ix",
            IndexReg::Iy => "iy",
        }
    }

    /// 8-bit operand name; the memory operand renders as `(hl)` or as
    /// `(ix+d)`/`(iy-d)` with a signed decimal displacement.
    fn r_name(&self, r: Reg8, d: u8) -> String {
        match r {
            Reg8::B => "b".into(),
            Reg8::C => "c".into(),
            Reg8::D => "d".into(),
            Reg8::E => "e".into(),
            Reg8::H => "h".into(),
            Reg8::L => "l".into(),
            Reg8::A => "a".into(),
            Reg8::AtHl => match self.state.index_rp {
                IndexReg::Hl => "(hl)".into(),
                IndexReg::Ix => format!("(ix{:+})", sign_extend(d)),
                IndexReg::Iy => format!("(iy{:+})", sign_extend(d)),
            },
        }
    }

    /// Register pair name; HL resolves through the index prefix.
    fn rp_name(&self, rp: Reg16) -> &'static str {
        match rp {
            Reg16::Bc => "bc",
            Reg16::De => "de",
            Reg16::Hl => self.idx_name(),
            Reg16::Sp => "sp",
        }
    }

    fn rp2_name(&self, rp: Reg16Stack) -> &'static str {
        match rp {
            Reg16Stack::Bc => "bc",
            Reg16Stack::De => "de",
            Reg16Stack::Hl => self.idx_name(),
            Reg16Stack::Af => "af",
        }
    }

    /// Relative-branch target, printed relative to the instruction start.
    fn jr_target(d: u8) -> i32 {
        sign_extend(d) + 2
    }
}

fn cc_name(cc: Condition) -> &'static str {
    match cc {
        Condition::Nz => "nz",
        Condition::Z => "z",
        Condition::Nc => "nc",
        Condition::C => "c",
        Condition::Po => "po",
        Condition::Pe => "pe",
        Condition::P => "p",
        Condition::M => "m",
    }
}

/// ALU mnemonic plus whether it spells the implicit accumulator operand.
fn alu_name(k: Alu) -> (&'static str, bool) {
    match k {
        Alu::Add => ("add", true),
        Alu::Adc => ("adc", true),
        Alu::Sub => ("sub", false),
        Alu::Sbc => ("sbc", true),
        Alu::And => ("and", false),
        Alu::Xor => ("xor", false),
        Alu::Or => ("or", false),
        Alu::Cp => ("cp", false),
    }
}

fn rot_name(op: Rot) -> &'static str {
    match op {
        Rot::Rlc => "rlc",
        Rot::Rrc => "rrc",
        Rot::Rl => "rl",
        Rot::Rr => "rr",
        Rot::Sla => "sla",
        Rot::Sra => "sra",
        Rot::Sll => "sll",
        Rot::Srl => "srl",
    }
}

impl Handler for Disassembler<'_> {
    fn state(&self) -> &DecoderState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut DecoderState {
        &mut self.state
    }

    fn fetch(&mut self) -> u8 {
        self.next_byte()
    }

    fn fetch_5t(&mut self) {}

    fn fetch_6t(&mut self) {}

    fn imm8(&mut self) -> u8 {
        self.next_byte()
    }

    fn imm8_5t(&mut self) -> u8 {
        self.next_byte()
    }

    fn imm16(&mut self) -> u16 {
        let lo = self.next_byte();
        let hi = self.next_byte();
        make16(hi, lo)
    }

    fn imm16_call(&mut self) -> u16 {
        self.imm16()
    }

    fn disp(&mut self) -> u8 {
        self.next_byte()
    }

    fn exec_5t(&mut self) {}

    fn illegal(&mut self, op: u8) {
        panic!("unknown opcode 0x{op:02x} at offset {}", self.pos - 1);
    }

    fn ed_prefix(&mut self) {
        self.state.prefix = Prefix::Ed;
        self.emit("noni 0xed".into());
    }

    fn nop(&mut self) {
        self.emit("nop".into());
    }

    fn halt(&mut self) {
        self.emit("halt".into());
    }

    fn ld_r_r(&mut self, rd: Reg8, rs: Reg8, d: u8) {
        self.emit(format!("ld {}, {}", self.r_name(rd, d), self.r_name(rs, d)));
    }

    fn ld_r_n(&mut self, r: Reg8, d: u8, n: u8) {
        self.emit(format!("ld {}, 0x{n:02x}", self.r_name(r, d)));
    }

    fn ld_a_at_rp(&mut self, rp: Reg16) {
        self.emit(format!("ld a, ({})", self.rp_name(rp)));
    }

    fn ld_at_rp_a(&mut self, rp: Reg16) {
        self.emit(format!("ld ({}), a", self.rp_name(rp)));
    }

    fn ld_rp_nn(&mut self, rp: Reg16, nn: u16) {
        self.emit(format!("ld {}, 0x{nn:04x}", self.rp_name(rp)));
    }

    fn ld_irp_at_nn(&mut self, nn: u16) {
        self.emit(format!("ld {}, (0x{nn:04x})", self.idx_name()));
    }

    fn ld_at_nn_irp(&mut self, nn: u16) {
        self.emit(format!("ld (0x{nn:04x}), {}", self.idx_name()));
    }

    fn ld_a_at_nn(&mut self, nn: u16) {
        self.emit(format!("ld a, (0x{nn:04x})"));
    }

    fn ld_at_nn_a(&mut self, nn: u16) {
        self.emit(format!("ld (0x{nn:04x}), a"));
    }

    fn ld_sp_irp(&mut self) {
        self.emit(format!("ld sp, {}", self.idx_name()));
    }

    fn inc_r(&mut self, r: Reg8, d: u8) {
        self.emit(format!("inc {}", self.r_name(r, d)));
    }

    fn dec_r(&mut self, r: Reg8, d: u8) {
        self.emit(format!("dec {}", self.r_name(r, d)));
    }

    fn inc_rp(&mut self, rp: Reg16) {
        self.emit(format!("inc {}", self.rp_name(rp)));
    }

    fn dec_rp(&mut self, rp: Reg16) {
        self.emit(format!("dec {}", self.rp_name(rp)));
    }

    fn alu_r(&mut self, k: Alu, r: Reg8, d: u8) {
        let (name, acc) = alu_name(k);
        if acc {
            self.emit(format!("{name} a, {}", self.r_name(r, d)));
        } else {
            self.emit(format!("{name} {}", self.r_name(r, d)));
        }
    }

    fn alu_n(&mut self, k: Alu, n: u8) {
        let (name, acc) = alu_name(k);
        if acc {
            self.emit(format!("{name} a, 0x{n:02x}"));
        } else {
            self.emit(format!("{name} 0x{n:02x}"));
        }
    }

    fn add_irp_rp(&mut self, rp: Reg16) {
        self.emit(format!("add {}, {}", self.idx_name(), self.rp_name(rp)));
    }

    fn rlca(&mut self) {
        self.emit("rlca".into());
    }

    fn rrca(&mut self) {
        self.emit("rrca".into());
    }

    fn rla(&mut self) {
        self.emit("rla".into());
    }

    fn rra(&mut self) {
        self.emit("rra".into());
    }

    fn daa(&mut self) {
        self.emit("daa".into());
    }

    fn cpl(&mut self) {
        self.emit("cpl".into());
    }

    fn scf(&mut self) {
        self.emit("scf".into());
    }

    fn ccf(&mut self) {
        self.emit("ccf".into());
    }

    fn ex_af_alt_af(&mut self) {
        self.emit("ex af, af'".into());
    }

    fn ex_de_hl(&mut self) {
        self.emit("ex de, hl".into());
    }

    fn ex_at_sp_irp(&mut self) {
        self.emit(format!("ex (sp), {}", self.idx_name()));
    }

    fn exx(&mut self) {
        self.emit("exx".into());
    }

    fn jp_nn(&mut self, nn: u16) {
        self.emit(format!("jp 0x{nn:04x}"));
    }

    fn jp_cc_nn(&mut self, cc: Condition, nn: u16) {
        self.emit(format!("jp {}, 0x{nn:04x}", cc_name(cc)));
    }

    fn jp_irp(&mut self) {
        self.emit(format!("jp ({})", self.idx_name()));
    }

    fn jr(&mut self, d: u8) {
        self.emit(format!("jr {}", Self::jr_target(d)));
    }

    fn jr_cc(&mut self, cc: Condition, d: u8) {
        self.emit(format!("jr {}, {}", cc_name(cc), Self::jr_target(d)));
    }

    fn djnz(&mut self, d: u8) {
        self.emit(format!("djnz {}", Self::jr_target(d)));
    }

    fn call_nn(&mut self, nn: u16) {
        self.emit(format!("call 0x{nn:04x}"));
    }

    fn call_cc(&mut self, cc: Condition) {
        let nn = self.imm16();
        self.emit(format!("call {}, 0x{nn:04x}", cc_name(cc)));
    }

    fn ret(&mut self) {
        self.emit("ret".into());
    }

    fn ret_cc(&mut self, cc: Condition) {
        self.emit(format!("ret {}", cc_name(cc)));
    }

    fn rst(&mut self, target: u8) {
        self.emit(format!("rst 0x{target:02x}"));
    }

    fn push_rp(&mut self, rp: Reg16Stack) {
        self.emit(format!("push {}", self.rp2_name(rp)));
    }

    fn pop_rp(&mut self, rp: Reg16Stack) {
        self.emit(format!("pop {}", self.rp2_name(rp)));
    }

    fn in_a_n(&mut self, n: u8) {
        self.emit(format!("in a, (0x{n:02x})"));
    }

    fn out_n_a(&mut self, n: u8) {
        self.emit(format!("out (0x{n:02x}), a"));
    }

    fn di(&mut self) {
        self.emit("di".into());
    }

    fn ei(&mut self) {
        self.emit("ei".into());
    }

    fn rot(&mut self, op: Rot, r: Reg8, d: u8) {
        let name = rot_name(op);
        if self.state.index_rp != IndexReg::Hl && r != Reg8::AtHl {
            // Indexed form that also copies the result into a register.
            self.emit(format!(
                "{name} {}, {}",
                self.r_name(Reg8::AtHl, d),
                self.r_name(r, 0)
            ));
        } else {
            self.emit(format!("{name} {}", self.r_name(r, d)));
        }
    }

    fn bit(&mut self, b: u8, r: Reg8, d: u8) {
        self.emit(format!("bit {b}, {}", self.r_name(r, d)));
    }

    fn res(&mut self, b: u8, r: Reg8, d: u8) {
        if self.state.index_rp != IndexReg::Hl && r != Reg8::AtHl {
            self.emit(format!(
                "res {b}, {}, {}",
                self.r_name(Reg8::AtHl, d),
                self.r_name(r, 0)
            ));
        } else {
            self.emit(format!("res {b}, {}", self.r_name(r, d)));
        }
    }

    fn set(&mut self, b: u8, r: Reg8, d: u8) {
        if self.state.index_rp != IndexReg::Hl && r != Reg8::AtHl {
            self.emit(format!(
                "set {b}, {}, {}",
                self.r_name(Reg8::AtHl, d),
                self.r_name(r, 0)
            ));
        } else {
            self.emit(format!("set {b}, {}", self.r_name(r, d)));
        }
    }

    fn in_r_c(&mut self, r: Reg8) {
        if r == Reg8::AtHl {
            self.emit("in (c)".into());
        } else {
            self.emit(format!("in {}, (c)", self.r_name(r, 0)));
        }
    }

    fn out_c_r(&mut self, r: Reg8) {
        if r == Reg8::AtHl {
            self.emit("out (c), 0".into());
        } else {
            self.emit(format!("out (c), {}", self.r_name(r, 0)));
        }
    }

    fn sbc_hl_rp(&mut self, rp: Reg16) {
        self.emit(format!("sbc hl, {}", self.rp_name(rp)));
    }

    fn adc_hl_rp(&mut self, rp: Reg16) {
        self.emit(format!("adc hl, {}", self.rp_name(rp)));
    }

    fn ld_at_nn_rp(&mut self, nn: u16, rp: Reg16) {
        self.emit(format!("ld (0x{nn:04x}), {}", self.rp_name(rp)));
    }

    fn ld_rp_at_nn(&mut self, rp: Reg16, nn: u16) {
        self.emit(format!("ld {}, (0x{nn:04x})", self.rp_name(rp)));
    }

    fn neg(&mut self) {
        self.emit("neg".into());
    }

    fn retn(&mut self) {
        self.emit("retn".into());
    }

    fn reti(&mut self) {
        self.emit("reti".into());
    }

    fn im(&mut self, mode: u8) {
        self.emit(format!("im {mode}"));
    }

    fn ld_i_a(&mut self) {
        self.emit("ld i, a".into());
    }

    fn ld_r_a(&mut self) {
        self.emit("ld r, a".into());
    }

    fn ld_a_i(&mut self) {
        self.emit("ld a, i".into());
    }

    fn ld_a_r(&mut self) {
        self.emit("ld a, r".into());
    }

    fn rrd(&mut self) {
        self.emit("rrd".into());
    }

    fn rld(&mut self) {
        self.emit("rld".into());
    }

    fn block_ld(&mut self, k: BlockLd) {
        self.emit(
            match k {
                BlockLd::Ldi => "ldi",
                BlockLd::Ldd => "ldd",
                BlockLd::Ldir => "ldir",
                BlockLd::Lddr => "lddr",
            }
            .into(),
        );
    }

    fn block_cp(&mut self, k: BlockCp) {
        self.emit(
            match k {
                BlockCp::Cpi => "cpi",
                BlockCp::Cpd => "cpd",
                BlockCp::Cpir => "cpir",
                BlockCp::Cpdr => "cpdr",
            }
            .into(),
        );
    }

    fn block_in(&mut self, k: BlockIn) {
        self.emit(
            match k {
                BlockIn::Ini => "ini",
                BlockIn::Ind => "ind",
                BlockIn::Inir => "inir",
                BlockIn::Indr => "indr",
            }
            .into(),
        );
    }

    fn block_out(&mut self, k: BlockOut) {
        self.emit(
            match k {
                BlockOut::Outi => "outi",
                BlockOut::Outd => "outd",
                BlockOut::Otir => "otir",
                BlockOut::Otdr => "otdr",
            }
            .into(),
        );
    }

    fn noni(&mut self, op: u8) {
        self.emit(format!("noni 0xed, 0x{op:02x}"));
    }
}
