//! Prefix-aware instruction decoder.
//!
//! Every opcode byte is viewed as `xxyyyzzz`, with `y` further split into
//! `p` (top two bits) and `q` (low bit). Whole instruction families decode
//! from these fields, so the tables below are structured dispatch rather than
//! a 256-arm switch.
//!
//! The decoder is generic over a [`Handler`]: the execution engine implements
//! it with timed bus cycles and state mutation, the disassembler with cursor
//! reads and mnemonic formatting. One classification serves both.

/// 8-bit operand. Index 6 is the memory cell addressed by HL, or by IX/IY
/// plus displacement when an index prefix is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    AtHl,
    A,
}

impl Reg8 {
    fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => Self::B,
            1 => Self::C,
            2 => Self::D,
            3 => Self::E,
            4 => Self::H,
            5 => Self::L,
            6 => Self::AtHl,
            _ => Self::A,
        }
    }
}

/// 16-bit register pair, p-field encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg16 {
    Bc,
    De,
    Hl,
    Sp,
}

impl Reg16 {
    fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Self::Bc,
            1 => Self::De,
            2 => Self::Hl,
            _ => Self::Sp,
        }
    }
}

/// 16-bit register pair for PUSH/POP (AF in place of SP).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg16Stack {
    Bc,
    De,
    Hl,
    Af,
}

impl Reg16Stack {
    fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Self::Bc,
            1 => Self::De,
            2 => Self::Hl,
            _ => Self::Af,
        }
    }
}

/// Which register pair stands in for HL while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexReg {
    #[default]
    Hl,
    Ix,
    Iy,
}

/// Extended-table prefix state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Prefix {
    #[default]
    None,
    Cb,
    Ed,
}

/// ALU operation, y-field encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alu {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl Alu {
    fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => Self::Add,
            1 => Self::Adc,
            2 => Self::Sub,
            3 => Self::Sbc,
            4 => Self::And,
            5 => Self::Xor,
            6 => Self::Or,
            _ => Self::Cp,
        }
    }
}

/// CB-table shift/rotate operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rot {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Sll,
    Srl,
}

impl Rot {
    fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => Self::Rlc,
            1 => Self::Rrc,
            2 => Self::Rl,
            3 => Self::Rr,
            4 => Self::Sla,
            5 => Self::Sra,
            6 => Self::Sll,
            _ => Self::Srl,
        }
    }
}

/// Block transfer: bit 0 = decrement, bit 1 = repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLd {
    Ldi,
    Ldd,
    Ldir,
    Lddr,
}

/// Block compare: bit 0 = decrement, bit 1 = repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCp {
    Cpi,
    Cpd,
    Cpir,
    Cpdr,
}

/// Block port input: bit 0 = decrement, bit 1 = repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockIn {
    Ini,
    Ind,
    Inir,
    Indr,
}

/// Block port output: bit 0 = decrement, bit 1 = repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOut {
    Outi,
    Outd,
    Otir,
    Otdr,
}

macro_rules! block_kind {
    ($name:ident, $v0:ident, $v1:ident, $v2:ident, $v3:ident) => {
        impl $name {
            fn from_bits(bits: u8) -> Self {
                match bits & 3 {
                    0 => Self::$v0,
                    1 => Self::$v1,
                    2 => Self::$v2,
                    _ => Self::$v3,
                }
            }

            /// HL (and DE for transfers) step downward.
            pub(crate) fn decrements(self) -> bool {
                matches!(self, Self::$v1 | Self::$v3)
            }

            /// Instruction re-executes until its terminating condition.
            pub(crate) fn repeats(self) -> bool {
                matches!(self, Self::$v2 | Self::$v3)
            }
        }
    };
}

block_kind!(BlockLd, Ldi, Ldd, Ldir, Lddr);
block_kind!(BlockCp, Cpi, Cpd, Cpir, Cpdr);
block_kind!(BlockIn, Ini, Ind, Inir, Indr);
block_kind!(BlockOut, Outi, Outd, Otir, Otdr);

/// Branch condition. The pair `cc / 2` selects a flag, `cc & 1` the expected
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Nz,
    Z,
    Nc,
    C,
    Po,
    Pe,
    P,
    M,
}

impl Condition {
    fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => Self::Nz,
            1 => Self::Z,
            2 => Self::Nc,
            3 => Self::C,
            4 => Self::Po,
            5 => Self::Pe,
            6 => Self::P,
            _ => Self::M,
        }
    }

    /// The flag bit this condition tests.
    pub(crate) fn mask(self) -> u8 {
        match self {
            Self::Nz | Self::Z => crate::flags::ZF,
            Self::Nc | Self::C => crate::flags::CF,
            Self::Po | Self::Pe => crate::flags::PF,
            Self::P | Self::M => crate::flags::SF,
        }
    }

    /// The flag value that satisfies the condition.
    pub(crate) fn expected(self) -> bool {
        matches!(self, Self::Z | Self::C | Self::Pe | Self::M)
    }
}

/// Decoder state, separate from CPU state so the disassembler can share it.
///
/// At the start of every decode, `index_rp` is loaded from `next_index_rp`
/// and `next_index_rp` reverts to HL; only a DD/FD prefix (or a CB prefix
/// carrying one forward) sets it to anything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoderState {
    pub prefix: Prefix,
    pub index_rp: IndexReg,
    pub next_index_rp: IndexReg,
}

/// The handler surface the decoder dispatches into.
///
/// Byte-source methods both deliver operand bytes and account for the bus
/// cycles that carry them; the `fetch_5t`/`fetch_6t` hooks stretch the tail
/// of the opcode fetch for the instructions that need it.
pub trait Handler {
    fn state(&self) -> &DecoderState;
    fn state_mut(&mut self) -> &mut DecoderState;

    /// Fetch an opcode byte (M1 cycle in execution mode).
    fn fetch(&mut self) -> u8;
    /// Stretch the previous fetch to 5 ticks.
    fn fetch_5t(&mut self);
    /// Stretch the previous fetch to 6 ticks.
    fn fetch_6t(&mut self);
    /// Read an immediate byte (3-tick read cycle).
    fn imm8(&mut self) -> u8;
    /// Read an immediate byte with a 5-tick read cycle (indexed LD (I+d),n).
    fn imm8_5t(&mut self) -> u8;
    /// Read an immediate word, 3+3 ticks.
    fn imm16(&mut self) -> u16;
    /// Read an immediate word, 3+4 ticks (CALL nn).
    fn imm16_call(&mut self) -> u16;
    /// Read a displacement byte (3-tick read cycle).
    fn disp(&mut self) -> u8;
    /// 5-tick internal cycle.
    fn exec_5t(&mut self);
    /// Decode failure: no table matched the opcode.
    fn illegal(&mut self, op: u8);

    // Prefix plumbing shared by both modes.

    fn cb_prefix(&mut self) {
        let s = self.state_mut();
        // Carry the active index pair into the CB-table decode.
        s.next_index_rp = s.index_rp;
        s.prefix = Prefix::Cb;
    }

    fn ed_prefix(&mut self) {
        self.state_mut().prefix = Prefix::Ed;
    }

    fn set_next_index_rp(&mut self, irp: IndexReg) {
        self.state_mut().next_index_rp = irp;
    }

    // Unprefixed table.

    fn nop(&mut self);
    fn halt(&mut self);
    fn ld_r_r(&mut self, rd: Reg8, rs: Reg8, d: u8);
    fn ld_r_n(&mut self, r: Reg8, d: u8, n: u8);
    fn ld_a_at_rp(&mut self, rp: Reg16);
    fn ld_at_rp_a(&mut self, rp: Reg16);
    fn ld_rp_nn(&mut self, rp: Reg16, nn: u16);
    fn ld_irp_at_nn(&mut self, nn: u16);
    fn ld_at_nn_irp(&mut self, nn: u16);
    fn ld_a_at_nn(&mut self, nn: u16);
    fn ld_at_nn_a(&mut self, nn: u16);
    fn ld_sp_irp(&mut self);
    fn inc_r(&mut self, r: Reg8, d: u8);
    fn dec_r(&mut self, r: Reg8, d: u8);
    fn inc_rp(&mut self, rp: Reg16);
    fn dec_rp(&mut self, rp: Reg16);
    fn alu_r(&mut self, k: Alu, r: Reg8, d: u8);
    fn alu_n(&mut self, k: Alu, n: u8);
    fn add_irp_rp(&mut self, rp: Reg16);
    fn rlca(&mut self);
    fn rrca(&mut self);
    fn rla(&mut self);
    fn rra(&mut self);
    fn daa(&mut self);
    fn cpl(&mut self);
    fn scf(&mut self);
    fn ccf(&mut self);
    fn ex_af_alt_af(&mut self);
    fn ex_de_hl(&mut self);
    fn ex_at_sp_irp(&mut self);
    fn exx(&mut self);
    fn jp_nn(&mut self, nn: u16);
    fn jp_cc_nn(&mut self, cc: Condition, nn: u16);
    fn jp_irp(&mut self);
    fn jr(&mut self, d: u8);
    fn jr_cc(&mut self, cc: Condition, d: u8);
    fn djnz(&mut self, d: u8);
    fn call_nn(&mut self, nn: u16);
    /// CALL cc reads its own immediate word: the high-byte read stretches to
    /// 4 ticks only when the call is taken.
    fn call_cc(&mut self, cc: Condition);
    fn ret(&mut self);
    fn ret_cc(&mut self, cc: Condition);
    fn rst(&mut self, target: u8);
    fn push_rp(&mut self, rp: Reg16Stack);
    fn pop_rp(&mut self, rp: Reg16Stack);
    fn in_a_n(&mut self, n: u8);
    fn out_n_a(&mut self, n: u8);
    fn di(&mut self);
    fn ei(&mut self);

    // CB table.

    fn rot(&mut self, op: Rot, r: Reg8, d: u8);
    fn bit(&mut self, b: u8, r: Reg8, d: u8);
    fn res(&mut self, b: u8, r: Reg8, d: u8);
    fn set(&mut self, b: u8, r: Reg8, d: u8);

    // ED table.

    fn in_r_c(&mut self, r: Reg8);
    fn out_c_r(&mut self, r: Reg8);
    fn sbc_hl_rp(&mut self, rp: Reg16);
    fn adc_hl_rp(&mut self, rp: Reg16);
    fn ld_at_nn_rp(&mut self, nn: u16, rp: Reg16);
    fn ld_rp_at_nn(&mut self, rp: Reg16, nn: u16);
    fn neg(&mut self);
    fn retn(&mut self);
    fn reti(&mut self);
    fn im(&mut self, mode: u8);
    fn ld_i_a(&mut self);
    fn ld_r_a(&mut self);
    fn ld_a_i(&mut self);
    fn ld_a_r(&mut self);
    fn rrd(&mut self);
    fn rld(&mut self);
    fn block_ld(&mut self, k: BlockLd);
    fn block_cp(&mut self, k: BlockCp);
    fn block_in(&mut self, k: BlockIn);
    fn block_out(&mut self, k: BlockOut);
    fn noni(&mut self, op: u8);
}

/// Decode and dispatch exactly one opcode.
///
/// Commits the pending index prefix, then consults the table selected by the
/// current prefix state. A prefix opcode only updates decoder state; the
/// caller loops until the state returns to (`Prefix::None`, `IndexReg::Hl`)
/// to run a whole instruction.
pub fn decode<H: Handler>(h: &mut H) {
    let s = h.state_mut();
    s.index_rp = s.next_index_rp;
    s.next_index_rp = IndexReg::Hl;

    match h.state().prefix {
        Prefix::None => decode_unprefixed(h),
        Prefix::Cb => decode_cb_prefixed(h),
        Prefix::Ed => decode_ed_prefixed(h),
    }
}

/// Read the displacement byte plus its 5-tick internal cycle, when an index
/// prefix makes an (HL) operand indexed. Returns 0 otherwise.
fn disp_or_zero<H: Handler>(h: &mut H, memory_operand: bool) -> u8 {
    if memory_operand && h.state().index_rp != IndexReg::Hl {
        let d = h.disp();
        h.exec_5t();
        d
    } else {
        0
    }
}

fn decode_unprefixed<H: Handler>(h: &mut H) {
    let op = h.fetch();
    let x = (op >> 6) & 3;
    let y = (op >> 3) & 7;
    let z = op & 7;
    let p = (y >> 1) & 3;
    let q = y & 1;

    match x {
        0 => match z {
            0 => match y {
                // NOP  f(4)
                0 => h.nop(),
                // EX AF, AF'  f(4)
                1 => h.ex_af_alt_af(),
                // DJNZ d  f(5) r(3) + e(5)
                2 => {
                    h.fetch_5t();
                    let d = h.disp();
                    h.djnz(d);
                }
                // JR d  f(4) r(3) e(5)
                3 => {
                    let d = h.disp();
                    h.jr(d);
                }
                // JR cc[y-4], d  f(4) r(3) + e(5)
                _ => {
                    let cc = Condition::from_bits(y - 4);
                    let d = h.disp();
                    h.jr_cc(cc, d);
                }
            },
            1 => {
                if q == 0 {
                    // LD rp[p], nn  f(4) r(3) r(3)
                    let rp = Reg16::from_bits(p);
                    let nn = h.imm16();
                    h.ld_rp_nn(rp, nn);
                } else {
                    // ADD HL, rp[p]  f(4) e(4) e(3)
                    h.add_irp_rp(Reg16::from_bits(p));
                }
            }
            2 => match y {
                // LD (BC)/(DE), A and LD A, (BC)/(DE)  f(4) w(3)/r(3)
                0 => h.ld_at_rp_a(Reg16::Bc),
                1 => h.ld_a_at_rp(Reg16::Bc),
                2 => h.ld_at_rp_a(Reg16::De),
                3 => h.ld_a_at_rp(Reg16::De),
                // LD (nn), HL  f(4) r(3) r(3) w(3) w(3)
                4 => {
                    let nn = h.imm16();
                    h.ld_at_nn_irp(nn);
                }
                // LD HL, (nn)  f(4) r(3) r(3) r(3) r(3)
                5 => {
                    let nn = h.imm16();
                    h.ld_irp_at_nn(nn);
                }
                // LD (nn), A  f(4) r(3) r(3) w(3)
                6 => {
                    let nn = h.imm16();
                    h.ld_at_nn_a(nn);
                }
                // LD A, (nn)  f(4) r(3) r(3) r(3)
                _ => {
                    let nn = h.imm16();
                    h.ld_a_at_nn(nn);
                }
            },
            3 => {
                // INC/DEC rp[p]  f(6)
                h.fetch_6t();
                let rp = Reg16::from_bits(p);
                if q == 0 {
                    h.inc_rp(rp);
                } else {
                    h.dec_rp(rp);
                }
            }
            // INC r[y]  f(4) / (HL): f(4) r(4) w(3) / (i+d): f(4) f(4) r(3) e(5) r(4) w(3)
            4 => {
                let r = Reg8::from_bits(y);
                let d = disp_or_zero(h, r == Reg8::AtHl);
                h.inc_r(r, d);
            }
            // DEC r[y]  timing as INC
            5 => {
                let r = Reg8::from_bits(y);
                let d = disp_or_zero(h, r == Reg8::AtHl);
                h.dec_r(r, d);
            }
            6 => {
                // LD r[y], n  f(4) r(3) / (HL): f(4) r(3) w(3)
                // LD (i+d), n  f(4) f(4) r(3) r(5) w(3)
                let r = Reg8::from_bits(y);
                if r == Reg8::AtHl && h.state().index_rp != IndexReg::Hl {
                    let d = h.disp();
                    let n = h.imm8_5t();
                    h.ld_r_n(r, d, n);
                } else {
                    let n = h.imm8();
                    h.ld_r_n(r, 0, n);
                }
            }
            _ => match y {
                0 => h.rlca(),
                1 => h.rrca(),
                2 => h.rla(),
                3 => h.rra(),
                4 => h.daa(),
                5 => h.cpl(),
                6 => h.scf(),
                _ => h.ccf(),
            },
        },
        1 => {
            // LD r[y], r[z], with HALT in place of LD (HL), (HL)
            if op == 0x76 {
                h.halt();
            } else {
                let rd = Reg8::from_bits(y);
                let rs = Reg8::from_bits(z);
                let d = disp_or_zero(h, rd == Reg8::AtHl || rs == Reg8::AtHl);
                h.ld_r_r(rd, rs, d);
            }
        }
        2 => {
            // alu[y] r[z]  f(4) / (HL): f(4) r(3) / (i+d): f(4) f(4) r(3) e(5) r(3)
            let k = Alu::from_bits(y);
            let r = Reg8::from_bits(z);
            let d = disp_or_zero(h, r == Reg8::AtHl);
            h.alu_r(k, r, d);
        }
        _ => match z {
            // RET cc[y]  f(5) + r(3) r(3)
            0 => {
                h.fetch_5t();
                h.ret_cc(Condition::from_bits(y));
            }
            1 => {
                if q == 0 {
                    // POP rp2[p]  f(4) r(3) r(3)
                    h.pop_rp(Reg16Stack::from_bits(p));
                } else {
                    match p {
                        // RET  f(4) r(3) r(3)
                        0 => h.ret(),
                        // EXX  f(4)
                        1 => h.exx(),
                        // JP (HL)  f(4)
                        2 => h.jp_irp(),
                        // LD SP, HL  f(6)
                        _ => {
                            h.fetch_6t();
                            h.ld_sp_irp();
                        }
                    }
                }
            }
            // JP cc[y], nn  f(4) r(3) r(3)
            2 => {
                let cc = Condition::from_bits(y);
                let nn = h.imm16();
                h.jp_cc_nn(cc, nn);
            }
            3 => match y {
                // JP nn  f(4) r(3) r(3)
                0 => {
                    let nn = h.imm16();
                    h.jp_nn(nn);
                }
                1 => h.cb_prefix(),
                // OUT (n), A  f(4) r(3) o(4)
                2 => {
                    let n = h.imm8();
                    h.out_n_a(n);
                }
                // IN A, (n)  f(4) r(3) i(4)
                3 => {
                    let n = h.imm8();
                    h.in_a_n(n);
                }
                // EX (SP), HL  f(4) r(3) r(4) w(3) w(5)
                4 => h.ex_at_sp_irp(),
                // EX DE, HL  f(4)
                5 => h.ex_de_hl(),
                6 => h.di(),
                _ => h.ei(),
            },
            // CALL cc[y], nn  f(4) r(3) r(3) + r(+1) w(3) w(3)
            4 => h.call_cc(Condition::from_bits(y)),
            5 => {
                if q == 0 {
                    // PUSH rp2[p]  f(5) w(3) w(3)
                    h.fetch_5t();
                    h.push_rp(Reg16Stack::from_bits(p));
                } else {
                    match p {
                        // CALL nn  f(4) r(3) r(4) w(3) w(3)
                        0 => {
                            let nn = h.imm16_call();
                            h.call_nn(nn);
                        }
                        // DD prefix (IX-indexed instructions).
                        1 => h.set_next_index_rp(IndexReg::Ix),
                        // ED prefix.
                        2 => h.ed_prefix(),
                        // FD prefix (IY-indexed instructions).
                        _ => h.set_next_index_rp(IndexReg::Iy),
                    }
                }
            }
            // alu[y] n  f(4) r(3)
            6 => {
                let k = Alu::from_bits(y);
                let n = h.imm8();
                h.alu_n(k, n);
            }
            // RST y*8  f(5) w(3) w(3)
            _ => {
                h.fetch_5t();
                h.rst(y * 8);
            }
        },
    }
}

/// The CB table. Doubly special under an index prefix: the displacement byte
/// sits before the opcode (`DD CB d op`), and the opcode fetch costs an extra
/// tick.
fn decode_cb_prefixed<H: Handler>(h: &mut H) {
    let d = if h.state().index_rp != IndexReg::Hl {
        h.disp()
    } else {
        0
    };

    let op = h.fetch();
    if h.state().index_rp != IndexReg::Hl {
        h.fetch_5t();
    }

    // The prefix is spent no matter how dispatch below exits.
    h.state_mut().prefix = Prefix::None;

    let x = (op >> 6) & 3;
    let y = (op >> 3) & 7;
    let z = op & 7;
    let r = Reg8::from_bits(z);

    match x {
        // rot[y] r[z]  f(4) f(4) / (HL): + r(4) w(3)
        0 => h.rot(Rot::from_bits(y), r, d),
        // BIT y, r[z]  f(4) f(4) / (HL): + r(4) — never writes back
        1 => h.bit(y, r, d),
        // RES y, r[z]  f(4) f(4) / (HL): + r(4) w(3)
        2 => h.res(y, r, d),
        // SET y, r[z]  f(4) f(4) / (HL): + r(4) w(3)
        _ => h.set(y, r, d),
    }
}

fn decode_ed_prefixed<H: Handler>(h: &mut H) {
    let op = h.fetch();

    // The prefix is spent no matter how dispatch below exits.
    h.state_mut().prefix = Prefix::None;

    let x = (op >> 6) & 3;
    let y = (op >> 3) & 7;
    let z = op & 7;
    let p = (y >> 1) & 3;
    let q = y & 1;

    match x {
        1 => match z {
            // IN r[y], (C)  f(4) f(4) i(4)
            0 => h.in_r_c(Reg8::from_bits(y)),
            // OUT (C), r[y]  f(4) f(4) o(4)
            1 => h.out_c_r(Reg8::from_bits(y)),
            // SBC/ADC HL, rp[p]  f(4) f(4) e(4) e(3)
            2 => {
                let rp = Reg16::from_bits(p);
                if q == 0 {
                    h.sbc_hl_rp(rp);
                } else {
                    h.adc_hl_rp(rp);
                }
            }
            // LD (nn), rp[p] / LD rp[p], (nn)  f(4) f(4) r(3) r(3) + w(3) w(3) / r(3) r(3)
            3 => {
                let rp = Reg16::from_bits(p);
                let nn = h.imm16();
                if q == 0 {
                    h.ld_at_nn_rp(nn, rp);
                } else {
                    h.ld_rp_at_nn(rp, nn);
                }
            }
            // NEG  f(4) f(4)
            4 => h.neg(),
            // RETN/RETI  f(4) f(4) r(3) r(3)
            5 => {
                if y == 1 {
                    h.reti();
                } else {
                    h.retn();
                }
            }
            // IM im[y]  f(4) f(4)
            6 => h.im(if y & 3 < 2 { 0 } else { (y & 3) - 1 }),
            _ => match y {
                // LD I, A  f(4) f(5)
                0 => {
                    h.fetch_5t();
                    h.ld_i_a();
                }
                // LD R, A  f(4) f(5)
                1 => {
                    h.fetch_5t();
                    h.ld_r_a();
                }
                // LD A, I  f(4) f(5)
                2 => {
                    h.fetch_5t();
                    h.ld_a_i();
                }
                // LD A, R  f(4) f(5)
                3 => {
                    h.fetch_5t();
                    h.ld_a_r();
                }
                // RRD/RLD  f(4) f(4) r(3) e(4) w(3)
                4 => h.rrd(),
                5 => h.rld(),
                _ => h.illegal(op),
            },
        },
        2 if z <= 3 => {
            if y < 4 {
                h.noni(op);
            } else {
                match z {
                    // LDI/LDD/LDIR/LDDR  f(4) f(4) r(3) w(5) + e(5)
                    0 => h.block_ld(BlockLd::from_bits(y - 4)),
                    // CPI/CPD/CPIR/CPDR  f(4) f(4) r(3) e(5) + e(5)
                    1 => h.block_cp(BlockCp::from_bits(y - 4)),
                    // INI/IND/INIR/INDR  f(4) f(5) i(4) w(3) + e(5)
                    2 => {
                        h.fetch_5t();
                        h.block_in(BlockIn::from_bits(y - 4));
                    }
                    // OUTI/OUTD/OTIR/OTDR  f(4) f(5) r(3) o(4) + e(5)
                    _ => {
                        h.fetch_5t();
                        h.block_out(BlockOut::from_bits(y - 4));
                    }
                }
            }
        }
        _ => h.illegal(op),
    }
}
