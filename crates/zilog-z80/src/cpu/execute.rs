//! Instruction execution for the Z80.

#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use sim_core::{Bus, IoBus};

use crate::alu;
use crate::bits::{high8, low8, make16};
use crate::decode::{
    Alu, BlockCp, BlockIn, BlockLd, BlockOut, Condition, DecoderState, Handler, IndexReg, Reg16,
    Reg16Stack, Reg8, Rot,
};
use crate::flags::{parity, sz53, sz53p, CF, HF, NF, PF, SF, XF, YF, ZF};

use super::Exec;

impl<B: Bus + IoBus> Handler for Exec<'_, B> {
    fn state(&self) -> &DecoderState {
        &self.cpu.decoder
    }

    fn state_mut(&mut self) -> &mut DecoderState {
        &mut self.cpu.decoder
    }

    fn fetch(&mut self) -> u8 {
        let pc = self.cpu.regs.pc;
        let op = self.fetch_cycle(pc);
        self.cpu.regs.pc = pc.wrapping_add(1);
        op
    }

    fn fetch_5t(&mut self) {
        self.tick(1);
    }

    fn fetch_6t(&mut self) {
        self.tick(2);
    }

    fn imm8(&mut self) -> u8 {
        self.imm8_cycle(3)
    }

    fn imm8_5t(&mut self) -> u8 {
        self.imm8_cycle(5)
    }

    fn imm16(&mut self) -> u16 {
        let lo = self.imm8_cycle(3);
        let hi = self.imm8_cycle(3);
        make16(hi, lo)
    }

    fn imm16_call(&mut self) -> u16 {
        let lo = self.imm8_cycle(3);
        let hi = self.imm8_cycle(4);
        make16(hi, lo)
    }

    fn disp(&mut self) -> u8 {
        self.imm8_cycle(3)
    }

    fn exec_5t(&mut self) {
        self.internal(5);
    }

    fn illegal(&mut self, op: u8) {
        panic!(
            "unknown opcode 0x{op:02x} at 0x{:04x}",
            self.cpu.last_read_addr
        );
    }

    fn set_next_index_rp(&mut self, irp: IndexReg) {
        self.cpu.decoder.next_index_rp = irp;
        // No interrupt between a DD/FD prefix and its target opcode.
        self.cpu.disable_int = true;
    }

    // === Unprefixed table ===

    fn nop(&mut self) {}

    fn halt(&mut self) {
        self.cpu.regs.halted = true;
    }

    fn ld_r_r(&mut self, rd: Reg8, rs: Reg8, d: u8) {
        let v = self.get_r(rs, d, false);
        self.set_r(rd, d, v);
    }

    fn ld_r_n(&mut self, r: Reg8, d: u8, n: u8) {
        self.set_r(r, d, n);
    }

    fn ld_a_at_rp(&mut self, rp: Reg16) {
        let addr = match rp {
            Reg16::Bc => self.cpu.regs.bc,
            Reg16::De => self.cpu.regs.de,
            _ => unreachable!(),
        };
        self.cpu.regs.wz = addr.wrapping_add(1);
        let v = self.read_cycle(addr, 3);
        self.cpu.regs.set_a(v);
    }

    fn ld_at_rp_a(&mut self, rp: Reg16) {
        let addr = match rp {
            Reg16::Bc => self.cpu.regs.bc,
            Reg16::De => self.cpu.regs.de,
            _ => unreachable!(),
        };
        let a = self.cpu.regs.a();
        self.cpu.regs.wz = make16(a, low8(addr).wrapping_add(1));
        self.write_cycle(addr, a, 3);
    }

    fn ld_rp_nn(&mut self, rp: Reg16, nn: u16) {
        self.set_rp(rp, nn);
    }

    fn ld_irp_at_nn(&mut self, nn: u16) {
        let lo = self.read_cycle(nn, 3);
        let hi_addr = nn.wrapping_add(1);
        self.cpu.regs.wz = hi_addr;
        let hi = self.read_cycle(hi_addr, 3);
        self.set_index_rp(make16(hi, lo));
    }

    fn ld_at_nn_irp(&mut self, nn: u16) {
        let v = self.index_rp();
        self.write_cycle(nn, low8(v), 3);
        let hi_addr = nn.wrapping_add(1);
        self.cpu.regs.wz = hi_addr;
        self.write_cycle(hi_addr, high8(v), 3);
    }

    fn ld_a_at_nn(&mut self, nn: u16) {
        self.cpu.regs.wz = nn.wrapping_add(1);
        let v = self.read_cycle(nn, 3);
        self.cpu.regs.set_a(v);
    }

    fn ld_at_nn_a(&mut self, nn: u16) {
        let a = self.cpu.regs.a();
        self.cpu.regs.wz = make16(a, low8(nn).wrapping_add(1));
        self.write_cycle(nn, a, 3);
    }

    fn ld_sp_irp(&mut self) {
        self.cpu.regs.sp = self.index_rp();
    }

    fn inc_r(&mut self, r: Reg8, d: u8) {
        let v = self.get_r(r, d, true);
        let res = alu::inc8(v);
        self.set_r(r, d, res.value);
        let f = self.cpu.regs.f();
        self.cpu.regs.set_f((f & CF) | res.flags);
    }

    fn dec_r(&mut self, r: Reg8, d: u8) {
        let v = self.get_r(r, d, true);
        let res = alu::dec8(v);
        self.set_r(r, d, res.value);
        let f = self.cpu.regs.f();
        self.cpu.regs.set_f((f & CF) | res.flags);
    }

    fn inc_rp(&mut self, rp: Reg16) {
        let v = self.get_rp(rp).wrapping_add(1);
        self.set_rp(rp, v);
    }

    fn dec_rp(&mut self, rp: Reg16) {
        let v = self.get_rp(rp).wrapping_sub(1);
        self.set_rp(rp, v);
    }

    fn alu_r(&mut self, k: Alu, r: Reg8, d: u8) {
        let v = self.get_r(r, d, false);
        self.do_alu(k, v);
    }

    fn alu_n(&mut self, k: Alu, n: u8) {
        self.do_alu(k, n);
    }

    fn add_irp_rp(&mut self, rp: Reg16) {
        let i = self.index_rp();
        let n = self.get_rp(rp);
        self.internal(4);
        self.internal(3);
        let (r, flags) = alu::add16(i, n);
        self.cpu.regs.wz = i.wrapping_add(1);
        self.set_index_rp(r);
        let f = self.cpu.regs.f();
        self.cpu.regs.set_f((f & (SF | ZF | PF)) | flags);
    }

    fn rlca(&mut self) {
        let a = self.cpu.regs.a().rotate_left(1);
        self.cpu.regs.set_a(a);
        let f = self.cpu.regs.f();
        self.cpu.regs
            .set_f((f & (SF | ZF | PF)) | (a & (YF | XF)) | if a & 0x01 != 0 { CF } else { 0 });
    }

    fn rrca(&mut self) {
        let a = self.cpu.regs.a().rotate_right(1);
        self.cpu.regs.set_a(a);
        let f = self.cpu.regs.f();
        self.cpu.regs
            .set_f((f & (SF | ZF | PF)) | (a & (YF | XF)) | if a & 0x80 != 0 { CF } else { 0 });
    }

    fn rla(&mut self) {
        let a = self.cpu.regs.a();
        let f = self.cpu.regs.f();
        let r = (a << 1) | (f & CF);
        self.cpu.regs.set_a(r);
        self.cpu.regs
            .set_f((f & (SF | ZF | PF)) | (r & (YF | XF)) | if a & 0x80 != 0 { CF } else { 0 });
    }

    fn rra(&mut self) {
        let a = self.cpu.regs.a();
        let f = self.cpu.regs.f();
        let r = (a >> 1) | ((f & CF) << 7);
        self.cpu.regs.set_a(r);
        self.cpu.regs
            .set_f((f & (SF | ZF | PF)) | (r & (YF | XF)) | if a & 0x01 != 0 { CF } else { 0 });
    }

    fn daa(&mut self) {
        let res = alu::daa(self.cpu.regs.a(), self.cpu.regs.f());
        self.cpu.regs.set_a(res.value);
        self.cpu.regs.set_f(res.flags);
    }

    fn cpl(&mut self) {
        let a = !self.cpu.regs.a();
        self.cpu.regs.set_a(a);
        let f = self.cpu.regs.f();
        self.cpu.regs
            .set_f((f & (SF | ZF | PF | CF)) | (a & (YF | XF)) | HF | NF);
    }

    fn scf(&mut self) {
        let a = self.cpu.regs.a();
        let f = self.cpu.regs.f();
        self.cpu.regs
            .set_f((f & (SF | ZF | PF)) | (a & (YF | XF)) | CF);
    }

    fn ccf(&mut self) {
        let a = self.cpu.regs.a();
        let f = self.cpu.regs.f();
        let carry = f & CF != 0;
        // H receives the old carry; C flips.
        self.cpu.regs.set_f(
            (f & (SF | ZF | PF))
                | (a & (YF | XF))
                | if carry { HF } else { CF },
        );
    }

    fn ex_af_alt_af(&mut self) {
        self.cpu.regs.ex_af();
    }

    fn ex_de_hl(&mut self) {
        self.cpu.regs.ex_de_hl();
    }

    fn ex_at_sp_irp(&mut self) {
        let sp = self.cpu.regs.sp;
        let lo = self.read_cycle(sp, 3);
        let hi = self.read_cycle(sp.wrapping_add(1), 4);
        let old = self.index_rp();
        self.write_cycle(sp.wrapping_add(1), high8(old), 3);
        self.write_cycle(sp, low8(old), 5);
        let new = make16(hi, lo);
        self.cpu.regs.wz = new;
        self.set_index_rp(new);
    }

    fn exx(&mut self) {
        self.cpu.regs.exx();
    }

    fn jp_nn(&mut self, nn: u16) {
        self.cpu.regs.wz = nn;
        self.cpu.regs.pc = nn;
    }

    fn jp_cc_nn(&mut self, cc: Condition, nn: u16) {
        self.cpu.regs.wz = nn;
        if self.condition(cc) {
            self.cpu.regs.pc = nn;
        }
    }

    fn jp_irp(&mut self) {
        self.cpu.regs.pc = self.index_rp();
    }

    fn jr(&mut self, d: u8) {
        self.relative_jump(d);
    }

    fn jr_cc(&mut self, cc: Condition, d: u8) {
        if self.condition(cc) {
            self.relative_jump(d);
        }
    }

    fn djnz(&mut self, d: u8) {
        let b = self.cpu.regs.b().wrapping_sub(1);
        self.cpu.regs.set_b(b);
        if b != 0 {
            self.relative_jump(d);
        }
    }

    fn call_nn(&mut self, nn: u16) {
        self.do_call(nn);
    }

    fn call_cc(&mut self, cc: Condition) {
        let taken = self.condition(cc);
        let lo = self.imm8_cycle(3);
        let hi = self.imm8_cycle(if taken { 4 } else { 3 });
        let nn = make16(hi, lo);
        self.cpu.regs.wz = nn;
        if taken {
            let pc = self.cpu.regs.pc;
            self.push_word(pc);
            self.cpu.regs.pc = nn;
        }
    }

    fn ret(&mut self) {
        self.do_return();
    }

    fn ret_cc(&mut self, cc: Condition) {
        if self.condition(cc) {
            self.do_return();
        }
    }

    fn rst(&mut self, target: u8) {
        let pc = self.cpu.regs.pc;
        self.push_word(pc);
        self.cpu.regs.wz = u16::from(target);
        self.cpu.regs.pc = u16::from(target);
    }

    fn push_rp(&mut self, rp: Reg16Stack) {
        let v = self.get_rp2(rp);
        self.push_word(v);
    }

    fn pop_rp(&mut self, rp: Reg16Stack) {
        let v = self.pop_word();
        self.set_rp2(rp, v);
    }

    fn in_a_n(&mut self, n: u8) {
        let port = make16(self.cpu.regs.a(), n);
        let v = self.input_cycle(port);
        self.cpu.regs.wz = port.wrapping_add(1);
        self.cpu.regs.set_a(v);
    }

    fn out_n_a(&mut self, n: u8) {
        let a = self.cpu.regs.a();
        self.output_cycle(make16(a, n), a);
        self.cpu.regs.wz = make16(a, n.wrapping_add(1));
    }

    fn di(&mut self) {
        self.cpu.regs.iff1 = false;
        self.cpu.regs.iff2 = false;
    }

    fn ei(&mut self) {
        self.cpu.regs.iff1 = true;
        self.cpu.regs.iff2 = true;
        // Interrupts stay blocked until the following instruction retires.
        self.cpu.disable_int = true;
    }

    // === CB table ===

    fn rot(&mut self, op: Rot, r: Reg8, d: u8) {
        let access_r = if self.cpu.decoder.index_rp != IndexReg::Hl {
            Reg8::AtHl
        } else {
            r
        };
        let v = self.get_r(access_r, d, true);
        let carry = self.cpu.regs.f() & CF != 0;
        let res = match op {
            Rot::Rlc => alu::rlc8(v),
            Rot::Rrc => alu::rrc8(v),
            Rot::Rl => alu::rl8(v, carry),
            Rot::Rr => alu::rr8(v, carry),
            Rot::Sla => alu::sla8(v),
            Rot::Sra => alu::sra8(v),
            Rot::Sll => alu::sll8(v),
            Rot::Srl => alu::srl8(v),
        };
        self.set_r(access_r, d, res.value);
        if access_r != r {
            // Indexed form also lands the result in the named register.
            self.set_r(r, 0, res.value);
        }
        self.cpu.regs.set_f(res.flags);
    }

    fn bit(&mut self, b: u8, r: Reg8, d: u8) {
        let v = self.get_r(r, d, true);
        let m = v & (1 << b);
        let mut f = (self.cpu.regs.f() & CF)
            | HF
            | if m != 0 { m & SF } else { ZF | PF };
        // For memory operands the X/Y flags leak from MEMPTR's high byte.
        let src = if self.cpu.decoder.index_rp != IndexReg::Hl || r == Reg8::AtHl {
            high8(self.cpu.regs.wz)
        } else {
            v
        };
        f |= src & (YF | XF);
        self.cpu.regs.set_f(f);
    }

    fn res(&mut self, b: u8, r: Reg8, d: u8) {
        let access_r = if self.cpu.decoder.index_rp != IndexReg::Hl {
            Reg8::AtHl
        } else {
            r
        };
        let v = self.get_r(access_r, d, true) & !(1 << b);
        self.set_r(access_r, d, v);
        if access_r != r {
            self.set_r(r, 0, v);
        }
    }

    fn set(&mut self, b: u8, r: Reg8, d: u8) {
        let access_r = if self.cpu.decoder.index_rp != IndexReg::Hl {
            Reg8::AtHl
        } else {
            r
        };
        let v = self.get_r(access_r, d, true) | (1 << b);
        self.set_r(access_r, d, v);
        if access_r != r {
            self.set_r(r, 0, v);
        }
    }

    // === ED table ===

    fn in_r_c(&mut self, r: Reg8) {
        let port = self.cpu.regs.bc;
        let v = self.input_cycle(port);
        self.cpu.regs.wz = port.wrapping_add(1);
        if r != Reg8::AtHl {
            self.set_r(r, 0, v);
        }
        let f = self.cpu.regs.f();
        self.cpu.regs.set_f((f & CF) | sz53p(v));
    }

    fn out_c_r(&mut self, r: Reg8) {
        let port = self.cpu.regs.bc;
        // The undocumented slot outputs 0.
        let v = if r == Reg8::AtHl {
            0
        } else {
            self.get_r(r, 0, false)
        };
        self.output_cycle(port, v);
        self.cpu.regs.wz = port.wrapping_add(1);
    }

    fn sbc_hl_rp(&mut self, rp: Reg16) {
        let hl = self.cpu.regs.hl;
        let n = self.get_rp(rp);
        let carry = self.cpu.regs.f() & CF != 0;
        self.internal(4);
        self.internal(3);
        let (r, flags) = alu::sbc16(hl, n, carry);
        self.cpu.regs.wz = hl.wrapping_add(1);
        self.cpu.regs.hl = r;
        self.cpu.regs.set_f(flags);
    }

    fn adc_hl_rp(&mut self, rp: Reg16) {
        let hl = self.cpu.regs.hl;
        let n = self.get_rp(rp);
        let carry = self.cpu.regs.f() & CF != 0;
        self.internal(4);
        self.internal(3);
        let (r, flags) = alu::adc16(hl, n, carry);
        self.cpu.regs.wz = hl.wrapping_add(1);
        self.cpu.regs.hl = r;
        self.cpu.regs.set_f(flags);
    }

    fn ld_at_nn_rp(&mut self, nn: u16, rp: Reg16) {
        let v = self.get_rp(rp);
        self.write_cycle(nn, low8(v), 3);
        let hi_addr = nn.wrapping_add(1);
        self.cpu.regs.wz = hi_addr;
        self.write_cycle(hi_addr, high8(v), 3);
    }

    fn ld_rp_at_nn(&mut self, rp: Reg16, nn: u16) {
        let lo = self.read_cycle(nn, 3);
        let hi_addr = nn.wrapping_add(1);
        self.cpu.regs.wz = hi_addr;
        let hi = self.read_cycle(hi_addr, 3);
        self.set_rp(rp, make16(hi, lo));
    }

    fn neg(&mut self) {
        let res = alu::sub8(0, self.cpu.regs.a(), false);
        self.cpu.regs.set_a(res.value);
        self.cpu.regs.set_f(res.flags);
    }

    fn retn(&mut self) {
        self.do_return();
        self.cpu.regs.iff1 = self.cpu.regs.iff2;
    }

    fn reti(&mut self) {
        self.do_return();
        self.cpu.regs.iff1 = self.cpu.regs.iff2;
    }

    fn im(&mut self, mode: u8) {
        self.cpu.regs.im = mode;
    }

    fn ld_i_a(&mut self) {
        let a = self.cpu.regs.a();
        self.cpu.regs.set_i(a);
    }

    fn ld_r_a(&mut self) {
        let a = self.cpu.regs.a();
        self.cpu.regs.set_r(a);
    }

    fn ld_a_i(&mut self) {
        let v = self.cpu.regs.i();
        self.ld_a_ir(v);
    }

    fn ld_a_r(&mut self) {
        let v = self.cpu.regs.r();
        self.ld_a_ir(v);
    }

    fn rrd(&mut self) {
        let hl = self.cpu.regs.hl;
        let a = self.cpu.regs.a();
        let v = self.read_cycle(hl, 3);
        self.internal(4);
        let new_v = (a << 4) | (v >> 4);
        let new_a = (a & 0xF0) | (v & 0x0F);
        self.write_cycle(hl, new_v, 3);
        self.cpu.regs.wz = hl.wrapping_add(1);
        self.cpu.regs.set_a(new_a);
        let f = self.cpu.regs.f();
        self.cpu.regs.set_f((f & CF) | sz53p(new_a));
    }

    fn rld(&mut self) {
        let hl = self.cpu.regs.hl;
        let a = self.cpu.regs.a();
        let v = self.read_cycle(hl, 3);
        self.internal(4);
        let new_v = (v << 4) | (a & 0x0F);
        let new_a = (a & 0xF0) | (v >> 4);
        self.write_cycle(hl, new_v, 3);
        self.cpu.regs.wz = hl.wrapping_add(1);
        self.cpu.regs.set_a(new_a);
        let f = self.cpu.regs.f();
        self.cpu.regs.set_f((f & CF) | sz53p(new_a));
    }

    fn block_ld(&mut self, k: BlockLd) {
        let hl = self.cpu.regs.hl;
        let de = self.cpu.regs.de;
        let v = self.read_cycle(hl, 3);
        self.write_cycle(de, v, 5);

        let bc = self.cpu.regs.bc.wrapping_sub(1);
        self.cpu.regs.bc = bc;
        let step = if k.decrements() { 0xFFFFu16 } else { 1 };
        self.cpu.regs.hl = hl.wrapping_add(step);
        self.cpu.regs.de = de.wrapping_add(step);

        let t = v.wrapping_add(self.cpu.regs.a());
        let f = self.cpu.regs.f();
        self.cpu.regs.set_f(
            (f & (SF | ZF | CF))
                | ((t << 4) & YF)
                | (t & XF)
                | if bc != 0 { PF } else { 0 },
        );

        if k.repeats() && bc != 0 {
            self.internal(5);
            let pc = self.cpu.regs.pc.wrapping_sub(2);
            self.cpu.regs.pc = pc;
            self.cpu.regs.wz = pc.wrapping_add(1);
        }
    }

    fn block_cp(&mut self, k: BlockCp) {
        let hl = self.cpu.regs.hl;
        let a = self.cpu.regs.a();
        let v = self.read_cycle(hl, 3);
        self.internal(5);

        let r = a.wrapping_sub(v);
        let half = (r ^ a ^ v) & HF;
        let bc = self.cpu.regs.bc.wrapping_sub(1);
        self.cpu.regs.bc = bc;
        let step = if k.decrements() { 0xFFFFu16 } else { 1 };
        self.cpu.regs.hl = hl.wrapping_add(step);
        self.cpu.regs.wz = self.cpu.regs.wz.wrapping_add(step);

        // Y/X come from A - (HL) - H, with bit 1 feeding Y.
        let t = r.wrapping_sub(half >> 4);
        let f = self.cpu.regs.f();
        self.cpu.regs.set_f(
            (f & CF)
                | NF
                | (r & SF)
                | if r == 0 { ZF } else { 0 }
                | half
                | ((t << 4) & YF)
                | (t & XF)
                | if bc != 0 { PF } else { 0 },
        );

        if k.repeats() && bc != 0 && r != 0 {
            self.internal(5);
            let pc = self.cpu.regs.pc.wrapping_sub(2);
            self.cpu.regs.pc = pc;
            self.cpu.regs.wz = pc.wrapping_add(1);
        }
    }

    fn block_in(&mut self, k: BlockIn) {
        let bc = self.cpu.regs.bc;
        let hl = self.cpu.regs.hl;
        let v = self.input_cycle(bc);
        let step = if k.decrements() { 0xFFFFu16 } else { 1 };
        self.cpu.regs.wz = bc.wrapping_add(step);

        let b = self.cpu.regs.b().wrapping_sub(1);
        self.cpu.regs.set_b(b);
        self.write_cycle(hl, v, 3);
        self.cpu.regs.hl = hl.wrapping_add(step);

        let c_adj = if k.decrements() {
            self.cpu.regs.c().wrapping_sub(1)
        } else {
            self.cpu.regs.c().wrapping_add(1)
        };
        let t = u16::from(v) + u16::from(c_adj);
        self.cpu.regs.set_f(block_io_flags(b, v, t));

        if k.repeats() && b != 0 {
            self.internal(5);
            self.cpu.regs.pc = self.cpu.regs.pc.wrapping_sub(2);
        }
    }

    fn block_out(&mut self, k: BlockOut) {
        let hl = self.cpu.regs.hl;
        let b = self.cpu.regs.b().wrapping_sub(1);
        self.cpu.regs.set_b(b);
        let v = self.read_cycle(hl, 3);
        let port = self.cpu.regs.bc;
        self.output_cycle(port, v);
        let step = if k.decrements() { 0xFFFFu16 } else { 1 };
        self.cpu.regs.hl = hl.wrapping_add(step);
        self.cpu.regs.wz = port.wrapping_add(step);

        let t = u16::from(v) + u16::from(self.cpu.regs.l());
        self.cpu.regs.set_f(block_io_flags(b, v, t));

        if k.repeats() && b != 0 {
            self.internal(5);
            self.cpu.regs.pc = self.cpu.regs.pc.wrapping_sub(2);
        }
    }

    fn noni(&mut self, _op: u8) {
        // No operation, but interrupts are inhibited for one instruction.
        self.cpu.disable_int = true;
    }
}

/// Flags for the block I/O family: S/Z/Y/X from the new B, N from bit 7 of
/// the transferred byte, H and C from the 9-bit transfer sum, P from its
/// low bits folded with B.
fn block_io_flags(b: u8, v: u8, t: u16) -> u8 {
    sz53(b)
        | if v & 0x80 != 0 { NF } else { 0 }
        | if t > 0xFF { HF | CF } else { 0 }
        | if parity((t & 7) as u8 ^ b) { PF } else { 0 }
}

impl<B: Bus + IoBus> Exec<'_, B> {
    fn do_alu(&mut self, k: Alu, n: u8) {
        let a = self.cpu.regs.a();
        let carry = self.cpu.regs.f() & CF != 0;
        let res = match k {
            Alu::Add => alu::add8(a, n, false),
            Alu::Adc => alu::add8(a, n, carry),
            Alu::Sub => alu::sub8(a, n, false),
            Alu::Sbc => alu::sub8(a, n, carry),
            Alu::And => alu::and8(a, n),
            Alu::Xor => alu::xor8(a, n),
            Alu::Or => alu::or8(a, n),
            Alu::Cp => alu::cp8(a, n),
        };
        if k != Alu::Cp {
            self.cpu.regs.set_a(res.value);
        }
        self.cpu.regs.set_f(res.flags);
    }

    /// LD A,I / LD A,R: S/Z/Y/X from the value, P/V from IFF2, C preserved.
    fn ld_a_ir(&mut self, v: u8) {
        self.cpu.regs.set_a(v);
        let f = self.cpu.regs.f();
        self.cpu.regs.set_f(
            (f & CF) | sz53(v) | if self.cpu.regs.iff2 { PF } else { 0 },
        );
    }
}
