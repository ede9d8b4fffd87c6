//! Property tests for flag formulas, involutions, and accessor round-trips.
//!
//! The flag checks run real instructions through the engine and compare
//! against independently computed expectations, so they cover the whole
//! decode-execute path, not just the ALU helpers.

use proptest::prelude::*;
use sim_core::SimpleBus;
use zilog_z80::{IndexReg, Prefix, Z80, CF, HF, NF, PF, SF, XF, YF, ZF};

/// Run `code` at address 0 for `steps` instructions after `setup`.
fn exec(code: &[u8], steps: u32, setup: impl FnOnce(&mut Z80)) -> (Z80, SimpleBus) {
    let mut cpu = Z80::new();
    let mut bus = SimpleBus::new();
    bus.load(0x0000, code);
    cpu.set_sp(0x8000);
    setup(&mut cpu);
    for _ in 0..steps {
        cpu.step(&mut bus);
    }
    (cpu, bus)
}

fn signed_overflow_add(a: u8, b: u8, c: u8) -> bool {
    let v = i32::from(a as i8) + i32::from(b as i8) + i32::from(c);
    !(-128..=127).contains(&v)
}

fn signed_overflow_sub(a: u8, b: u8, c: u8) -> bool {
    let v = i32::from(a as i8) - i32::from(b as i8) - i32::from(c);
    !(-128..=127).contains(&v)
}

proptest! {
    #[test]
    fn add_a_n_flags(a in any::<u8>(), n in any::<u8>()) {
        let (cpu, _) = exec(&[0xC6, n], 1, |c| c.regs.set_a(a));
        let wide = u16::from(a) + u16::from(n);
        let r = wide as u8;
        let f = cpu.f();
        prop_assert_eq!(cpu.a(), r);
        prop_assert_eq!(f & SF != 0, r & 0x80 != 0);
        prop_assert_eq!(f & ZF != 0, r == 0);
        prop_assert_eq!(f & HF != 0, (a & 0xF) + (n & 0xF) > 0xF);
        prop_assert_eq!(f & PF != 0, signed_overflow_add(a, n, 0));
        prop_assert_eq!(f & NF, 0);
        prop_assert_eq!(f & CF != 0, wide > 0xFF);
        prop_assert_eq!(f & (YF | XF), r & (YF | XF));
    }

    #[test]
    fn adc_a_n_flags(a in any::<u8>(), n in any::<u8>(), carry in any::<bool>()) {
        let (cpu, _) = exec(&[0xCE, n], 1, |c| {
            c.regs.set_a(a);
            c.regs.set_f(if carry { CF } else { 0 });
        });
        let cin = u8::from(carry);
        let wide = u16::from(a) + u16::from(n) + u16::from(cin);
        let r = wide as u8;
        let f = cpu.f();
        prop_assert_eq!(cpu.a(), r);
        prop_assert_eq!(f & HF != 0, (a & 0xF) + (n & 0xF) + cin > 0xF);
        prop_assert_eq!(f & PF != 0, signed_overflow_add(a, n, cin));
        prop_assert_eq!(f & CF != 0, wide > 0xFF);
    }

    #[test]
    fn sbc_a_n_flags(a in any::<u8>(), n in any::<u8>(), carry in any::<bool>()) {
        let (cpu, _) = exec(&[0xDE, n], 1, |c| {
            c.regs.set_a(a);
            c.regs.set_f(if carry { CF } else { 0 });
        });
        let cin = u8::from(carry);
        let r = a.wrapping_sub(n).wrapping_sub(cin);
        let f = cpu.f();
        prop_assert_eq!(cpu.a(), r);
        prop_assert_eq!(f & NF != 0, true);
        prop_assert_eq!(f & HF != 0, (a & 0xF) < (n & 0xF) + cin);
        prop_assert_eq!(f & PF != 0, signed_overflow_sub(a, n, cin));
        prop_assert_eq!(f & CF != 0, u16::from(a) < u16::from(n) + u16::from(cin));
    }

    #[test]
    fn cp_preserves_a_and_takes_xy_from_operand(a in any::<u8>(), n in any::<u8>()) {
        let (cpu, _) = exec(&[0xFE, n], 1, |c| c.regs.set_a(a));
        prop_assert_eq!(cpu.a(), a, "CP writes no result");
        prop_assert_eq!(cpu.f() & (YF | XF), n & (YF | XF));
    }

    #[test]
    fn xor_parity(a in any::<u8>(), n in any::<u8>()) {
        let (cpu, _) = exec(&[0xEE, n], 1, |c| c.regs.set_a(a));
        let r = a ^ n;
        let f = cpu.f();
        prop_assert_eq!(cpu.a(), r);
        prop_assert_eq!(f & PF != 0, r.count_ones() % 2 == 0);
        prop_assert_eq!(f & (HF | NF | CF), 0);
    }

    #[test]
    fn inc_dec_preserve_carry(v in any::<u8>(), carry in any::<bool>()) {
        let f0 = if carry { CF } else { 0 };
        let (cpu, _) = exec(&[0x3C], 1, |c| { c.regs.set_a(v); c.regs.set_f(f0); });
        prop_assert_eq!(cpu.a(), v.wrapping_add(1));
        prop_assert_eq!(cpu.f() & CF, f0);
        prop_assert_eq!(cpu.f() & PF != 0, v == 0x7F, "overflow only at 0x7F");

        let (cpu, _) = exec(&[0x3D], 1, |c| { c.regs.set_a(v); c.regs.set_f(f0); });
        prop_assert_eq!(cpu.a(), v.wrapping_sub(1));
        prop_assert_eq!(cpu.f() & CF, f0);
        prop_assert_eq!(cpu.f() & PF != 0, v == 0x80, "overflow only at 0x80");
    }

    #[test]
    fn adc_hl_rp_flags(hl in any::<u16>(), bc in any::<u16>(), carry in any::<bool>()) {
        let (cpu, _) = exec(&[0xED, 0x4A], 1, |c| {
            c.regs.hl = hl;
            c.regs.bc = bc;
            c.regs.set_f(if carry { CF } else { 0 });
        });
        let cin = u32::from(carry);
        let wide = u32::from(hl) + u32::from(bc) + cin;
        let r = wide as u16;
        let v = i32::from(hl as i16) + i32::from(bc as i16) + cin as i32;
        let f = cpu.f();
        prop_assert_eq!(cpu.hl(), r);
        prop_assert_eq!(f & SF != 0, r & 0x8000 != 0);
        prop_assert_eq!(f & ZF != 0, r == 0);
        prop_assert_eq!(f & PF != 0, !(-32768..=32767).contains(&v));
        prop_assert_eq!(f & CF != 0, wide > 0xFFFF);
        prop_assert_eq!(f & NF, 0);
    }

    #[test]
    fn sbc_hl_rp_flags(hl in any::<u16>(), bc in any::<u16>(), carry in any::<bool>()) {
        let (cpu, _) = exec(&[0xED, 0x42], 1, |c| {
            c.regs.hl = hl;
            c.regs.bc = bc;
            c.regs.set_f(if carry { CF } else { 0 });
        });
        let cin = u32::from(carry);
        let r = hl.wrapping_sub(bc).wrapping_sub(cin as u16);
        let v = i32::from(hl as i16) - i32::from(bc as i16) - cin as i32;
        let f = cpu.f();
        prop_assert_eq!(cpu.hl(), r);
        prop_assert_eq!(f & ZF != 0, r == 0);
        prop_assert_eq!(f & PF != 0, !(-32768..=32767).contains(&v));
        prop_assert_eq!(f & CF != 0, u32::from(hl) < u32::from(bc) + cin);
        prop_assert_eq!(f & NF != 0, true);
    }

    #[test]
    fn exx_is_an_involution(
        bc in any::<u16>(), de in any::<u16>(), hl in any::<u16>(),
        bc2 in any::<u16>(), de2 in any::<u16>(), hl2 in any::<u16>(),
    ) {
        let (cpu, _) = exec(&[0xD9, 0xD9], 2, |c| {
            c.regs.bc = bc;
            c.regs.de = de;
            c.regs.hl = hl;
            c.regs.alt_bc = bc2;
            c.regs.alt_de = de2;
            c.regs.alt_hl = hl2;
        });
        prop_assert_eq!((cpu.bc(), cpu.de(), cpu.hl()), (bc, de, hl));
        prop_assert_eq!(
            (cpu.regs.alt_bc, cpu.regs.alt_de, cpu.regs.alt_hl),
            (bc2, de2, hl2)
        );
    }

    #[test]
    fn ex_de_hl_is_an_involution(de in any::<u16>(), hl in any::<u16>()) {
        let (once, _) = exec(&[0xEB], 1, |c| { c.regs.de = de; c.regs.hl = hl; });
        prop_assert_eq!((once.de(), once.hl()), (hl, de));

        let (twice, _) = exec(&[0xEB, 0xEB], 2, |c| { c.regs.de = de; c.regs.hl = hl; });
        prop_assert_eq!((twice.de(), twice.hl()), (de, hl));
    }

    #[test]
    fn ex_af_is_an_involution(af in any::<u16>(), af2 in any::<u16>()) {
        let (cpu, _) = exec(&[0x08, 0x08], 2, |c| {
            c.regs.af = af;
            c.regs.alt_af = af2;
        });
        prop_assert_eq!((cpu.af(), cpu.regs.alt_af), (af, af2));
    }

    #[test]
    fn push_pop_round_trips(v in any::<u16>()) {
        // PUSH BC; POP DE
        let (cpu, _) = exec(&[0xC5, 0xD1], 2, |c| c.regs.bc = v);
        prop_assert_eq!(cpu.de(), v);
        prop_assert_eq!(cpu.sp(), 0x8000, "SP unchanged after push/pop pair");
    }

    #[test]
    fn register_accessors_round_trip(v in any::<u16>(), b in any::<u8>()) {
        let mut cpu = Z80::new();
        cpu.regs.af = v;
        prop_assert_eq!((cpu.regs.a(), cpu.regs.f()), ((v >> 8) as u8, v as u8));
        cpu.regs.bc = v;
        prop_assert_eq!((cpu.regs.b(), cpu.regs.c()), ((v >> 8) as u8, v as u8));
        cpu.regs.set_h(b);
        prop_assert_eq!(cpu.regs.h(), b);
        prop_assert_eq!(cpu.hl() >> 8, u16::from(b));
        cpu.regs.set_i(b);
        prop_assert_eq!(cpu.regs.i(), b);
        cpu.regs.set_r(b);
        prop_assert_eq!(cpu.regs.r(), b);
        prop_assert_eq!(cpu.regs.ir, u16::from(b) << 8 | u16::from(b));
    }
}

/// Every opcode leaves the decoder back at its neutral state: no pending
/// prefix, HL as the index pair.
#[test]
fn decoder_state_resets_after_every_step() {
    for op in 0..=0xFFu8 {
        if op == 0xED {
            // Only a subset of the ED table decodes; covered elsewhere.
            continue;
        }
        let mut cpu = Z80::new();
        let mut bus = SimpleBus::new();
        bus.load(0x0000, &[op, 0x21, 0x43, 0x65, 0x00]);
        cpu.set_sp(0x8000);
        cpu.step(&mut bus);

        assert_eq!(cpu.prefix(), Prefix::None, "opcode 0x{op:02x}");
        assert_eq!(cpu.next_index_rp(), IndexReg::Hl, "opcode 0x{op:02x}");
    }
}
