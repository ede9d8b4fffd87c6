//! Disassembler output checks.

use zilog_z80::Disassembler;

/// Disassemble one instruction from the given bytes.
fn one(bytes: &[u8]) -> String {
    Disassembler::new(bytes).disassemble()
}

#[test]
fn nop() {
    assert_eq!(one(&[0x00]), "nop");
}

#[test]
fn indexed_load_with_positive_displacement() {
    assert_eq!(one(&[0xDD, 0x7E, 0x05]), "ld a, (ix+5)");
}

#[test]
fn indexed_load_with_negative_displacement() {
    assert_eq!(one(&[0xFD, 0x7E, 0xFB]), "ld a, (iy-5)");
}

#[test]
fn block_transfer() {
    assert_eq!(one(&[0xED, 0xB0]), "ldir");
    assert_eq!(one(&[0xED, 0xA8]), "ldd");
    assert_eq!(one(&[0xED, 0xB9]), "cpdr");
    assert_eq!(one(&[0xED, 0xB2]), "inir");
    assert_eq!(one(&[0xED, 0xBB]), "otdr");
}

#[test]
fn bit_test() {
    assert_eq!(one(&[0xCB, 0x47]), "bit 0, a");
    assert_eq!(one(&[0xCB, 0x7E]), "bit 7, (hl)");
    assert_eq!(one(&[0xDD, 0xCB, 0x03, 0x5E]), "bit 3, (ix+3)");
}

#[test]
fn indexed_res_set_spell_the_dual_write() {
    assert_eq!(one(&[0xDD, 0xCB, 0x05, 0xC0]), "set 0, (ix+5), b");
    assert_eq!(one(&[0xFD, 0xCB, 0xFE, 0x81]), "res 0, (iy-2), c");
    assert_eq!(one(&[0xDD, 0xCB, 0x05, 0xC6]), "set 0, (ix+5)");
    assert_eq!(one(&[0xDD, 0xCB, 0x05, 0x06]), "rlc (ix+5)");
    assert_eq!(one(&[0xDD, 0xCB, 0x05, 0x00]), "rlc (ix+5), b");
}

#[test]
fn loads() {
    assert_eq!(one(&[0x3E, 0x42]), "ld a, 0x42");
    assert_eq!(one(&[0x01, 0x34, 0x12]), "ld bc, 0x1234");
    assert_eq!(one(&[0xFD, 0x21, 0x00, 0x40]), "ld iy, 0x4000");
    assert_eq!(one(&[0x32, 0x50, 0x00]), "ld (0x0050), a");
    assert_eq!(one(&[0x2A, 0x50, 0x00]), "ld hl, (0x0050)");
    assert_eq!(one(&[0xDD, 0x22, 0x50, 0x00]), "ld (0x0050), ix");
    assert_eq!(one(&[0xED, 0x7B, 0x50, 0x00]), "ld sp, (0x0050)");
    assert_eq!(one(&[0x0A]), "ld a, (bc)");
    assert_eq!(one(&[0xF9]), "ld sp, hl");
    assert_eq!(one(&[0xDD, 0xF9]), "ld sp, ix");
}

#[test]
fn alu_accumulator_spelling() {
    assert_eq!(one(&[0xC6, 0x12]), "add a, 0x12");
    assert_eq!(one(&[0xCE, 0x12]), "adc a, 0x12");
    assert_eq!(one(&[0xD6, 0x12]), "sub 0x12");
    assert_eq!(one(&[0xDE, 0x12]), "sbc a, 0x12");
    assert_eq!(one(&[0xE6, 0x12]), "and 0x12");
    assert_eq!(one(&[0xBE]), "cp (hl)");
    assert_eq!(one(&[0xDD, 0x96, 0x02]), "sub (ix+2)");
}

#[test]
fn jumps_print_targets_relative_to_instruction_start() {
    assert_eq!(one(&[0x18, 0xFE]), "jr 0");
    assert_eq!(one(&[0x18, 0x05]), "jr 7");
    assert_eq!(one(&[0x20, 0xFC]), "jr nz, -2");
    assert_eq!(one(&[0x10, 0x05]), "djnz 7");
    assert_eq!(one(&[0xC3, 0x34, 0x12]), "jp 0x1234");
    assert_eq!(one(&[0xCA, 0x34, 0x12]), "jp z, 0x1234");
    assert_eq!(one(&[0xE9]), "jp (hl)");
    assert_eq!(one(&[0xDD, 0xE9]), "jp (ix)");
}

#[test]
fn calls_returns_stack() {
    assert_eq!(one(&[0xCD, 0x00, 0x20]), "call 0x2000");
    assert_eq!(one(&[0xC4, 0x00, 0x20]), "call nz, 0x2000");
    assert_eq!(one(&[0xC9]), "ret");
    assert_eq!(one(&[0xD8]), "ret c");
    assert_eq!(one(&[0xF5]), "push af");
    assert_eq!(one(&[0xDD, 0xE5]), "push ix");
    assert_eq!(one(&[0xFF]), "rst 0x38");
    assert_eq!(one(&[0xE3]), "ex (sp), hl");
}

#[test]
fn sixteen_bit_arithmetic() {
    assert_eq!(one(&[0x09]), "add hl, bc");
    assert_eq!(one(&[0xDD, 0x29]), "add ix, ix");
    assert_eq!(one(&[0xED, 0x4A]), "adc hl, bc");
    assert_eq!(one(&[0xED, 0x42]), "sbc hl, bc");
    assert_eq!(one(&[0x23]), "inc hl");
    assert_eq!(one(&[0xFD, 0x2B]), "dec iy");
}

#[test]
fn ed_oddments() {
    assert_eq!(one(&[0xED, 0x44]), "neg");
    assert_eq!(one(&[0xED, 0x45]), "retn");
    assert_eq!(one(&[0xED, 0x4D]), "reti");
    assert_eq!(one(&[0xED, 0x56]), "im 1");
    assert_eq!(one(&[0xED, 0x5E]), "im 2");
    assert_eq!(one(&[0xED, 0x47]), "ld i, a");
    assert_eq!(one(&[0xED, 0x5F]), "ld a, r");
    assert_eq!(one(&[0xED, 0x67]), "rrd");
    assert_eq!(one(&[0xED, 0x40]), "in b, (c)");
    assert_eq!(one(&[0xED, 0x70]), "in (c)");
    assert_eq!(one(&[0xED, 0x71]), "out (c), 0");
    assert_eq!(one(&[0xED, 0x79]), "out (c), a");
    assert_eq!(one(&[0xED, 0x80]), "noni 0xed, 0x80");
}

#[test]
fn misc_one_byte_forms() {
    assert_eq!(one(&[0x76]), "halt");
    assert_eq!(one(&[0x08]), "ex af, af'");
    assert_eq!(one(&[0xEB]), "ex de, hl");
    assert_eq!(one(&[0xD9]), "exx");
    assert_eq!(one(&[0x27]), "daa");
    assert_eq!(one(&[0x2F]), "cpl");
    assert_eq!(one(&[0x37]), "scf");
    assert_eq!(one(&[0x3F]), "ccf");
    assert_eq!(one(&[0xF3]), "di");
    assert_eq!(one(&[0xFB]), "ei");
    assert_eq!(one(&[0xD3, 0x10]), "out (0x10), a");
    assert_eq!(one(&[0xDB, 0x10]), "in a, (0x10)");
}

#[test]
fn streaming_disassembly_tracks_the_cursor() {
    let code = [
        0x3E, 0x42,             // ld a, 0x42
        0xDD, 0x7E, 0x05,       // ld a, (ix+5)
        0xED, 0xB0,             // ldir
        0x76,                   // halt
    ];
    let mut d = Disassembler::new(&code);
    assert_eq!(d.disassemble(), "ld a, 0x42");
    assert_eq!(d.pos(), 2);
    assert_eq!(d.disassemble(), "ld a, (ix+5)");
    assert_eq!(d.pos(), 5);
    assert_eq!(d.disassemble(), "ldir");
    assert_eq!(d.disassemble(), "halt");
    assert_eq!(d.pos(), 8);
}

#[test]
fn disassembly_is_stable() {
    let code = [0xDD, 0xCB, 0x05, 0xC0, 0xED, 0xB0, 0x18, 0xFE, 0x00];
    let run = |bytes: &[u8]| {
        let mut d = Disassembler::new(bytes);
        let mut out = Vec::new();
        while d.pos() < bytes.len() {
            out.push(d.disassemble());
        }
        out
    };
    assert_eq!(run(&code), run(&code));
}

#[test]
fn exhausted_stream_reads_nop() {
    let mut d = Disassembler::new(&[]);
    assert_eq!(d.disassemble(), "nop");
}
