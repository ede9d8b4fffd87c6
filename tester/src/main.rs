//! Z80 core smoke tester.
//!
//! Validates that the test-input file is readable, then runs one disassembly
//! and one execution smoke test against the core.

use std::fs::File;
use std::process;

use sim_core::SimpleBus;
use zilog_z80::{Disassembler, Z80};

fn fail(msg: &str) -> ! {
    eprintln!("tester: {msg}");
    process::exit(1);
}

fn test_disassembling() -> Result<(), String> {
    let mut disasm = Disassembler::new(&[0x00]);
    let out = disasm.disassemble();
    if out != "nop" {
        return Err(format!("disassembling NOP produced '{out}', want 'nop'"));
    }
    Ok(())
}

fn test_execution() -> Result<(), String> {
    let mut cpu = Z80::new();
    let mut bus = SimpleBus::new();
    if cpu.pc() != 0 {
        return Err(format!("fresh CPU has PC 0x{:04x}, want 0", cpu.pc()));
    }
    if bus.ticks() != 0 {
        return Err(format!("fresh bus has {} ticks, want 0", bus.ticks()));
    }

    // Memory is zeroed, so the first step executes NOP.
    let ticks = cpu.step(&mut bus);
    if cpu.pc() != 1 {
        return Err(format!("after NOP, PC is 0x{:04x}, want 1", cpu.pc()));
    }
    if ticks != 4 || bus.ticks() != 4 {
        return Err(format!(
            "after NOP, {ticks} step ticks / {} bus ticks, want 4",
            bus.ticks()
        ));
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        fail("usage: tester <test-input>");
    }

    let input = &args[1];
    if let Err(e) = File::open(input) {
        fail(&format!("cannot open test input '{input}': {e}"));
    }

    if let Err(e) = test_disassembling() {
        fail(&e);
    }
    if let Err(e) = test_execution() {
        fail(&e);
    }
}
