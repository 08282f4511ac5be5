use super::*;

fn captured(program: &[Word], input: &str) -> String {
    let mut machine = crate::test::machine_with(program, input);
    machine.run().unwrap();
    machine.into_console().into_captured()
}

#[test]
fn dout_writes_signed_decimal() {
    let program = [
        make_mvi(Register::R0, (-5i16) as Word),
        make_trap(Register::R0, TrapVector::Dout),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    assert_eq!(captured(&program, ""), "-5");
}

#[test]
fn udout_writes_unsigned_decimal() {
    let program = [
        make_mvi(Register::R0, (-1i16) as Word),
        make_trap(Register::R0, TrapVector::Udout),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    assert_eq!(captured(&program, ""), "65535");
}

#[test]
fn hout_writes_bare_lowercase_hex() {
    let program = [
        make_mvi(Register::R0, 0x1ab),
        make_trap(Register::R0, TrapVector::Hout),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    assert_eq!(captured(&program, ""), "1ab");
}

#[test]
fn aout_writes_low_byte_ascii() {
    let program = [
        make_mvi(Register::R0, 'A' as Word),
        make_trap(Register::R0, TrapVector::Aout),
        make_trap(Register::R0, TrapVector::Nl),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    assert_eq!(captured(&program, ""), "A\n");
}

#[test]
fn sout_walks_to_null() {
    // lea r0, text; sout r0; halt; text: "hi", 0
    let program = [
        make_pcrel(Opcode::Lea, Register::R0, 2),
        make_trap(Register::R0, TrapVector::Sout),
        make_trap(Register::R0, TrapVector::Halt),
        'h' as Word,
        'i' as Word,
        0,
    ];
    assert_eq!(captured(&program, ""), "hi");
}

#[test]
fn din_reads_decimal() {
    let program = [
        make_trap(Register::R1, TrapVector::Din),
        make_trap(Register::R1, TrapVector::Dout),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    assert_eq!(captured(&program, "42\n"), "42");
}

#[test]
fn din_reprompts_on_garbage() {
    let program = [
        make_trap(Register::R1, TrapVector::Din),
        make_trap(Register::R1, TrapVector::Dout),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    assert_eq!(
        captured(&program, "fish\n-7\n"),
        "Invalid dec constant. Re-enter: -7"
    );
}

#[test]
fn hin_reads_base_16() {
    let program = [
        make_trap(Register::R1, TrapVector::Hin),
        make_trap(Register::R1, TrapVector::Udout),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    assert_eq!(captured(&program, "ff\n"), "255");
}

#[test]
fn ain_reads_one_character() {
    let program = [
        make_trap(Register::R1, TrapVector::Ain),
        make_trap(Register::R2, TrapVector::Ain),
        make_trap(Register::R2, TrapVector::Aout),
        make_trap(Register::R1, TrapVector::Aout),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    assert_eq!(captured(&program, "xy"), "yx");
}

#[test]
fn sin_stores_null_terminated_line() {
    let program = [
        make_mvi(Register::R1, 0x20),
        make_trap(Register::R1, TrapVector::Sin),
        make_trap(Register::R1, TrapVector::Sout),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    let mut machine = crate::test::machine_with(&program, "abc\n");
    machine.run().unwrap();
    assert_eq!(machine.mem(0x20), 'a' as Word);
    assert_eq!(machine.mem(0x22), 'c' as Word);
    assert_eq!(machine.mem(0x23), 0);
    assert_eq!(machine.console().captured(), "abc");
}

#[test]
fn input_trap_at_eof_aborts() {
    let program = [make_trap(Register::R1, TrapVector::Din)];
    let mut machine = crate::test::machine_with(&program, "");
    match machine.run().unwrap_err() {
        RuntimeError::EndOfInput => {}
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn bad_trap_vector_aborts() {
    // trap word with vector 0xff, beyond the trap table
    let mut machine = crate::test::machine_with(&[0xf0ff], "");
    match machine.run().unwrap_err() {
        RuntimeError::BadTrapVector(0xff) => {}
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn register_dump_lists_all_registers() {
    let program = [
        make_mvi(Register::R0, 5),
        make_trap(Register::R0, TrapVector::R),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    let output = captured(&program, "");
    assert!(output.contains("r0 = 0005"));
    assert!(output.contains("sp = 0000"));
    assert!(output.contains("NZCV"));
}

#[test]
fn stack_dump_prints_live_entries() {
    let program = [
        make_mvi(Register::R1, 0xab),
        make_ext(ExtOpcode::Push, Register::R1, 0),
        make_trap(Register::R0, TrapVector::S),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    let output = captured(&program, "");
    assert_eq!(output, "ffff: 00ab\n");
}

#[test]
fn breakpoint_is_a_stub() {
    let program = [
        make_trap(Register::R0, TrapVector::Bp),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    assert_eq!(captured(&program, ""), "");
}
