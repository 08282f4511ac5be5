use super::*;

#[test]
fn ld_is_pc_relative() {
    // ld r0, data; halt; data: (patched below)
    let program = [
        make_pcrel(Opcode::Ld, Register::R0, 1),
        make_trap(Register::R0, TrapVector::Halt),
        0x1234,
    ];
    let machine = crate::test::run_words(&program);
    assert_eq!(machine.register(Register::R0), 0x1234);
}

#[test]
fn st_is_pc_relative() {
    let program = [
        make_pcrel(Opcode::St, Register::R1, 1),
        make_trap(Register::R0, TrapVector::Halt),
        0,
    ];
    let mut machine = crate::test::machine_with(&program, "");
    machine.set_register(Register::R1, 0xbeef);
    machine.run().unwrap();
    assert_eq!(machine.mem(2), 0xbeef);
}

#[test]
fn ld_backward_reference() {
    // data sits before the entry point
    let program = [
        0x00aa,
        make_pcrel(Opcode::Ld, Register::R3, (-2i16) as Word),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    let module = lexfile::ObjModule::from(vec![lexfile::Entry::Start(1)], program.to_vec());
    let mut machine = Machine::new(Console::canned(""));
    machine.load(&module, 0).unwrap();
    machine.run().unwrap();
    assert_eq!(machine.register(Register::R3), 0x00aa);
}

#[test]
fn ldr_uses_base_plus_offset() {
    let program = [
        make_based(Opcode::Ldr, Register::R0, Register::R1, 2),
        make_trap(Register::R0, TrapVector::Halt),
        0, 0, 0, 0x5678,
    ];
    let mut machine = crate::test::machine_with(&program, "");
    machine.set_register(Register::R1, 3);
    machine.run().unwrap();
    assert_eq!(machine.register(Register::R0), 0x5678);
}

#[test]
fn str_negative_offset() {
    let program = [
        make_based(Opcode::Str, Register::R2, Register::R1, (-1i16) as Word),
        make_trap(Register::R0, TrapVector::Halt),
        0, 0,
    ];
    let mut machine = crate::test::machine_with(&program, "");
    machine.set_register(Register::R1, 4);
    machine.set_register(Register::R2, 0x0c0c);
    machine.run().unwrap();
    assert_eq!(machine.mem(3), 0x0c0c);
}

#[test]
fn lea_loads_address_not_contents() {
    let program = [
        make_pcrel(Opcode::Lea, Register::R4, 1),
        make_trap(Register::R0, TrapVector::Halt),
        0x9999,
    ];
    let machine = crate::test::run_words(&program);
    assert_eq!(machine.register(Register::R4), 2);
}

#[test]
fn based_addressing_wraps_around_memory() {
    let program = [
        make_based(Opcode::Ldr, Register::R0, Register::R1, 2),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    let mut machine = crate::test::machine_with(&program, "");
    machine.set_register(Register::R1, 0xffff);
    machine.run().unwrap();
    // 0xffff + 2 wraps to address 1, the halt word
    assert_eq!(machine.register(Register::R0), machine.mem(1));
}

#[test]
fn loads_do_not_touch_flags() {
    let program = [
        make_arith_imm(Opcode::Cmp, Register::R0, Register::R0, 1),
        make_pcrel(Opcode::Ld, Register::R0, 1),
        make_trap(Register::R0, TrapVector::Halt),
        0x8000,
    ];
    let machine = crate::test::run_words(&program);
    // flags still reflect the cmp, not the negative loaded word
    assert!(machine.flags().n);
    assert!(!machine.flags().z);
    assert_eq!(machine.register(Register::R0), 0x8000);
}
