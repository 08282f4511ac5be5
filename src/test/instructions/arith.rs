use super::*;

#[test]
fn add_registers() {
    instruction_runs! {
        make_arith_reg(Opcode::Add, Register::R2, Register::R0, Register::R1),
        [R0 = 42, R1 = 64] => [R2 = 106]
    };
}

#[test]
fn add_immediate() {
    instruction_runs! {
        make_arith_imm(Opcode::Add, Register::R0, Register::R0, 15),
        [R0 = 10] => [R0 = 25]
    };
}

#[test]
fn add_negative_immediate() {
    instruction_runs! {
        make_arith_imm(Opcode::Add, Register::R0, Register::R0, (-16i16) as Word),
        [R0 = 10] => [R0 = (-6i16) as Word]
    };
}

#[test]
fn add_wraps_and_sets_overflow() {
    let machine = instruction_runs! {
        make_arith_reg(Opcode::Add, Register::R2, Register::R0, Register::R1),
        [R0 = 0x7fff, R1 = 1] => [R2 = 0x8000]
    };
    let flags = machine.flags();
    assert!(flags.v);
    assert!(flags.n);
    assert!(!flags.c);
    assert!(!flags.z);
}

#[test]
fn add_sets_carry_for_negative_operands() {
    let machine = instruction_runs! {
        make_arith_reg(Opcode::Add, Register::R2, Register::R0, Register::R1),
        [R0 = (-1i16) as Word, R1 = (-1i16) as Word] => [R2 = (-2i16) as Word]
    };
    assert!(machine.flags().c);
    assert!(!machine.flags().v);
}

#[test]
fn sub_registers() {
    instruction_runs! {
        make_arith_reg(Opcode::Sub, Register::R2, Register::R0, Register::R1),
        [R0 = 10, R1 = 3] => [R2 = 7]
    };
}

#[test]
fn sub_to_zero_sets_z() {
    let machine = instruction_runs! {
        make_arith_imm(Opcode::Sub, Register::R0, Register::R0, 5),
        [R0 = 5] => [R0 = 0]
    };
    assert!(machine.flags().z);
    assert!(!machine.flags().n);
}

#[test]
fn cmp_sets_flags_without_writing() {
    let machine = instruction_runs! {
        make_arith_imm(Opcode::Cmp, Register::R0, Register::R1, 5),
        [R1 = 3] => [R1 = 3, R0 = 0]
    };
    assert!(machine.flags().n);
    assert!(machine.flags().condition(CondCode::Lt));
}

#[test]
fn cmp_register_form() {
    let machine = instruction_runs! {
        make_arith_reg(Opcode::Cmp, Register::R0, Register::R1, Register::R2),
        [R1 = 9, R2 = 9] => [R1 = 9, R2 = 9]
    };
    assert!(machine.flags().z);
}
