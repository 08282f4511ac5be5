use super::*;

#[test]
fn and_registers() {
    instruction_runs! {
        make_arith_reg(Opcode::And, Register::R2, Register::R0, Register::R1),
        [R0 = 0x0ff0, R1 = 0x00ff] => [R2 = 0x00f0]
    };
}

#[test]
fn and_immediate_masks_low_bits() {
    instruction_runs! {
        make_arith_imm(Opcode::And, Register::R0, Register::R0, 7),
        [R0 = 0x1234] => [R0 = 4]
    };
}

#[test]
fn and_zero_result_sets_z() {
    let machine = instruction_runs! {
        make_arith_reg(Opcode::And, Register::R2, Register::R0, Register::R1),
        [R0 = 0xf000, R1 = 0x0fff] => [R2 = 0]
    };
    assert!(machine.flags().z);
}

#[test]
fn or_accumulates() {
    instruction_runs! {
        make_ext_reg(ExtOpcode::Or, Register::R0, Register::R1),
        [R0 = 0xf000, R1 = 0x000f] => [R0 = 0xf00f]
    };
}

#[test]
fn xor_toggles() {
    let machine = instruction_runs! {
        make_ext_reg(ExtOpcode::Xor, Register::R0, Register::R1),
        [R0 = 0xff00, R1 = 0xffff] => [R0 = 0x00ff]
    };
    assert!(!machine.flags().n);
}

#[test]
fn xor_self_clears() {
    let machine = instruction_runs! {
        make_ext_reg(ExtOpcode::Xor, Register::R1, Register::R1),
        [R1 = 0x5a5a] => [R1 = 0]
    };
    assert!(machine.flags().z);
}
