use super::*;

#[test]
fn sll_shifts_and_carries_last_bit_out() {
    let machine = instruction_runs! {
        make_ext(ExtOpcode::Sll, Register::R0, 4),
        [R0 = 0x1234] => [R0 = 0x2340]
    };
    // last bit shifted out of 0x1234 << 4 is the 1 of 0x1000
    assert!(machine.flags().c);
}

#[test]
fn srl_inserts_zeros() {
    let machine = instruction_runs! {
        make_ext(ExtOpcode::Srl, Register::R0, 4),
        [R0 = 0x8421] => [R0 = 0x0842]
    };
    assert!(!machine.flags().c);
    assert!(!machine.flags().n);
}

#[test]
fn srl_carry_is_last_bit_out() {
    let machine = instruction_runs! {
        make_ext(ExtOpcode::Srl, Register::R0, 1),
        [R0 = 0x0001] => [R0 = 0]
    };
    assert!(machine.flags().c);
    assert!(machine.flags().z);
}

#[test]
fn sra_replicates_sign() {
    instruction_runs! {
        make_ext(ExtOpcode::Sra, Register::R0, 4),
        [R0 = 0x8000] => [R0 = 0xf800]
    };
}

#[test]
fn sra_positive_value() {
    instruction_runs! {
        make_ext(ExtOpcode::Sra, Register::R0, 2),
        [R0 = 0x0400] => [R0 = 0x0100]
    };
}

#[test]
fn rol_wraps_high_bit_around() {
    let machine = instruction_runs! {
        make_ext(ExtOpcode::Rol, Register::R0, 1),
        [R0 = 0x8001] => [R0 = 0x0003]
    };
    assert!(machine.flags().c);
}

#[test]
fn ror_wraps_low_bit_around() {
    let machine = instruction_runs! {
        make_ext(ExtOpcode::Ror, Register::R0, 1),
        [R0 = 0x0001] => [R0 = 0x8000]
    };
    assert!(machine.flags().c);
    assert!(machine.flags().n);
}

#[test]
fn zero_count_leaves_value_and_carry() {
    let machine = instruction_runs! {
        make_ext(ExtOpcode::Sll, Register::R0, 0),
        [R0 = 0x00ff] => [R0 = 0x00ff]
    };
    assert!(!machine.flags().c);
}

#[test]
fn count_field_is_four_bits() {
    // a count of 15 is the widest the encoding can carry
    instruction_runs! {
        make_ext(ExtOpcode::Sll, Register::R0, 15),
        [R0 = 3] => [R0 = 0x8000]
    };
}
