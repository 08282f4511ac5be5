use super::*;

#[test]
fn mvi_positive() {
    instruction_runs! {
        make_mvi(Register::R0, 255),
        [] => [R0 = 255]
    };
}

#[test]
fn mvi_negative_sign_extends() {
    instruction_runs! {
        make_mvi(Register::R0, (-256i16) as Word),
        [] => [R0 = (-256i16) as Word]
    };
}

#[test]
fn mvr_copies() {
    instruction_runs! {
        make_ext_reg(ExtOpcode::Mvr, Register::R3, Register::R1),
        [R1 = 0xcafe] => [R3 = 0xcafe, R1 = 0xcafe]
    };
}

#[test]
fn not_complements_and_sets_nz() {
    let machine = instruction_runs! {
        make_not(Register::R0, Register::R1),
        [R1 = 0x00ff] => [R0 = 0xff00]
    };
    assert!(machine.flags().n);
    assert!(!machine.flags().z);
}

#[test]
fn not_of_all_ones_sets_z() {
    let machine = instruction_runs! {
        make_not(Register::R0, Register::R1),
        [R1 = 0xffff] => [R0 = 0]
    };
    assert!(machine.flags().z);
}

#[test]
fn sext_width_from_register() {
    // r1 holds the field width; sign-extend the low 5 bits of r0
    let machine = instruction_runs! {
        make_ext_reg(ExtOpcode::Sext, Register::R0, Register::R1),
        [R0 = 0x0010, R1 = 5] => [R0 = 0xfff0]
    };
    assert!(machine.flags().n);
}

#[test]
fn sext_positive_field_unchanged() {
    instruction_runs! {
        make_ext_reg(ExtOpcode::Sext, Register::R0, Register::R1),
        [R0 = 0x000f, R1 = 5] => [R0 = 0x000f]
    };
}
