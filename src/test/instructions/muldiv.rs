use super::*;

#[test]
fn mul_two_operand() {
    instruction_runs! {
        make_ext_reg(ExtOpcode::Mul, Register::R0, Register::R1),
        [R0 = 6, R1 = 7] => [R0 = 42, R1 = 7]
    };
}

#[test]
fn mul_wraps_on_overflow() {
    instruction_runs! {
        make_ext_reg(ExtOpcode::Mul, Register::R0, Register::R1),
        [R0 = 0x4000, R1 = 4] => [R0 = 0]
    };
}

#[test]
fn div_signed() {
    instruction_runs! {
        make_ext_reg(ExtOpcode::Div, Register::R0, Register::R1),
        [R0 = (-56i16) as Word, R1 = 7] => [R0 = (-8i16) as Word]
    };
}

#[test]
fn div_truncates_toward_zero() {
    instruction_runs! {
        make_ext_reg(ExtOpcode::Div, Register::R0, Register::R1),
        [R0 = 7, R1 = 2] => [R0 = 3]
    };
}

#[test]
fn rem_signed() {
    instruction_runs! {
        make_ext_reg(ExtOpcode::Rem, Register::R0, Register::R1),
        [R0 = (-7i16) as Word, R1 = 2] => [R0 = (-1i16) as Word]
    };
}

#[test]
fn div_by_zero_aborts() {
    instruction_aborts! {
        make_ext_reg(ExtOpcode::Div, Register::R0, Register::R1),
        [R0 = 3, R1 = 0],
        RuntimeError::DivisionByZero
    };
}

#[test]
fn rem_by_zero_aborts() {
    instruction_aborts! {
        make_ext_reg(ExtOpcode::Rem, Register::R0, Register::R1),
        [R0 = 3, R1 = 0],
        RuntimeError::DivisionByZero
    };
}

#[test]
fn div_min_by_minus_one_wraps() {
    instruction_runs! {
        make_ext_reg(ExtOpcode::Div, Register::R0, Register::R1),
        [R0 = 0x8000, R1 = (-1i16) as Word] => [R0 = 0x8000]
    };
}

#[test]
fn unknown_eopcode_aborts() {
    instruction_aborts! {
        0xa01f, // case-10 word with eopcode 31
        [],
        RuntimeError::BadExtOpcode(0x1f)
    };
}
