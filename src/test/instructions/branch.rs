use super::*;

fn branch_program(cond: CondCode) -> [Word; 5] {
    // cmp r0, r1; br<cond> +1 (over the mvi); mvi r2, 1; halt-path merge
    [
        make_arith_reg(Opcode::Cmp, Register::R0, Register::R0, Register::R1),
        make_branch(cond, 1),
        make_mvi(Register::R2, 1),
        make_trap(Register::R0, TrapVector::Halt),
        make_trap(Register::R0, TrapVector::Halt),
    ]
}

fn branch_taken(cond: CondCode, x: i16, y: i16) -> bool {
    let mut machine = crate::test::machine_with(&branch_program(cond), "");
    machine.set_register(Register::R0, x as Word);
    machine.set_register(Register::R1, y as Word);
    machine.run().unwrap();
    machine.register(Register::R2) == 0
}

#[test]
fn bre_follows_z() {
    assert!(branch_taken(CondCode::Z, 4, 4));
    assert!(!branch_taken(CondCode::Z, 4, 5));
}

#[test]
fn brne_follows_not_z() {
    assert!(branch_taken(CondCode::Nz, 4, 5));
    assert!(!branch_taken(CondCode::Nz, 4, 4));
}

#[test]
fn brn_follows_n() {
    assert!(branch_taken(CondCode::N, 3, 5));
    assert!(!branch_taken(CondCode::N, 5, 3));
}

#[test]
fn brp_takes_positive_only() {
    assert!(branch_taken(CondCode::P, 5, 3));
    assert!(!branch_taken(CondCode::P, 3, 3));
    assert!(!branch_taken(CondCode::P, 3, 5));
}

#[test]
fn brlt_and_brgt_are_signed() {
    assert!(branch_taken(CondCode::Lt, -3, 2));
    assert!(branch_taken(CondCode::Gt, 2, -3));
    assert!(!branch_taken(CondCode::Lt, 2, -3));
    assert!(!branch_taken(CondCode::Gt, -3, 2));
    // equal operands take neither
    assert!(!branch_taken(CondCode::Lt, 7, 7));
    assert!(!branch_taken(CondCode::Gt, 7, 7));
    // overflow case: -32768 < 1 even though the subtraction overflows
    assert!(branch_taken(CondCode::Lt, -32768, 1));
}

#[test]
fn brc_follows_carry() {
    // -1 - 1: addition of 0xffff and 0xffff carries
    assert!(branch_taken(CondCode::C, -1, 1));
    assert!(!branch_taken(CondCode::C, 0, 1));
}

#[test]
fn bral_is_unconditional() {
    assert!(branch_taken(CondCode::Always, 0, 0));
    assert!(branch_taken(CondCode::Always, -5, 9));
}

#[test]
fn backward_branch_offset() {
    // mvi r0,1; br +1; add r0,r0,1 (skipped); halt
    let program = [
        make_mvi(Register::R0, 1),
        make_branch(CondCode::Always, 1),
        make_arith_imm(Opcode::Add, Register::R0, Register::R0, 1),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    let machine = crate::test::run_words(&program);
    assert_eq!(machine.register(Register::R0), 1);
}
