use super::*;

#[test]
fn push_decrements_sp_and_stores() {
    let machine = instruction_runs! {
        make_ext(ExtOpcode::Push, Register::R1, 0),
        [R1 = 0x1111] => [Sp = 0xffff]
    };
    assert_eq!(machine.mem(0xffff), 0x1111);
    assert_eq!(machine.stack_depth(), 1);
}

#[test]
fn pop_loads_and_increments_sp() {
    let program = [
        make_ext(ExtOpcode::Push, Register::R1, 0),
        make_ext(ExtOpcode::Pop, Register::R2, 0),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    let mut machine = crate::test::machine_with(&program, "");
    machine.set_register(Register::R1, 0x2222);
    machine.run().unwrap();
    assert_eq!(machine.register(Register::R2), 0x2222);
    assert_eq!(machine.register(Register::Sp), 0);
    assert_eq!(machine.stack_depth(), 0);
}

#[test]
fn push_pop_are_lifo() {
    let program = [
        make_mvi(Register::R0, 1),
        make_mvi(Register::R1, 2),
        make_ext(ExtOpcode::Push, Register::R0, 0),
        make_ext(ExtOpcode::Push, Register::R1, 0),
        make_ext(ExtOpcode::Pop, Register::R2, 0),
        make_ext(ExtOpcode::Pop, Register::R3, 0),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    let machine = crate::test::run_words(&program);
    assert_eq!(machine.register(Register::R2), 2);
    assert_eq!(machine.register(Register::R3), 1);
}
