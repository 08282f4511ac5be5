use super::*;

#[test]
fn bl_links_and_jumps() {
    // bl sub; halt; sub: mvi r1, 3; ret
    let program = [
        make_bl(1),
        make_trap(Register::R0, TrapVector::Halt),
        make_mvi(Register::R1, 3),
        make_ret(),
    ];
    let machine = crate::test::run_words(&program);
    assert_eq!(machine.register(Register::R1), 3);
    assert_eq!(machine.register(Register::Lr), 1);
}

#[test]
fn bl_backward() {
    // entry at 2: bl -3 jumps to 0
    let program = [
        make_mvi(Register::R2, 9),
        make_trap(Register::R0, TrapVector::Halt),
        make_bl((-3i16) as Word),
    ];
    let module = lexfile::ObjModule::from(vec![lexfile::Entry::Start(2)], program.to_vec());
    let mut machine = Machine::new(Console::canned(""));
    machine.load(&module, 0).unwrap();
    machine.run().unwrap();
    assert_eq!(machine.register(Register::R2), 9);
    assert_eq!(machine.register(Register::Lr), 3);
}

#[test]
fn blr_jumps_through_register() {
    let program = [
        make_mvi(Register::R1, 3),
        make_blr(Register::R1, 1),
        make_trap(Register::R0, TrapVector::Halt),
        0,
        make_mvi(Register::R2, 5),
        make_ret(),
    ];
    let machine = crate::test::run_words(&program);
    assert_eq!(machine.register(Register::R2), 5);
    assert_eq!(machine.register(Register::Lr), 2);
}

#[test]
fn jmp_does_not_link() {
    let program = [
        make_mvi(Register::R1, 3),
        make_jmp(Register::R1, 0),
        make_mvi(Register::R2, 1),
        make_trap(Register::R0, TrapVector::Halt),
    ];
    let machine = crate::test::run_words(&program);
    assert_eq!(machine.register(Register::R2), 0);
    assert_eq!(machine.register(Register::Lr), 0);
}

#[test]
fn ret_is_jmp_lr() {
    assert_eq!(make_ret(), make_jmp(Register::Lr, 0));
    assert_eq!(make_ret(), 0xc1c0);
}
