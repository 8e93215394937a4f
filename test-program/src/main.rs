use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uwustash::arch::Aarch64;
use uwustash::dwarf::{CfaRule, Expr, RegisterRule, RegisterState};
use uwustash::walk::Registers;
use uwustash::{Cursor, FrameDescriptor};

const FP: usize = 29;
const LR: usize = 30;
const SP: usize = 31;

fn main() {
    let registry = tracing_subscriber::Registry::default().with(
        EnvFilter::builder()
            .with_default_directive(tracing::Level::TRACE.into())
            .from_env()
            .unwrap(),
    );

    let tree_layer = tracing_tree::HierarchicalLayer::new(2)
        .with_targets(true)
        .with_bracketed_fields(true);

    registry.with(tree_layer).init();

    let mut regs = Registers {
        sp: 0x7fff_ff00,
        fp: 0x7fff_ff40,
        lr: 0x40_2010,
    };
    let mut cursor = Cursor::<Aarch64>::new(0x40_1004, regs.sp);

    // After `stp x29, x30, [sp, #-16]!`.
    let mut rules = [RegisterRule::SameValue; 32];
    rules[FP] = RegisterRule::Offset(-16);
    rules[LR] = RegisterRule::Offset(-8);
    rules[SP] = RegisterRule::Undefined;
    let prologue = RegisterState {
        cfa: CfaRule::RegisterAndOffset {
            register: SP as u16,
            offset: 16,
        },
        return_address_column: LR as u16,
        rules: &rules,
    };
    step(&mut cursor, &prologue, &mut regs);

    // Function body, CFA is tracked through x29.
    let body = RegisterState {
        cfa: CfaRule::RegisterAndOffset {
            register: FP as u16,
            offset: 16,
        },
        ..prologue
    };
    step(&mut cursor, &body, &mut regs);

    // PLT-style stub, the CFA needs an expression.
    let stub = RegisterState {
        cfa: CfaRule::Expression(Expr),
        ..prologue
    };
    step(&mut cursor, &stub, &mut regs);
}

fn step(cursor: &mut Cursor<Aarch64>, state: &RegisterState<'_>, regs: &mut Registers) {
    cursor.stash_frame(state).unwrap();

    match cursor.frame() {
        FrameDescriptor::Standard(frame) => {
            let plan = frame.step_plan(regs).unwrap();
            println!("{:#x}: {frame:?}\n    {plan:?}", cursor.ip());
            // No real stack behind this, pretend every slot holds a plausible
            // caller frame.
            regs.sp = plan.cfa;
            regs.fp = plan.cfa + 0x40;
            cursor.advance(regs.lr, plan.cfa);
            regs.lr += 0x1000;
        }
        other => println!("{:#x}: {other:?}, slow path", cursor.ip()),
    }
}
