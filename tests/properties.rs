use proptest::prelude::*;
use uwustash::arch::Register;
use uwustash::{classify, FrameDescriptor, LocationRule, UnwindRuleSet};

const BOUND: isize = 1 << 29;

fn register() -> impl Strategy<Value = Register> {
    prop_oneof![
        Just(Register::StackPointer),
        Just(Register::FramePointer),
        Just(Register::LinkRegister),
        (0u16..64).prop_map(Register::Other),
    ]
}

fn offset() -> impl Strategy<Value = isize> {
    prop_oneof![
        -512isize..512,
        (-BOUND + 1)..BOUND,
        Just(BOUND),
        Just(-BOUND),
        any::<i32>().prop_map(|v| v as isize),
    ]
}

fn location() -> impl Strategy<Value = LocationRule> {
    prop_oneof![
        Just(LocationRule::Undefined),
        Just(LocationRule::SameValue),
        Just(LocationRule::AtCfa),
        offset().prop_map(LocationRule::CfaRelative),
        register().prop_map(LocationRule::InRegister),
        Just(LocationRule::Computed),
    ]
}

fn rule_set() -> impl Strategy<Value = UnwindRuleSet> {
    (
        register(),
        offset(),
        register(),
        location(),
        location(),
        location(),
    )
        .prop_map(
            |(cfa_base, cfa_offset, return_address, fp, lr, sp)| UnwindRuleSet {
                cfa_base,
                cfa_offset,
                return_address,
                fp,
                lr,
                sp,
            },
        )
}

fn unsaved(rule: LocationRule) -> bool {
    matches!(rule, LocationRule::Undefined | LocationRule::SameValue)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_foreign_cfa_base(
        rules in rule_set(),
        cfa_base in prop_oneof![Just(Register::LinkRegister), (0u16..64).prop_map(Register::Other)],
    ) {
        let rules = UnwindRuleSet { cfa_base, ..rules };
        prop_assert_eq!(classify(&rules), FrameDescriptor::Unclassified);
    }

    #[test]
    fn prop_large_cfa_offset(rules in rule_set(), big in BOUND..isize::MAX, negate in any::<bool>()) {
        let cfa_offset = if negate { -big } else { big };
        let rules = UnwindRuleSet { cfa_offset, ..rules };
        prop_assert_eq!(classify(&rules), FrameDescriptor::Unclassified);
    }

    #[test]
    fn prop_sentinel_offset(rules in rule_set(), slot in 0usize..3) {
        let sentinel = LocationRule::CfaRelative(-1);
        let rules = match slot {
            0 => UnwindRuleSet { fp: sentinel, ..rules },
            1 => UnwindRuleSet { lr: sentinel, ..rules },
            _ => UnwindRuleSet { sp: sentinel, ..rules },
        };
        prop_assert_eq!(classify(&rules), FrameDescriptor::Unclassified);
    }

    #[test]
    fn prop_idempotent(rules in rule_set()) {
        prop_assert_eq!(classify(&rules), classify(&rules));
    }

    #[test]
    fn prop_standard_round_trip(rules in rule_set()) {
        if let FrameDescriptor::Standard(frame) = classify(&rules) {
            let rebuilt = frame.rule_set();
            prop_assert_eq!(rebuilt.cfa_base, rules.cfa_base);
            prop_assert_eq!(rebuilt.cfa_offset, rules.cfa_offset);
            prop_assert_eq!(classify(&rebuilt), FrameDescriptor::Standard(frame));

            for (original, rebuilt) in [(rules.fp, rebuilt.fp), (rules.lr, rebuilt.lr), (rules.sp, rebuilt.sp)] {
                if unsaved(original) {
                    prop_assert!(unsaved(rebuilt));
                } else {
                    prop_assert_eq!(original.cached_offset(), rebuilt.cached_offset());
                }
            }
        }
    }
}
