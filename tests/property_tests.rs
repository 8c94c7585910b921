//! Property-based tests for the engine
//!
//! These tests use proptest to check the run-level invariants across many generated programs and test
//! suites: discovery counts, exported keys, fatal shapes and idempotence.

use proptest::prelude::*;

use duel_core::lang::{globals, keywords};
use testduel::engine::{EngineConfig, RunRequest, TestResult, TestStatus, discover, evaluate_program, run_to_end};
use testduel::mutations::{self, BugPattern};
use testduel::runtime::{CapabilitySet, Interpreter, Limits};

fn run(program: &str, tests: &str) -> Vec<TestResult> {
    let config = EngineConfig::default().with_random_seed(Some(3));
    run_to_end(RunRequest::new(program, tests), &config).expect("run starts").0
}

/// Identifiers that are neither keywords, contextual words, host globals nor assertions.
fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,8}".prop_filter("reserved name", |s| {
        !matches!(s.as_str(), "get" | "set" | "arguments" | "eval")
            && keywords::from_str(s).is_none()
            && globals::from_str(s).is_none()
            && globals::ASSERTIONS.iter().all(|a| a.name != s)
    })
}

fn distinct_idents(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(ident_strategy(), 0..max).prop_map(|set| set.into_iter().collect())
}

/// Test bodies that stress the scanner: braces inside strings, templates, comments and nested blocks.
fn body_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("assertTrue(true);".to_string()),
        Just("const s = '}'; const t = \"{{\";".to_string()),
        Just("// } stray brace in a comment\n".to_string()),
        Just("/* { */ if (true) { { } }".to_string()),
        Just("const u = `${ { a: '}' }.a }`;".to_string()),
        Just("const r = /[}]/;".to_string()),
        Just("function inner() { return 1; } inner();".to_string()),
    ]
}

mod discovery_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: k well-formed top-level functions are discovered as exactly k tests, in order.
        #[test]
        fn discovers_every_function_in_order(
            names in distinct_idents(8),
            bodies in prop::collection::vec(body_strategy(), 8),
        ) {
            let source: String = names
                .iter()
                .zip(bodies.iter().cycle())
                .map(|(name, body)| format!("function {name}() {{ {body} }}\n\n"))
                .collect();
            let discovery = discover(&source);
            prop_assert_eq!(discovery.names().collect::<Vec<_>>(), names.iter().map(String::as_str).collect::<Vec<_>>());
            prop_assert!(discovery.duplicates.is_empty());
        }

        /// Property: discovery never panics, whatever the input.
        #[test]
        fn discovery_is_total(source in "\\PC{0,200}") {
            let _ = discover(&source);
        }
    }
}

mod run_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Property: the bindings are exactly the keys of the returned object.
        #[test]
        fn exports_are_exactly_the_returned_keys(keys in distinct_idents(6)) {
            let entries: Vec<String> = keys.iter().map(|k| format!("{k}: () => '{k}'")).collect();
            let program = format!("const hidden = 1;\nreturn {{ {} }};", entries.join(", "));
            let mut interp = Interpreter::new(&CapabilitySet::standard(), Limits::default(), Some(1));
            let bindings = evaluate_program(&mut interp, &program).expect("program evaluates");
            prop_assert_eq!(bindings.keys().collect::<Vec<_>>(), keys.iter().map(String::as_str).collect::<Vec<_>>());
        }

        /// Property: a throwing program yields exactly one error result and no per-test results.
        #[test]
        fn throwing_program_is_a_single_error(message in "[a-zA-Z ]{1,20}", names in distinct_idents(4)) {
            let tests: String = names.iter().map(|n| format!("function {n}() {{}}\n")).collect();
            let results = run(&format!("throw new Error('{message}');"), &tests);
            prop_assert_eq!(results.len(), 1);
            prop_assert_eq!(results[0].status, TestStatus::Error);
            prop_assert_eq!(results[0].message.as_deref(), Some(message.as_str()));
        }

        /// Property: running the same pair twice gives the same names, statuses and messages.
        #[test]
        fn runs_are_idempotent(
            scale in -5i32..5,
            offset in -50i32..50,
            cases in prop::collection::vec((-100i32..100, -600i32..600), 1..6),
        ) {
            let program = format!("let calls = 0; return {{ f: x => {{ calls++; return x * {scale} + {offset}; }}, calls: () => calls }};");
            let tests: String = cases
                .iter()
                .enumerate()
                .map(|(i, (x, y))| format!("function case{i}() {{ assertEqual(f({x}), {y}); }}\n"))
                .collect();
            let shape = |results: Vec<TestResult>| -> Vec<(String, TestStatus, Option<String>)> {
                results.into_iter().map(|r| (r.name, r.status, r.message)).collect()
            };
            let first = shape(run(&program, &tests));
            let second = shape(run(&program, &tests));
            prop_assert_eq!(first.len(), cases.len());
            prop_assert_eq!(first, second);
        }
    }
}

mod mutation_properties {
    use super::*;

    proptest! {
        /// Property: injection never fails on arbitrary text, and `changed` is truthful.
        #[test]
        fn injection_is_total(source in "\\PC{0,200}") {
            for pattern in BugPattern::ALL {
                let mutation = mutations::inject(&source, *pattern).expect("rules compile");
                prop_assert_eq!(mutation.changed, mutation.source != source);
            }
        }

        /// Property: swapping logical operators twice restores the source.
        #[test]
        fn logical_swap_is_an_involution(
            parts in prop::collection::vec(prop_oneof!["[a-z]{1,4}", Just(" && ".to_string()), Just(" || ".to_string())], 0..12),
        ) {
            let source = parts.concat();
            let once = mutations::inject(&source, BugPattern::LogicalOperator).expect("rules compile").source;
            let twice = mutations::inject(&once, BugPattern::LogicalOperator).expect("rules compile").source;
            prop_assert_eq!(twice, source);
        }
    }
}
