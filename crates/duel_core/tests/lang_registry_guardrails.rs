use std::collections::HashMap;

use duel_core::lang::globals::{self, CapabilityClass};
use duel_core::lang::keywords;
use duel_core::lang::operators;
use duel_core::lang::punctuation;

#[test]
fn keywords_table_order_matches_ids() {
    for (idx, info) in keywords::KEYWORDS.iter().enumerate() {
        assert_eq!(info.id as usize, idx, "keyword table out of order at {:?}", info.id);
    }
}

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(keywords::as_str(info.id), info.canonical);

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate keyword spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn operators_table_order_and_spellings() {
    let mut seen = HashMap::new();
    for (idx, info) in operators::OPERATORS.iter().enumerate() {
        assert_eq!(info.id as usize, idx, "operator table out of order at {:?}", info.id);
        assert_eq!(operators::from_str(info.spelling), Some(info.id));
        assert!(info.spelling.len() <= operators::MAX_SPELLING_LEN);
        if let Some(prev) = seen.insert(info.spelling, info.id) {
            panic!("duplicate operator spelling {:?}: {:?} and {:?}", info.spelling, prev, info.id);
        }
    }
}

#[test]
fn assignment_operators_end_with_eq() {
    for info in operators::OPERATORS {
        if operators::is_assignment(info.id) {
            assert!(info.spelling.ends_with('='), "{} is not an assignment spelling", info.spelling);
        }
    }
}

#[test]
fn punctuation_table_order_and_spellings() {
    for (idx, info) in punctuation::PUNCTUATION.iter().enumerate() {
        assert_eq!(info.id as usize, idx, "punctuation table out of order at {:?}", info.id);
        assert_eq!(punctuation::from_str(info.canonical), Some(info.id));
        assert!(
            operators::from_str(info.canonical).is_none(),
            "{} is both punctuation and an operator",
            info.canonical
        );
    }
}

#[test]
fn globals_table_order_and_unique_names() {
    let mut seen = HashMap::new();
    for (idx, info) in globals::GLOBALS.iter().enumerate() {
        assert_eq!(info.id as usize, idx, "globals table out of order at {:?}", info.id);
        assert!(!info.description.is_empty());
        if let Some(prev) = seen.insert(info.name, info.id) {
            panic!("duplicate global {:?}: {:?} and {:?}", info.name, prev, info.id);
        }
    }
}

#[test]
fn excluded_host_facilities_are_never_registered() {
    for name in globals::EXCLUDED {
        assert!(globals::from_str(name).is_none(), "{name} must not be an allow-listed global");
    }
}

#[test]
fn every_grantable_class_gates_at_least_one_global() {
    for class in CapabilityClass::GRANTABLE {
        assert!(globals::in_class(*class).next().is_some(), "{:?} gates nothing", class);
    }
}

#[test]
fn assertion_names_do_not_shadow_globals_or_keywords() {
    for (idx, info) in globals::ASSERTIONS.iter().enumerate() {
        assert_eq!(info.id as usize, idx);
        assert!(globals::from_str(info.name).is_none());
        assert!(keywords::from_str(info.name).is_none());
    }
}
