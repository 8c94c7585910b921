//! Every bundled challenge must pass its own starting suite.

use std::collections::HashSet;

use testduel::challenges::{self, Difficulty};
use testduel::engine::{EngineConfig, RunRequest, TestStatus, discover, run_to_end};

#[test]
fn every_challenge_passes_its_tests() {
    let config = EngineConfig::default().with_random_seed(Some(42));
    let mut failures = Vec::new();
    for challenge in challenges::catalog() {
        let (results, outcome) =
            run_to_end(RunRequest::new(challenge.program, challenge.tests), &config).expect("run starts");
        for result in results.iter().filter(|r| r.status != TestStatus::Passed) {
            failures.push(format!(
                "#{} {}: {} {} {}",
                challenge.id,
                challenge.title,
                result.name,
                result.status.as_str(),
                result.message.as_deref().unwrap_or("")
            ));
        }
        assert_eq!(outcome.total, discover(challenge.tests).len(), "#{} {}", challenge.id, challenge.title);
    }
    assert!(failures.is_empty(), "failing challenge tests:\n{}", failures.join("\n"));
}

#[test]
fn catalog_ids_are_unique_and_ascending() {
    let ids: Vec<u32> = challenges::catalog().iter().map(|c| c.id).collect();
    let unique: HashSet<u32> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn every_difficulty_is_represented() {
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        assert!(challenges::by_difficulty(difficulty).next().is_some(), "{difficulty}");
    }
    let total: usize = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
        .into_iter()
        .map(|d| challenges::by_difficulty(d).count())
        .sum();
    assert_eq!(total, challenges::catalog().len());
}
