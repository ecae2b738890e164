use std::process::Command;

use quakesafe_core::PathResult;

fn solve(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_quakesafe"))
        .arg("solve")
        .args(args)
        .output()
        .expect("failed to run quakesafe binary")
}

#[test]
fn seeded_solve_is_reproducible() {
    let first = solve(&["--seed", "42", "--size", "8"]);
    let second = solve(&["--seed", "42", "--size", "8"]);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn json_solve_emits_route() {
    let output = solve(&["--seed", "7", "--size", "6", "--json"]);
    assert!(output.status.success());

    let route: PathResult = serde_json::from_slice(&output.stdout).expect("valid route json");
    if route.is_reachable() {
        assert_eq!(route.path.len() as u32, route.total_cost.get() + 1);
    } else {
        assert!(route.path.is_empty());
    }
}

#[test]
fn invalid_size_fails() {
    let output = solve(&["--seed", "1", "--size", "0"]);
    assert!(!output.status.success());
}
