use felt_cli::exit_code;

fn run(args: &[&str]) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut argv = vec!["felt"];
    argv.extend_from_slice(args);
    let code = felt_cli::run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn help_goes_to_stdout_with_success() {
    let (code, out, err) = run(&["--help"]);
    assert_eq!(code, exit_code::SUCCESS);
    assert!(out.contains("Usage"));
    for cmd in ["deal", "eval", "sim", "cfg"] {
        assert!(out.contains(cmd), "help should list {}", cmd);
    }
    assert!(err.is_empty());
}

#[test]
fn unknown_command_prints_usage_and_fails() {
    let (code, out, err) = run(&["shuffle"]);
    assert_eq!(code, exit_code::ERROR);
    assert!(out.is_empty());
    assert!(err.contains("Usage: felt <command> [options]"));
    assert!(err.contains("  sim"));
}

#[test]
fn deal_with_a_seed_is_reproducible() {
    let first = run(&["deal", "--seed", "42", "--seats", "3"]);
    let second = run(&["deal", "--seed", "42", "--seats", "3"]);
    assert_eq!(first.0, exit_code::SUCCESS);
    assert_eq!(first, second);
    assert!(first.1.starts_with("Hand 1 (seed 42)"));
    assert!(first.1.contains("Seat 2: "));
    assert!(!first.1.contains("Seat 3: "));
}

#[test]
fn deal_rejects_oversized_tables() {
    let (code, _, err) = run(&["deal", "--seed", "1", "--seats", "11"]);
    assert_eq!(code, exit_code::ERROR);
    assert!(err.starts_with("Error: Engine error:"), "{}", err);
}

#[test]
fn eval_ranks_reference_hands() {
    let cases = [
        (vec!["9h", "Th", "Jh", "Qh", "Kh", "2c", "3s"], "straight flush"),
        (vec!["Kc", "Ks", "Kh", "9h", "9d", "2h", "4s"], "full house"),
        (vec!["Ac", "2d", "3h", "4s", "5c", "9d", "Jh"], "straight"),
    ];
    for (cards, expected) in cases {
        let mut args = vec!["eval"];
        args.extend(cards);
        let (code, out, _) = run(&args);
        assert_eq!(code, exit_code::SUCCESS);
        assert!(out.starts_with(&format!("Hand: {}\n", expected)), "{}", out);
    }
}

#[test]
fn eval_equity_on_a_flop() {
    let (code, out, err) = run(&[
        "eval",
        "Ah",
        "Kh",
        "--board",
        "Qh",
        "Jh",
        "2c",
        "--opponents",
        "2",
        "--iterations",
        "300",
        "--seed",
        "9",
    ]);
    assert_eq!(code, exit_code::SUCCESS, "{}", err);
    assert!(out.contains("Board: Qh Jh 2c"));
    assert!(out.contains("Current hand: high card"));
    assert!(out.contains("Equity vs 2 opponents: "));
    assert!(out.contains("300 iterations, seed 9"));
}

#[test]
fn eval_reports_bad_cards() {
    let (code, _, err) = run(&["eval", "Ah", "1x"]);
    assert_eq!(code, exit_code::ERROR);
    assert!(err.starts_with("Error: "));

    let (code, _, err) = run(&["eval", "Ah", "Ah"]);
    assert_eq!(code, exit_code::ERROR);
    assert!(err.contains("appears twice"));
}

#[test]
fn sim_requires_hands() {
    let (code, _, err) = run(&["sim"]);
    assert_eq!(code, exit_code::ERROR);
    assert!(err.contains("--hands"));

    let (code, _, err) = run(&["sim", "--hands", "0"]);
    assert_eq!(code, exit_code::ERROR);
    assert!(err.contains("hands must be >= 1"));
}

#[test]
fn sim_rejects_unknown_profiles() {
    let (code, _, err) = run(&["sim", "--hands", "1", "--profile", "maniac"]);
    assert_eq!(code, exit_code::ERROR);
    assert!(err.contains("maniac"));
}
