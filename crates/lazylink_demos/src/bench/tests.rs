use pretty_assertions::assert_eq;

use super::*;

#[test]
fn sum_and_multiply_doubles_the_sum() {
    assert_eq!(sum_and_multiply(3, 4, MULTIPLIER), 14);
    assert_eq!(sum_and_multiply(-3, 3, 7), 0);
}

#[test]
fn expected_total_matches_brute_force() {
    for loops in [0_u32, 1, 2, 17] {
        let brute: i64 = (0..i64::from(loops))
            .flat_map(|x| (0..i64::from(loops)).map(move |y| sum_and_multiply(x, y, MULTIPLIER)))
            .sum();
        assert_eq!(expected_total(loops), Some(brute), "loops = {loops}");
    }
}

#[test]
fn every_style_computes_the_same_total() {
    let bench = DispatchBench::new().unwrap();
    for style in DispatchStyle::ALL {
        let timing = bench.run(style, 50).unwrap();
        assert_eq!(timing.style, style);
        assert_eq!(Some(timing.total), expected_total(50), "{style}");
    }
}

#[test]
fn run_all_orders_by_style_then_repeat() {
    let bench = DispatchBench::new().unwrap();
    let timings = bench.run_all(5, 2).unwrap();
    let styles: Vec<_> = timings.iter().map(|t| t.style).collect();
    let expected: Vec<_> = DispatchStyle::ALL.iter().flat_map(|s| [*s, *s]).collect();
    assert_eq!(styles, expected);
    assert!(timings.iter().all(|t| Some(t.total) == expected_total(5)));
}

#[test]
fn expected_total_overflow_is_none() {
    assert!(expected_total(1_000_000).is_some());
    assert_eq!(expected_total(2_000_000), None);
    assert_eq!(expected_total(u32::MAX), None);
}

#[test]
fn overflowing_run_fails_before_calling() {
    let bench = DispatchBench::new().unwrap();
    let err = bench.run(DispatchStyle::Direct, 2_000_000).unwrap_err();
    assert!(err.to_string().contains("overflows long"), "{err}");
    assert!(bench.run_all(u32::MAX, 1).is_err());
}
