//! Property tests for loop-count selection.

use std::cell::Cell;

use proptest::prelude::*;
use timebandit::{autorange_candidates, Timer};

fn is_one_two_five(n: usize) -> bool {
    let mut decade = n;
    while decade >= 10 && decade % 10 == 0 {
        decade /= 10;
    }
    matches!(decade, 1 | 2 | 5)
}

#[test]
fn candidates_follow_one_two_five() {
    let all: Vec<usize> = autorange_candidates().collect();
    assert!(all.iter().all(|&n| is_one_two_five(n)), "{:?}", all);
    assert!(all.windows(2).all(|w| w[0] < w[1]));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// With a fixed per-call cost, autorange stops at the first count whose
    /// trial reaches the threshold, and every earlier trial fell short.
    #[test]
    fn prop_autorange_first_crossing(cost_64ths in 1u32..=64, threshold_16ths in 1u32..=64) {
        let cost = f64::from(cost_64ths) / 64.0;
        let threshold = f64::from(threshold_16ths) / 16.0;

        let now = Cell::new(0.0f64);
        let mut timer = Timer::new(|| now.set(now.get() + cost))
            .with_clock(|| now.get())
            .threshold(threshold);

        let mut trials = Vec::new();
        let (number, time_taken) = timer
            .autorange_with(|n, t| trials.push((n, t)))
            .unwrap();

        let expected = autorange_candidates()
            .find(|&n| n as f64 * cost >= threshold)
            .unwrap();
        prop_assert_eq!(number, expected);
        prop_assert_eq!(time_taken, number as f64 * cost);
        prop_assert!(time_taken >= threshold);

        let (last, earlier) = trials.split_last().unwrap();
        prop_assert_eq!(*last, (number, time_taken));
        for &(n, t) in earlier {
            prop_assert!(t < threshold, "trial at {} already took {}", n, t);
        }
    }

    /// Timings are never negative whatever the loop count.
    #[test]
    fn prop_timeit_non_negative(number in 0usize..2_000) {
        let mut timer = Timer::new(|| ());
        let elapsed = timer.timeit(number).unwrap();
        prop_assert!(elapsed >= 0.0);
    }
}
