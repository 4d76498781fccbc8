// tests/properties_test.rs
use bsm_pricer::rng::seed_rng_from_u64;
use bsm_pricer::{price_call_bs, price_call_mc};
use proptest::prelude::*;

proptest! {
    #[test]
    fn closed_form_respects_no_arbitrage_bounds(
        s0 in 1.0f64..500.0,
        r in -0.05f64..0.2,
        sigma in 0.0f64..2.0,
        t in 0.0f64..5.0,
        k in 1.0f64..500.0,
    ) {
        let price = price_call_bs(s0, r, sigma, t, k).unwrap();
        let lower = (s0 - k * (-r * t).exp()).max(0.0);

        prop_assert!(price >= 0.0);
        prop_assert!(price >= lower - 1e-9 * s0.max(k), "price {} below bound {}", price, lower);
        prop_assert!(price <= s0 + 1e-12, "price {} above spot {}", price, s0);
    }

    #[test]
    fn monte_carlo_is_non_negative_and_reproducible(
        s0 in 10.0f64..200.0,
        sigma in 0.0f64..1.0,
        t in 0.0f64..2.0,
        k in 10.0f64..200.0,
        seed in any::<u64>(),
    ) {
        let a = price_call_mc(s0, 0.02, sigma, t, k, 2_000, &mut seed_rng_from_u64(seed)).unwrap();
        let b = price_call_mc(s0, 0.02, sigma, t, k, 2_000, &mut seed_rng_from_u64(seed)).unwrap();
        prop_assert!(a >= 0.0 && a.is_finite());
        prop_assert_eq!(a, b);
    }
}
