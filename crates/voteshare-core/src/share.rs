//! Modular additive-share arithmetic.
//!
//! `P` is the Mersenne prime `2^61 - 1`. It fits in 61 bits, so the sum of
//! two reduced values never overflows a `u64` and a single conditional
//! subtraction is enough to reduce it back into `[0, P)`.

use rand::RngCore;

pub const P: u64 = (1u64 << 61) - 1;

/// `(a + b) mod P`, for `a, b` already in `[0, P)`.
pub fn add_mod(a: u64, b: u64) -> u64 {
    let sum = a + b;
    if sum >= P {
        sum - P
    } else {
        sum
    }
}

/// `(a - b) mod P`, for `a, b` already in `[0, P)`.
pub fn sub_mod(a: u64, b: u64) -> u64 {
    if a >= b {
        a - b
    } else {
        P - (b - a)
    }
}

/// Uniform random value in `[0, P)` via rejection sampling on the low 61 bits.
pub fn random_share<R: RngCore>(rng: &mut R) -> u64 {
    loop {
        let v = rng.next_u64() & P;
        if v < P {
            return v;
        }
    }
}

/// Split the secret `1` into two additive shares `(delta_a, delta_b)` such
/// that `delta_a + delta_b ≡ 1 (mod P)`. `delta_a` is drawn uniformly;
/// `delta_b` is derived as `(1 - delta_a) mod P`, per spec §4.3.
pub fn split_one<R: RngCore>(rng: &mut R) -> (u64, u64) {
    let delta_a = random_share(rng);
    let delta_b = sub_mod(1, delta_a);
    (delta_a, delta_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundary_delta_a_zero() {
        assert_eq!(sub_mod(1, 0), 1);
    }

    #[test]
    fn boundary_delta_a_p_minus_one() {
        assert_eq!(sub_mod(1, P - 1), 2);
    }

    #[test]
    fn split_one_is_deterministic_given_delta_a() {
        let (a, b) = (0u64, sub_mod(1, 0));
        assert_eq!(add_mod(a, b), 1);
    }

    proptest! {
        #[test]
        fn split_one_invariant_holds(seed: u64) {
            use rand::SeedableRng;
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let (delta_a, delta_b) = split_one(&mut rng);
            prop_assert!(delta_a < P);
            prop_assert!(delta_b < P);
            prop_assert_eq!(add_mod(delta_a, delta_b), 1);
        }

        #[test]
        fn add_mod_never_overflows_range(a in 0u64..P, b in 0u64..P) {
            let s = add_mod(a, b);
            prop_assert!(s < P);
        }

        #[test]
        fn sub_mod_is_add_mod_inverse(a in 0u64..P, b in 0u64..P) {
            let s = add_mod(a, b);
            prop_assert_eq!(sub_mod(s, b), a);
        }
    }
}
