//! Two-body kinematics shared by the lineshapes

/// Squared breakup momentum of the two-body decay `M -> m1 m2`
///
/// Zero below threshold, `M < m1 + m2`.
pub fn breakup_momentum_squared(mass: f64, m1: f64, m2: f64) -> f64 {
    if mass < m1 + m2 || mass <= 0.0 {
        return 0.0;
    }
    let q2 = (mass - m1 - m2) * (mass + m1 + m2) * (mass - m1 + m2) * (mass + m1 - m2)
        / (4.0 * mass * mass);
    // rounding right at threshold
    q2.max(0.0)
}

/// Breakup momentum of the two-body decay `M -> m1 m2`
///
/// Momentum of either daughter in the rest frame of the mother, zero below threshold.
pub fn breakup_momentum(mass: f64, m1: f64, m2: f64) -> f64 {
    breakup_momentum_squared(mass, m1, m2).sqrt()
}

#[allow(clippy::float_cmp)]
#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use rand::prelude::*;

    #[test]
    fn below_threshold_is_zero() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..1000 {
            let m1: f64 = rng.random_range(0.0..2.0);
            let m2: f64 = rng.random_range(0.0..2.0);
            let mass = rng.random_range(0.0..1.0) * (m1 + m2);
            let q = breakup_momentum(mass, m1, m2);
            assert_eq!(q, 0.0);
            assert!(!q.is_nan());
        }
    }

    #[test]
    fn at_threshold_is_zero() {
        assert_eq!(breakup_momentum(0.5, 0.25, 0.25), 0.0);
    }

    #[test]
    fn massless_daughters() {
        assert_relative_eq!(breakup_momentum(2.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn rho_to_pi_pi() {
        // q = sqrt(M^2/4 - m^2) for equal daughter masses
        let (mass, m_pi) = (0.775, 0.13957);
        let desired = f64::sqrt(mass * mass / 4.0 - m_pi * m_pi);
        assert_relative_eq!(breakup_momentum(mass, m_pi, m_pi), desired, epsilon = 1e-12);
    }

    #[test]
    fn symmetric_in_daughters() {
        assert_relative_eq!(
            breakup_momentum(1.8, 0.77, 0.14),
            breakup_momentum(1.8, 0.14, 0.77),
            epsilon = 1e-14
        );
    }
}
