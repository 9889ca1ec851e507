//! Hyperspherical coordinates of a parameter vector
//!
//! A point `x` of the n-dimensional space is represented as `(r, φ_1, ..., φ_(n-1))`:
//!
//! ```text
//! x_1     = r cos φ_1
//! x_2     = r sin φ_1 cos φ_2
//! ...
//! x_(n-1) = r sin φ_1 ... sin φ_(n-2) cos φ_(n-1)
//! x_n     = r sin φ_1 ... sin φ_(n-2) sin φ_(n-1)
//! ```
//!
//! `φ_1, ..., φ_(n-2)` are in `[0, π]`, `φ_(n-1)` is in `(-π, π]`. A single coordinate has no
//! angle and is kept as it is, sign included.

/// Convert cartesian coordinates to `(r, φ_1, ..., φ_(n-1))`
pub fn to_spherical(x: &[f64]) -> Vec<f64> {
    let n = x.len();
    match n {
        0 => return vec![],
        1 => return vec![x[0]],
        _ => {}
    }

    // tail[i] = sqrt(x_i^2 + ... + x_n^2)
    let mut tail = vec![0.0_f64; n + 1];
    for i in (0..n).rev() {
        tail[i] = tail[i + 1].hypot(x[i]);
    }

    let mut spherical = Vec::with_capacity(n);
    spherical.push(tail[0]);
    for i in 0..n - 2 {
        let phi = if tail[i] == 0.0 {
            0.0
        } else {
            (x[i] / tail[i]).clamp(-1.0, 1.0).acos()
        };
        spherical.push(phi);
    }
    spherical.push(f64::atan2(x[n - 1], x[n - 2]));
    spherical
}

/// Convert `(r, φ_1, ..., φ_(n-1))` back to cartesian coordinates
pub fn to_cartesian(spherical: &[f64]) -> Vec<f64> {
    let n = spherical.len();
    if n == 0 {
        return vec![];
    }
    let r = spherical[0];
    if n == 1 {
        return vec![r];
    }

    let mut x = Vec::with_capacity(n);
    let mut sin_product = r;
    for &phi in &spherical[1..] {
        let (sin, cos) = phi.sin_cos();
        x.push(sin_product * cos);
        sin_product *= sin;
    }
    x.push(sin_product);
    x
}
