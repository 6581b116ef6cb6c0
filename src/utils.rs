//! Assorted numeric helpers.

/// Linear interpolation of a cost-to-go between two bracketing grid points.
///
/// Given `lo = (a, V(a))` and `hi = (b, V(b))` with `a < x < b`, returns
/// `V(a) + (V(b) - V(a)) * (x - a) / (b - a)`. If either endpoint is
/// infeasible (non-finite), the result is `+inf`.
#[inline]
pub fn interpolate(x: f64, lo: (f64, f64), hi: (f64, f64)) -> f64 {
    let (a, va) = lo;
    let (b, vb) = hi;
    if !va.is_finite() || !vb.is_finite() {
        return f64::INFINITY;
    }
    va + (vb - va) * ((x - a) / (b - a))
}

/// Render a state or cost the way reports print it: integers without a
/// trailing `.0`, everything else in shortest round-trip form.
#[inline]
pub fn fmt_state(x: f64) -> String {
    format!("{x}")
}
