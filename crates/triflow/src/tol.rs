//! Tolerances and tunables that are not part of the exact predicates.
//!
//! [`GeomTol`] centralizes epsilons in one small `Copy` struct instead of
//! scattering magic numbers through the call sites that need them. Nothing here
//! loosens the exact orientation/incircle tests in [`crate::predicates`];
//! those are sign-exact regardless of tolerance. `GeomTol` only governs
//! bisection/relaxation stopping criteria downstream of the predicates.

/// Tolerances used outside the exact-predicate layer.
#[derive(Clone, Copy, Debug)]
pub struct GeomTol {
    /// Relative tolerance for [`crate::curve::Curve::distance_away`]'s
    /// bracket-then-bisect search.
    pub curve_rtol: f64,
    /// Absolute distance below which two points are considered coincident
    /// for duplicate-node detection.
    pub coincident_eps: f64,
}

impl Default for GeomTol {
    fn default() -> Self {
        Self {
            curve_rtol: 0.05,
            coincident_eps: 1e-9,
        }
    }
}

/// Tunables for the advancing-front driver.
#[derive(Clone, Copy, Debug)]
pub struct AdvancingFrontCfg {
    /// Maximum number of `relax_node` passes per batch of edits.
    pub max_levels: u32,
    /// `optimize_edits` stops early once the worst node cost drops to or
    /// below this value.
    pub max_cost_relax: f64,
    /// Upper bound on how many source-edge-lengths a `SLIDE` node's free
    /// span may grow to before `resample` forces a split.
    pub max_span_factor: f64,
    /// Wall strategy is preferred near this internal angle (radians).
    pub wall_pivot_angle: f64,
    /// Cutoff/Join strategies refuse a site whose internal angle exceeds
    /// this (radians), reporting an infinite metric instead.
    pub max_strategy_angle: f64,
    /// `initialize_boundaries` marks an upsampled boundary point `RIGID`
    /// when the curve's turning angle there exceeds this threshold
    /// (radians), `SLIDE` otherwise.
    pub corner_angle_threshold: f64,
}

impl Default for AdvancingFrontCfg {
    fn default() -> Self {
        Self {
            max_levels: 3,
            max_cost_relax: 2.0,
            max_span_factor: 1.5,
            wall_pivot_angle: std::f64::consts::FRAC_PI_2,
            max_strategy_angle: 89.0_f64.to_radians(),
            corner_angle_threshold: 30.0_f64.to_radians(),
        }
    }
}
