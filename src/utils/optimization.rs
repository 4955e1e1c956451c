//! Bounded Nelder-Mead simplex search used for parameter estimation.

use std::cmp::Ordering;

/// Result of a Nelder-Mead search.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found.
    pub optimal_point: Vec<f64>,
    /// Objective value at `optimal_point`.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the tolerance was reached before `max_iter`.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Relative spread of objective values at which the search stops.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrink coefficient.
    pub sigma: f64,
    /// Initial simplex step, relative to the start coordinate when non-zero.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

impl NelderMeadConfig {
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
}

/// Simplex vertices kept sorted by objective value, best first.
struct Simplex<'a, F> {
    objective: F,
    bounds: Option<&'a [(f64, f64)]>,
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl<'a, F> Simplex<'a, F>
where
    F: Fn(&[f64]) -> f64,
{
    fn new(objective: F, initial: &[f64], bounds: Option<&'a [(f64, f64)]>, step: f64) -> Self {
        let mut points = Vec::with_capacity(initial.len() + 1);
        points.push(clamp(initial.to_vec(), bounds));
        for i in 0..initial.len() {
            let mut vertex = initial.to_vec();
            vertex[i] += if initial[i].abs() > 1e-10 {
                step * initial[i].abs()
            } else {
                step
            };
            points.push(clamp(vertex, bounds));
        }

        let mut simplex = Self {
            objective,
            bounds,
            values: Vec::new(),
            points,
        };
        simplex.values = simplex.points.iter().map(|p| simplex.eval(p)).collect();
        simplex.sort();
        simplex
    }

    /// Objective with non-finite values mapped to +inf so they always lose.
    fn eval(&self, point: &[f64]) -> f64 {
        let v = (self.objective)(point);
        if v.is_finite() {
            v
        } else {
            f64::INFINITY
        }
    }

    fn sort(&mut self) {
        let mut order: Vec<usize> = (0..self.points.len()).collect();
        order.sort_by(|&a, &b| {
            self.values[a]
                .partial_cmp(&self.values[b])
                .unwrap_or(Ordering::Equal)
        });
        self.points = order.iter().map(|&i| self.points[i].clone()).collect();
        self.values = order.iter().map(|&i| self.values[i]).collect();
    }

    fn worst(&self) -> usize {
        self.points.len() - 1
    }

    /// Centroid of every vertex but the worst.
    fn centroid(&self) -> Vec<f64> {
        let dims = self.points[0].len();
        let count = self.worst() as f64;
        let mut centroid = vec![0.0; dims];
        for point in &self.points[..self.worst()] {
            for (c, x) in centroid.iter_mut().zip(point) {
                *c += x;
            }
        }
        centroid.iter_mut().for_each(|c| *c /= count);
        centroid
    }

    /// Point at `centroid + coef * (towards - centroid)`, clamped to bounds.
    fn along(&self, centroid: &[f64], towards: &[f64], coef: f64) -> Vec<f64> {
        let point = centroid
            .iter()
            .zip(towards)
            .map(|(c, t)| c + coef * (t - c))
            .collect();
        clamp(point, self.bounds)
    }

    fn replace_worst(&mut self, point: Vec<f64>, value: f64) {
        let w = self.worst();
        self.points[w] = point;
        self.values[w] = value;
    }

    fn shrink(&mut self, sigma: f64) {
        let best = self.points[0].clone();
        for i in 1..self.points.len() {
            let point = best
                .iter()
                .zip(&self.points[i])
                .map(|(b, x)| b + sigma * (x - b))
                .collect();
            self.points[i] = clamp(point, self.bounds);
            self.values[i] = self.eval(&self.points[i]);
        }
    }

    fn converged(&self, tolerance: f64) -> bool {
        let best = self.values[0];
        let worst = self.values[self.worst()];
        if best.is_finite() && worst.is_finite() && worst - best <= tolerance * (1.0 + best.abs())
        {
            return true;
        }

        let diameter = self.points[1..]
            .iter()
            .map(|p| distance(p, &self.points[0]))
            .fold(0.0, f64::max);
        diameter < tolerance
    }
}

/// Minimize `objective` starting from `initial`.
///
/// Each coordinate is clamped to its `(min, max)` pair when `bounds` is
/// given; unbounded coordinates can use infinite limits. Non-finite
/// objective values are treated as worse than any finite value.
///
/// # Example
/// ```
/// use revenue_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    if initial.is_empty() {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let mut simplex = Simplex::new(objective, initial, bounds, config.initial_step);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        if simplex.converged(config.tolerance) {
            converged = true;
            break;
        }
        iterations += 1;

        let w = simplex.worst();
        let best = simplex.values[0];
        let second_worst = simplex.values[w - 1];
        let worst = simplex.values[w];
        let centroid = simplex.centroid();

        let reflected = simplex.along(&centroid, &simplex.points[w], -config.alpha);
        let reflected_value = simplex.eval(&reflected);

        if reflected_value < best {
            let expanded = simplex.along(&centroid, &reflected, config.gamma);
            let expanded_value = simplex.eval(&expanded);
            if expanded_value < reflected_value {
                simplex.replace_worst(expanded, expanded_value);
            } else {
                simplex.replace_worst(reflected, reflected_value);
            }
        } else if reflected_value < second_worst {
            simplex.replace_worst(reflected, reflected_value);
        } else {
            let (contracted, threshold) = if reflected_value < worst {
                (
                    simplex.along(&centroid, &reflected, config.rho),
                    reflected_value,
                )
            } else {
                (simplex.along(&centroid, &simplex.points[w], config.rho), worst)
            };
            let contracted_value = simplex.eval(&contracted);
            if contracted_value < threshold {
                simplex.replace_worst(contracted, contracted_value);
            } else {
                simplex.shrink(config.sigma);
            }
        }

        simplex.sort();
    }

    NelderMeadResult {
        optimal_point: simplex.points[0].clone(),
        optimal_value: simplex.values[0],
        iterations,
        converged,
    }
}

fn clamp(point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    match bounds {
        None => point,
        Some(b) => point
            .into_iter()
            .enumerate()
            .map(|(i, x)| match b.get(i) {
                Some(&(lo, hi)) => x.clamp(lo, hi),
                None => x,
            })
            .collect(),
    }
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
