//! Newton-Raphson solver for systems of nonlinear equations  F(x) = 0.
//!
//! Each iteration takes the full step  x_{k+1} = x_k - J(x_k)^{-1} F(x_k)  with the inverse computed by
//! Gauss-Jordan elimination with full pivoting. No damping, line search or bounds are applied,
//! a poor initial guess may diverge or oscillate.
//!
//! Outcomes:
//! - `NRStatus::Converged`: |x_{k+1} - x_k| < tolerance, returned at once
//! - `NRStatus::IterationLimitReached`: max_iterations done, last iterate returned. This is not an error,
//!   callers that need certainty must check the residual themselves
//! - `NRStatus::NotFinite`: F or J evaluated to NaN/inf at the current iterate (a function was evaluated
//!   outside of its domain), or the step overflowed. The last iterate is returned as it is
//! - `NRError::SingularMatrix`: the Jacobian could not be inverted, no solution is returned
use super::GaussJordan::{MatrixError, SquareMatrix};
use log::{debug, info, warn};
use nalgebra::DVector;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NRError {
    #[error("Singular Jacobian at iteration {iteration}: pivot {pivot:e} at elimination step {step}")]
    SingularMatrix {
        iteration: usize,
        step: usize,
        pivot: f64,
    },
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("Invalid solver settings: {0}")]
    InvalidSettings(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NRStatus {
    Converged,
    IterationLimitReached,
    NotFinite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NRSolution {
    pub x: DVector<f64>,
    pub status: NRStatus,
    /// number of Newton steps taken
    pub iterations: usize,
}

impl NRSolution {
    pub fn is_converged(&self) -> bool {
        self.status == NRStatus::Converged
    }
}

/// Newton-Raphson solver over residual function F: R^n -> R^n and its Jacobian J: R^n -> R^(n x n)
pub struct NR<F, J>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
    J: Fn(&DVector<f64>) -> SquareMatrix,
{
    residuals: F,
    jacobian: J,
    tolerance: f64,
    max_iterations: usize,
}

#[allow(non_snake_case)]
impl<F, J> NR<F, J>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
    J: Fn(&DVector<f64>) -> SquareMatrix,
{
    pub fn new(residuals: F, jacobian: J, tolerance: f64, max_iterations: usize) -> Result<Self, NRError> {
        if !(tolerance > 0.0) {
            return Err(NRError::InvalidSettings(format!(
                "tolerance must be positive, got {}",
                tolerance
            )));
        }
        if max_iterations == 0 {
            return Err(NRError::InvalidSettings(
                "max_iterations must be positive".to_string(),
            ));
        }
        Ok(Self {
            residuals,
            jacobian,
            tolerance,
            max_iterations,
        })
    }

    /// one Newton step from x: returns J(x)^{-1} F(x), None if F(x) or J(x) is not finite
    fn step(&self, x: &DVector<f64>, iteration: usize) -> Result<Option<DVector<f64>>, NRError> {
        let n = x.len();
        let A = (self.jacobian)(x);
        let b = (self.residuals)(x);
        if A.dim() != n || b.len() != n {
            return Err(NRError::DimensionMismatch(format!(
                "{} unknowns, {} residuals, Jacobian {}x{}",
                n,
                b.len(),
                A.dim(),
                A.dim()
            )));
        }
        if let Some(i) = b.iter().position(|v| !v.is_finite()) {
            warn!("residual {} is {} at iteration {}", i, b[i], iteration);
            return Ok(None);
        }
        if let Some((i, j, value)) = A.find_not_finite() {
            warn!("Jacobian entry ({}, {}) is {} at iteration {}", i, j, value, iteration);
            return Ok(None);
        }
        let A_inv = A.invert().map_err(|e| match e {
            MatrixError::Singular { step, pivot } => NRError::SingularMatrix {
                iteration,
                step,
                pivot,
            },
            other => NRError::DimensionMismatch(other.to_string()),
        })?;
        A_inv
            .mul_vector(&b)
            .map(Some)
            .map_err(|e| NRError::DimensionMismatch(e.to_string()))
    }

    pub fn solve(&self, initial_guess: DVector<f64>) -> Result<NRSolution, NRError> {
        let mut x = initial_guess;
        for k in 0..self.max_iterations {
            let Some(delta) = self.step(&x, k)? else {
                return Ok(NRSolution {
                    x,
                    status: NRStatus::NotFinite,
                    iterations: k,
                });
            };
            let x_next = &x - &delta;
            let distance = (&x_next - &x).norm();
            debug!("iteration {}: step norm {:e}", k, distance);
            x = x_next;
            if distance < self.tolerance {
                info!("Newton-Raphson converged in {} iterations", k + 1);
                return Ok(NRSolution {
                    x,
                    status: NRStatus::Converged,
                    iterations: k + 1,
                });
            }
            if !distance.is_finite() {
                warn!("Newton-Raphson iterate is not finite at iteration {}", k);
                return Ok(NRSolution {
                    x,
                    status: NRStatus::NotFinite,
                    iterations: k + 1,
                });
            }
        }
        warn!(
            "Newton-Raphson: iteration limit {} reached without convergence",
            self.max_iterations
        );
        Ok(NRSolution {
            x,
            status: NRStatus::IterationLimitReached,
            iterations: self.max_iterations,
        })
    }
}

/// solve F(x) = 0 from initial_guess
pub fn solve<F, J>(
    residuals: F,
    jacobian: J,
    initial_guess: DVector<f64>,
    tolerance: f64,
    max_iterations: usize,
) -> Result<NRSolution, NRError>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
    J: Fn(&DVector<f64>) -> SquareMatrix,
{
    NR::new(residuals, jacobian, tolerance, max_iterations)?.solve(initial_guess)
}
