/// square matrix type and its inversion by Gauss-Jordan elimination with full pivoting
pub mod GaussJordan;
/// Newton-Raphson solver for systems of nonlinear equations with analytic Jacobian
/// # Examples
/// ```
/// use HVPEq::Numerical::GaussJordan::SquareMatrix;
/// use HVPEq::Numerical::NR::{NRStatus, solve};
/// use nalgebra::DVector;
/// // x^2 - 2 = 0
/// let F = |x: &DVector<f64>| DVector::from_vec(vec![x[0] * x[0] - 2.0]);
/// let J = |x: &DVector<f64>| SquareMatrix::from_rows(&[vec![2.0 * x[0]]]).unwrap();
/// let solution = solve(F, J, DVector::from_vec(vec![1.0]), 1e-10, 50).unwrap();
/// assert_eq!(solution.status, NRStatus::Converged);
/// assert!((solution.x[0] - 2f64.sqrt()).abs() < 1e-10);
/// ```
pub mod NR;
