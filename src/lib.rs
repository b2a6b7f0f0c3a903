//! # Kentroid
//!
//! Dense matrix primitives and k-means clustering for small numeric
//! datasets.
//!
//! ## Features
//!
//! - **Matrix**: a dense row-major container with dual text/numeric cell
//!   storage, for data that arrives as strings (CSV-style) and is consumed
//!   as doubles
//! - **Elementwise and reduction ops**: power, square root, axis sums and
//!   means, argmin with first-seen tie-breaking
//! - **Algebraic ops**: concatenation, multiplication, and the recursive
//!   cofactor family (minor, determinant, adjoint, inverse) with a
//!   documented singularity tolerance
//! - **KMeans**: random centroid sampling, nearest-centroid assignment,
//!   mean updates over a fixed epoch budget, with typed errors for every
//!   failure condition
//!
//! ## Example
//!
//! ```rust
//! use kentroid::{determinant, inverse, multiply, Matrix};
//!
//! let m = Matrix::from_rows(vec![
//!     vec![1.0, 2.0, 3.0],
//!     vec![4.0, 5.0, 6.0],
//!     vec![7.0, 8.0, 10.0],
//! ]).unwrap();
//!
//! assert_eq!(determinant(&m).unwrap(), -3.0);
//!
//! // Multiplying by the inverse recovers the identity.
//! let product = multiply(&m, &inverse(&m).unwrap()).unwrap();
//! assert!((product.get(0, 0).unwrap() - 1.0).abs() < 1e-9);
//! assert!(product.get(0, 1).unwrap().abs() < 1e-9);
//! ```
//!
//! Clustering works on the same matrices:
//!
//! ```rust
//! use kentroid::{KMeans, Matrix};
//!
//! let x = Matrix::from_rows(vec![
//!     vec![0.0, 0.1], vec![0.2, 0.0], vec![0.1, 0.2],
//!     vec![9.9, 10.0], vec![10.1, 9.8], vec![10.0, 10.2],
//! ]).unwrap();
//!
//! // A sampled initialization can collapse a cluster; the error is
//! // recoverable, so retry with a fresh seed.
//! let labels = (0..16).find_map(|seed| {
//!     let mut model = KMeans::new(2).epochs(20).random_state(seed);
//!     model.fit_predict(&x).ok()
//! }).unwrap();
//! assert_eq!(labels.shape(), (6, 1));
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod kmeans;
pub mod linalg;
pub mod matrix;
pub mod ops;

pub use error::{Error, Result};
pub use kmeans::{KMeans, Params};
pub use linalg::{
    adjoint, concat, determinant, inverse, inverse_with_tolerance, minor, multiply,
    CofactorExpansion, Determinant, SINGULAR_TOLERANCE,
};
pub use matrix::{Matrix, Repr};
pub use ops::{add, argmin, mean, power, sqrt, sub, sum, Axis};

/// Re-export commonly used types from ndarray
pub use ndarray::{Array1, Array2};
