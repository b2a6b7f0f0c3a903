//! K-means clustering over dense numeric matrices
//!
//! Centroids are initialized by sampling rows of the input uniformly at
//! random with replacement, then refined for a fixed epoch budget:
//! squared-Euclidean distances, row-wise argmin assignment, per-cluster
//! mean update. A cluster that loses all members aborts the fit with a
//! typed error; the caller decides whether to retry with a fresh seed.

use log::debug;
use ndarray::ArrayView1;
use rand::prelude::*;

use crate::error::{Error, Result};
use crate::linalg;
use crate::matrix::Matrix;
use crate::ops::{self, Axis};

/// K-means clustering model
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Number of clusters to form
    pub n_clusters: usize,
    /// Number of assignment/update passes per fit
    pub epochs: usize,
    /// Seed for centroid sampling; entropy-seeded when unset
    pub random_state: Option<u64>,
    centroids: Option<Matrix>,
    cost: f64,
}

/// Introspectable configuration of a [`KMeans`] model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Params {
    /// Number of clusters
    pub n_clusters: usize,
    /// Epoch budget per fit
    pub epochs: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            n_clusters: 3,
            epochs: 100,
            random_state: None,
            centroids: None,
            cost: 0.0,
        }
    }
}

impl KMeans {
    /// Create a new model with the given number of clusters
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Default::default()
        }
    }

    /// Set the epoch budget
    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Seed the centroid sampling for reproducibility.
    ///
    /// Each call to [`KMeans::fit`] seeds a fresh local generator from this
    /// value, so repeated fits with the same seed and data are identical.
    /// Without a seed the generator is entropy-seeded per fit.
    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Reconfigure the model in place.
    ///
    /// Fails with an `InvalidParameter` error when `n_clusters` is zero;
    /// an epoch budget of zero is allowed and leaves the sampled centroids
    /// unrefined.
    pub fn set_params(&mut self, n_clusters: usize, epochs: usize) -> Result<()> {
        if n_clusters == 0 {
            return Err(Error::invalid_parameter("n_clusters must be at least 1"));
        }
        self.n_clusters = n_clusters;
        self.epochs = epochs;
        Ok(())
    }

    /// Current configuration
    pub fn params(&self) -> Params {
        Params {
            n_clusters: self.n_clusters,
            epochs: self.epochs,
        }
    }

    /// Fit the model: sample centroids, then run the epoch budget of
    /// assignment/update passes.
    ///
    /// Any prior fitted state is discarded first. Fails with an
    /// `EmptyCluster` error if a cluster receives no points during an
    /// update; there is no internal reseeding, the whole fit aborts.
    pub fn fit(&mut self, x: &Matrix) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(Error::invalid_parameter("n_clusters must be at least 1"));
        }
        let data = x.numeric()?;
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(Error::shape("cannot fit on an empty matrix"));
        }

        self.centroids = None;
        self.cost = 0.0;

        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut centroids = self.sample_centroids(x, &mut rng)?;
        for epoch in 0..self.epochs {
            let distances = squared_distances(x, &centroids)?;
            let labels = ops::argmin(&distances, Axis::Row)?;
            let (updated, epoch_cost) = self.update_centroids(x, &centroids, &labels)?;
            centroids = updated;
            self.cost = epoch_cost;
            debug!(
                "epoch {}: mean distance to centroid {:.6}",
                epoch + 1,
                epoch_cost
            );
        }

        self.centroids = Some(centroids);
        Ok(())
    }

    /// Assign each row of `x` to its nearest fitted centroid.
    ///
    /// Returns an `nrows x 1` matrix of cluster indices. Fails with
    /// `NotFitted` before a successful [`KMeans::fit`].
    pub fn predict(&self, x: &Matrix) -> Result<Matrix> {
        let centroids = self.centroids.as_ref().ok_or(Error::NotFitted)?;
        let distances = squared_distances(x, centroids)?;
        ops::argmin(&distances, Axis::Row)
    }

    /// Fit the model, then predict on the same data
    pub fn fit_predict(&mut self, x: &Matrix) -> Result<Matrix> {
        self.fit(x)?;
        self.predict(x)
    }

    /// Negative of the cost: the mean Euclidean distance of every sample to
    /// its assigned centroid over the last completed epoch. Higher is
    /// better. Fails with `NotFitted` before a successful fit.
    pub fn score(&self) -> Result<f64> {
        if self.centroids.is_none() {
            return Err(Error::NotFitted);
        }
        Ok(-self.cost)
    }

    /// The fitted centroids, one row per cluster
    pub fn centroids(&self) -> Result<&Matrix> {
        self.centroids.as_ref().ok_or(Error::NotFitted)
    }

    /// Sample `n_clusters` rows of `x` uniformly at random with
    /// replacement. Duplicate centroids are possible and not corrected.
    fn sample_centroids<R: Rng>(&self, x: &Matrix, rng: &mut R) -> Result<Matrix> {
        let n = x.nrows();
        let mut rows = Vec::with_capacity(self.n_clusters);
        for _ in 0..self.n_clusters {
            let index = rng.gen_range(0..n);
            rows.push(x.row(index)?.to_vec());
        }
        Matrix::from_rows(rows)
    }

    /// Recompute each centroid as the feature-wise mean of its assigned
    /// rows, and report the epoch cost measured against the centroids the
    /// assignment was made with.
    fn update_centroids(
        &self,
        x: &Matrix,
        centroids: &Matrix,
        labels: &Matrix,
    ) -> Result<(Matrix, f64)> {
        let n = x.nrows();
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); self.n_clusters];
        for i in 0..n {
            let cluster = labels.get(i, 0)? as usize;
            members[cluster].push(i);
        }

        let mut total_distance = 0.0;
        let mut updated: Option<Matrix> = None;
        for (cluster, indices) in members.iter().enumerate() {
            if indices.is_empty() {
                return Err(Error::empty_cluster(cluster));
            }

            let center = centroids.row(cluster)?;
            for &i in indices {
                total_distance += squared_distance(x.row(i)?.view(), center.view()).sqrt();
            }

            let assigned = gather_rows(x, indices)?;
            let mean = ops::mean(&assigned, Axis::Column)?;
            updated = Some(match updated {
                None => mean,
                Some(acc) => linalg::concat(&acc, &mean, Axis::Row)?,
            });
        }

        let updated =
            updated.ok_or_else(|| Error::invalid_parameter("n_clusters must be at least 1"))?;
        Ok((updated, total_distance / n as f64))
    }
}

/// Squared Euclidean distance between two equal-length vectors
fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Full `nrows x n_clusters` matrix of squared Euclidean distances between
/// every row of `x` and every centroid
fn squared_distances(x: &Matrix, centroids: &Matrix) -> Result<Matrix> {
    if x.ncols() != centroids.ncols() {
        return Err(Error::shape(format!(
            "data has {} features but centroids have {}",
            x.ncols(),
            centroids.ncols()
        )));
    }
    let mut rows = Vec::with_capacity(x.nrows());
    for i in 0..x.nrows() {
        let xi = x.row(i)?;
        let mut row = Vec::with_capacity(centroids.nrows());
        for j in 0..centroids.nrows() {
            row.push(squared_distance(xi.view(), centroids.row(j)?.view()));
        }
        rows.push(row);
    }
    Matrix::from_rows(rows)
}

/// Copy the given rows of `x` into a fresh matrix
fn gather_rows(x: &Matrix, indices: &[usize]) -> Result<Matrix> {
    let mut rows = Vec::with_capacity(indices.len());
    for &i in indices {
        rows.push(x.row(i)?.to_vec());
    }
    Matrix::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let model = KMeans::default();
        assert_eq!(model.n_clusters, 3);
        assert_eq!(model.epochs, 100);
        assert_eq!(model.random_state, None);
    }

    #[test]
    fn test_builder_pattern() {
        let model = KMeans::new(5).epochs(20).random_state(42);
        assert_eq!(model.n_clusters, 5);
        assert_eq!(model.epochs, 20);
        assert_eq!(model.random_state, Some(42));
    }

    #[test]
    fn test_set_params() {
        let mut model = KMeans::new(2);
        model.set_params(4, 10).unwrap();
        assert_eq!(model.params(), Params { n_clusters: 4, epochs: 10 });

        assert!(matches!(
            model.set_params(0, 10).unwrap_err(),
            Error::InvalidParameter { .. }
        ));
    }

    #[test]
    fn test_not_fitted_guards() {
        let model = KMeans::new(2);
        let x = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        assert!(matches!(model.predict(&x).unwrap_err(), Error::NotFitted));
        assert!(matches!(model.score().unwrap_err(), Error::NotFitted));
        assert!(matches!(model.centroids().unwrap_err(), Error::NotFitted));
    }

    #[test]
    fn test_single_cluster_converges_to_mean() {
        let x = Matrix::from_rows(vec![vec![0.0, 0.0], vec![2.0, 2.0]]).unwrap();
        let mut model = KMeans::new(1).epochs(5).random_state(0);
        model.fit(&x).unwrap();

        let c = model.centroids().unwrap();
        assert_eq!(c.shape(), (1, 2));
        assert!((c.get(0, 0).unwrap() - 1.0).abs() < 1e-12);
        assert!((c.get(0, 1).unwrap() - 1.0).abs() < 1e-12);

        // Both points sit sqrt(2) away from the mean.
        let expected = 2.0_f64.sqrt();
        assert!((model.score().unwrap() + expected).abs() < 1e-12);

        let labels = model.predict(&x).unwrap();
        assert_eq!(labels.get(0, 0).unwrap(), 0.0);
        assert_eq!(labels.get(1, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_epoch_budget_keeps_sampled_centroids() {
        let x = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let mut model = KMeans::new(2).epochs(0).random_state(9);
        model.fit(&x).unwrap();

        assert_eq!(model.centroids().unwrap().shape(), (2, 2));
        assert_eq!(model.score().unwrap(), 0.0);
    }

    #[test]
    fn test_empty_cluster_aborts_fit() {
        // Three centroids sampled from two distinct rows always collide, and
        // the tie-broken assignment starves the duplicate.
        let x = Matrix::from_rows(vec![vec![0.0, 0.0], vec![10.0, 10.0]]).unwrap();
        for seed in 0..8 {
            let mut model = KMeans::new(3).epochs(1).random_state(seed);
            let err = model.fit(&x).unwrap_err();
            assert!(matches!(err, Error::EmptyCluster { .. }));
            assert!(matches!(model.score().unwrap_err(), Error::NotFitted));
        }
    }

    #[test]
    fn test_fit_rejects_empty_or_text_input() {
        let mut model = KMeans::new(1);

        let empty = Matrix::from_rows(vec![]).unwrap();
        assert!(matches!(model.fit(&empty).unwrap_err(), Error::Shape { .. }));

        let text = Matrix::from_text_rows(vec![vec!["1".to_string()]]).unwrap();
        assert!(matches!(
            model.fit(&text).unwrap_err(),
            Error::InvalidParameter { .. }
        ));
    }

    #[test]
    fn test_predict_feature_mismatch() {
        let x = Matrix::from_rows(vec![vec![0.0, 0.0], vec![2.0, 2.0]]).unwrap();
        let mut model = KMeans::new(1).epochs(2).random_state(3);
        model.fit(&x).unwrap();

        let wide = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(matches!(model.predict(&wide).unwrap_err(), Error::Shape { .. }));
    }

    #[test]
    fn test_refit_replaces_state() {
        let x = Matrix::from_rows(vec![vec![0.0], vec![1.0], vec![2.0]]).unwrap();
        let mut model = KMeans::new(1).epochs(3).random_state(1);
        model.fit(&x).unwrap();
        let first = model.centroids().unwrap().clone();

        model.fit(&x).unwrap();
        // Same seed and data, so the refit lands on the same centroids.
        assert_eq!(model.centroids().unwrap(), &first);
    }
}
