//! Terrain profiles along a polyline, in the foreground or on the
//! rayon pool.

use crate::{
    math::{accumulated_distances, distance, linspace, TOLERANCE},
    CotasError, ElevationSource,
};
use dem::C;
use geo::geometry::Coord;
use log::debug;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError},
        Arc,
    },
    time::Duration,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Distance along the path for each sample.
    pub distances: Vec<C>,

    /// Location of each sample.
    pub points: Vec<Coord<C>>,

    /// Terrain elevation at each sample, `None` where the source has
    /// no data.
    pub elevations: Vec<Option<C>>,
}

impl Profile {
    pub fn builder() -> ProfileBuilder {
        ProfileBuilder {
            path: None,
            step_size: None,
        }
    }

    /// Returns (distance, elevation) pairs.
    ///
    /// Missing elevations repeat the previous valid one; those before
    /// the first valid elevation are dropped.
    pub fn samples(&self) -> Vec<Coord<C>> {
        let mut last = None;
        self.distances
            .iter()
            .zip(&self.elevations)
            .filter_map(|(&x, &z)| {
                last = z.or(last);
                last.map(|y| Coord { x, y })
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    /// Vertices of the path (required).
    path: Option<Vec<Coord<C>>>,

    /// Maximum distance between samples (required).
    step_size: Option<C>,
}

impl ProfileBuilder {
    /// Vertices of the path (required).
    #[must_use]
    pub fn path(mut self, path: Vec<Coord<C>>) -> Self {
        self.path = Some(path);
        self
    }

    /// Maximum distance between samples (required).
    #[must_use]
    pub fn step_size(mut self, step: C) -> Self {
        self.step_size = Some(step);
        self
    }

    pub fn build<S>(&self, source: &S) -> Result<Profile, CotasError>
    where
        S: ElevationSource + ?Sized,
    {
        self.build_cancellable(source, &AtomicBool::new(false))
    }

    /// Like [ProfileBuilder::build], giving up with
    /// [CotasError::Cancelled] once `cancel` is set.
    pub fn build_cancellable<S>(
        &self,
        source: &S,
        cancel: &AtomicBool,
    ) -> Result<Profile, CotasError>
    where
        S: ElevationSource + ?Sized,
    {
        let path = self.path.as_ref().ok_or(CotasError::Builder("path"))?;
        let step = self.step_size.ok_or(CotasError::Builder("step_size"))?;
        if path.len() < 2 {
            return Err(CotasError::InsufficientPoints {
                needed: 2,
                got: path.len(),
            });
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(CotasError::InvalidSpacing(step));
        }

        let (points, path_runtime) = {
            let now = std::time::Instant::now();
            let points = densify(path, step);
            (points, now.elapsed())
        };

        let (elevations, terrain_runtime) = {
            let now = std::time::Instant::now();
            let mut elevations = Vec::with_capacity(points.len());
            for point in &points {
                if cancel.load(Ordering::Relaxed) {
                    debug!("profile cancelled after {} samples", elevations.len());
                    return Err(CotasError::Cancelled);
                }
                elevations.push(source.elevation(*point));
            }
            (elevations, now.elapsed())
        };

        debug!(
            "profile; len: {}, path_exec: {:?}, terrain_exec: {:?}",
            points.len(),
            path_runtime,
            terrain_runtime
        );

        Ok(Profile {
            distances: accumulated_distances(&points),
            points,
            elevations,
        })
    }
}

/// Splits each segment of `path` into equal steps no longer than
/// `step`. Shared vertices appear once; zero length segments are
/// dropped.
fn densify(path: &[Coord<C>], step: C) -> Vec<Coord<C>> {
    let mut points = vec![path[0]];
    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let len = distance(a, b);
        if len <= TOLERANCE {
            continue;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = ((len / step - TOLERANCE).ceil() as usize).max(1);
        let xs = linspace(a.x, b.x, n + 1);
        let ys = linspace(a.y, b.y, n + 1);
        points.extend(xs.zip(ys).skip(1).map(|(x, y)| Coord { x, y }));
    }
    points
}

/// A profile being extracted on the rayon pool.
pub struct ProfileTask {
    cancel: Arc<AtomicBool>,
    rx: Receiver<Result<Profile, CotasError>>,
}

impl ProfileTask {
    /// Starts extracting the profile described by `builder`.
    pub fn spawn<S>(builder: ProfileBuilder, source: Arc<S>) -> Self
    where
        S: ElevationSource + Send + 'static,
    {
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();
        let flag = Arc::clone(&cancel);
        rayon::spawn(move || {
            let result = builder.build_cancellable(source.as_ref(), &flag);
            if tx.send(result).is_err() {
                debug!("profile task dropped before completion");
            }
        });
        Self { cancel, rx }
    }

    /// Asks the extraction to stop. It stops before its next sample.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Blocks until the extraction finishes.
    pub fn wait(self) -> Result<Profile, CotasError> {
        self.rx.recv().map_err(|_| CotasError::Worker)?
    }

    /// Blocks for at most `timeout`. Returns `None` if the extraction
    /// is still running.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<Profile, CotasError>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(CotasError::Worker)),
        }
    }
}
