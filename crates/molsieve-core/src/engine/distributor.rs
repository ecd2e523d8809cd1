use super::config::ExecutionMode;
use super::error::EngineError;
#[cfg(feature = "parallel")]
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(not(feature = "parallel"))]
use tracing::warn;

/// Executes independent work items and hands back `(item, result)` pairs.
///
/// No ordering guarantee is made for the returned pairs; callers must match
/// results to items through the item itself.
pub trait WorkDistributor {
    fn run<T, R, F>(&self, items: Vec<T>, job: F) -> Vec<(T, R)>
    where
        T: Send,
        R: Send,
        F: Fn(&T) -> R + Send + Sync;

    /// Releases the distributor's resources. Consumes it, so it happens once.
    fn shutdown(self)
    where
        Self: Sized;
}

/// Runs every item on the calling thread, in submission order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialDistributor;

impl WorkDistributor for SerialDistributor {
    fn run<T, R, F>(&self, items: Vec<T>, job: F) -> Vec<(T, R)>
    where
        T: Send,
        R: Send,
        F: Fn(&T) -> R + Send + Sync,
    {
        items
            .into_iter()
            .map(|item| {
                let result = job(&item);
                (item, result)
            })
            .collect()
    }

    fn shutdown(self) {}
}

/// Runs items on a dedicated rayon pool.
#[cfg(feature = "parallel")]
pub struct ThreadPoolDistributor {
    pool: rayon::ThreadPool,
}

#[cfg(feature = "parallel")]
impl ThreadPoolDistributor {
    /// Builds a pool with `threads` workers, or rayon's default when `None`.
    pub fn new(threads: Option<usize>) -> Result<Self, EngineError> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|index| format!("molsieve-worker-{index}"));
        if let Some(n) = threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| EngineError::WorkerPool(e.to_string()))?;
        debug!(threads = pool.current_num_threads(), "Worker pool started.");
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

#[cfg(feature = "parallel")]
impl WorkDistributor for ThreadPoolDistributor {
    fn run<T, R, F>(&self, items: Vec<T>, job: F) -> Vec<(T, R)>
    where
        T: Send,
        R: Send,
        F: Fn(&T) -> R + Send + Sync,
    {
        self.pool.install(|| {
            items
                .into_par_iter()
                .map(|item| {
                    let result = job(&item);
                    (item, result)
                })
                .collect()
        })
    }

    fn shutdown(self) {
        debug!(threads = self.pool.current_num_threads(), "Worker pool shut down.");
    }
}

/// The distributor chosen for a run.
pub enum Distributor {
    Serial(SerialDistributor),
    #[cfg(feature = "parallel")]
    Parallel(ThreadPoolDistributor),
}

impl Distributor {
    pub fn from_mode(mode: ExecutionMode, threads: Option<usize>) -> Result<Self, EngineError> {
        match mode {
            ExecutionMode::Serial => Ok(Self::Serial(SerialDistributor)),
            #[cfg(feature = "parallel")]
            ExecutionMode::Parallel => Ok(Self::Parallel(ThreadPoolDistributor::new(threads)?)),
            #[cfg(not(feature = "parallel"))]
            ExecutionMode::Parallel => {
                warn!(
                    ?threads,
                    "Parallel execution requested but this build has no parallel support; running serially."
                );
                Ok(Self::Serial(SerialDistributor))
            }
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        match self {
            Self::Serial(_) => ExecutionMode::Serial,
            #[cfg(feature = "parallel")]
            Self::Parallel(_) => ExecutionMode::Parallel,
        }
    }
}

impl WorkDistributor for Distributor {
    fn run<T, R, F>(&self, items: Vec<T>, job: F) -> Vec<(T, R)>
    where
        T: Send,
        R: Send,
        F: Fn(&T) -> R + Send + Sync,
    {
        match self {
            Self::Serial(inner) => inner.run(items, job),
            #[cfg(feature = "parallel")]
            Self::Parallel(inner) => inner.run(items, job),
        }
    }

    fn shutdown(self) {
        match self {
            Self::Serial(inner) => inner.shutdown(),
            #[cfg(feature = "parallel")]
            Self::Parallel(inner) => inner.shutdown(),
        }
    }
}
