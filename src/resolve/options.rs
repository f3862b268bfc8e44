//! Package resolver options

/// How files are scheduled across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// One file after another on the calling thread.
    #[default]
    Sequential,
    /// Files are walked concurrently; only private-name minting is
    /// serialized. `threads: None` uses the global rayon pool.
    Threads { threads: Option<usize> },
}

/// Options for a package resolver run
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub parallelism: Parallelism,
    /// Pass files that belong to no package through unchanged. When false,
    /// such a file aborts the run.
    pub skip_unowned_files: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            parallelism: Parallelism::Sequential,
            skip_unowned_files: true,
        }
    }
}

impl ResolveOptions {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn threaded(threads: Option<usize>) -> Self {
        Self {
            parallelism: Parallelism::Threads { threads },
            ..Self::default()
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self.parallelism, Parallelism::Threads { .. })
    }
}
