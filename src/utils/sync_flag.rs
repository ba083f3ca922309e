use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

type Inner = Arc<AtomicBool>;

pub struct RunFlag {
    inner: Inner,
}

pub struct RunFlagStopper {
    inner: Inner,
}

pub fn new_run_flag() -> (RunFlag, RunFlagStopper) {
    let inner = Arc::new(AtomicBool::new(true));
    (
        RunFlag {
            inner: Arc::clone(&inner),
        },
        RunFlagStopper { inner },
    )
}

impl RunFlag {
    pub fn is_running(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}

impl RunFlagStopper {
    pub fn stop(self) {
        // Drop does the store.
    }
}

impl Drop for RunFlagStopper {
    fn drop(&mut self) {
        self.inner.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_clears_flag() {
        let (flag, stopper) = new_run_flag();
        assert!(flag.is_running());
        stopper.stop();
        assert!(!flag.is_running());
    }

    #[test]
    fn dropping_stopper_clears_flag() {
        let (flag, stopper) = new_run_flag();
        drop(stopper);
        assert!(!flag.is_running());
    }
}
