/// Runs the release hooks of external resources, once.
#[derive(Default)]
pub struct ShutdownController {
    hooks: Vec<Box<dyn FnOnce()>>,
    done: bool,
}

impl ShutdownController {
    pub fn new() -> ShutdownController {
        ShutdownController::default()
    }

    /// Register something to release on shutdown.
    ///
    /// Hooks attached after shutdown run immediately.
    pub fn attach<F: FnOnce() + 'static>(&mut self, release: F) {
        if self.done {
            release();
        } else {
            self.hooks.push(Box::new(release));
        }
    }

    /// Run every hook in attach order. Returns `false` if already shut down.
    pub fn release(&mut self) -> bool {
        if self.done {
            return false;
        }
        self.done = true;
        for hook in self.hooks.drain(..) {
            hook();
        }
        true
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn hooks_run_once_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut controller = ShutdownController::new();
        for name in &["window", "terminal"] {
            let log = log.clone();
            controller.attach(move || log.borrow_mut().push(*name));
        }

        assert!(controller.release());
        assert!(!controller.release());
        assert!(controller.is_done());
        assert_eq!(*log.borrow(), vec!["window", "terminal"]);
    }

    #[test]
    fn late_hook_runs_immediately() {
        let ran = Rc::new(RefCell::new(false));
        let mut controller = ShutdownController::new();
        controller.release();
        let flag = ran.clone();
        controller.attach(move || *flag.borrow_mut() = true);
        assert!(*ran.borrow());
    }
}
