use std::sync::Arc;
use std::sync::atomic::{AtomicBool,Ordering};

/*
Raised once the user asks to stop: ctrl-c from any thread, or escape in the
window. Long running steps poll it and wind down so the point count still
gets reported.
*/
#[derive(Clone,Debug,Default)]
pub struct Interrupt {
    flag : Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Interrupt {
        Interrupt { flag : Arc::new(AtomicBool::new(false)) }
    }

    // ctrl-c raises this flag instead of killing the process
    pub fn install(&self) -> Result<(), ctrlc::Error> {
        let flag = self.flag.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
