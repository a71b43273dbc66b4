use std::sync::atomic::{AtomicU32, Ordering};

use reservation::ReservationCode;
use reservation::code::CodeSource;

/// Hands out a scripted list of codes, repeating the last one forever.
pub struct ScriptedCodes {
    codes: Vec<ReservationCode>,
    calls: AtomicU32,
}

impl ScriptedCodes {
    pub fn new(codes: &[&str]) -> Self {
        assert!(!codes.is_empty(), "script needs at least one code");
        Self {
            codes: codes
                .iter()
                .map(|c| ReservationCode::parse(c).expect("scripted code must be well formed"))
                .collect(),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CodeSource for ScriptedCodes {
    fn next_candidate(&self, _attempt: u32) -> ReservationCode {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        self.codes[n.min(self.codes.len() - 1)].clone()
    }
}
