//! Mock DSP detection service.

use super::CallCounter;
use crate::traits::DspService;
use crate::types::DspInfo;

/// Mock DSP service with a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct MockDspService {
    /// Answer, or `None` for an unreachable service
    answer: Option<DspInfo>,

    /// Calls so far
    calls: CallCounter,
}

impl MockDspService {
    /// A service that cannot be reached.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// A service reporting a DSP of the given chip family.
    pub fn detected(chip: &str) -> Self {
        Self::with_answer(DspInfo::detected(chip))
    }

    /// A service reporting that no DSP is attached.
    pub fn not_detected() -> Self {
        Self::with_answer(DspInfo::not_detected())
    }

    /// A service returning `answer`.
    pub fn with_answer(answer: DspInfo) -> Self {
        Self {
            answer: Some(answer),
            calls: CallCounter::new(),
        }
    }

    /// Counter of `detect_dsp` calls.
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl DspService for MockDspService {
    async fn detect_dsp(&self) -> Option<DspInfo> {
        self.calls.hit();
        self.answer.clone()
    }
}
