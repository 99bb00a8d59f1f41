//! Mock HAT EEPROM reader.

use super::CallCounter;
use crate::traits::HatReader;
use crate::types::HatInfo;

/// Mock HAT reader returning scripted answers.
///
/// Answers are returned in order, one per call; once the script is exhausted
/// the last answer repeats. This models an EEPROM that only becomes readable
/// a few attempts after boot.
///
/// # Examples
///
/// ```
/// use configurator_hardware::mock::MockHatReader;
/// use configurator_hardware::traits::HatReader;
/// use configurator_hardware::HatInfo;
///
/// #[tokio::main]
/// async fn main() {
///     let reader = MockHatReader::with_responses(vec![
///         HatInfo::empty(),
///         HatInfo::new("HiFiBerry", "Amp4"),
///     ]);
///     let calls = reader.calls();
///
///     assert!(!reader.read_hat_info().await.has_product());
///     assert_eq!(reader.read_hat_info().await.product(), Some("Amp4"));
///     assert_eq!(reader.read_hat_info().await.product(), Some("Amp4"));
///     assert_eq!(calls.count(), 3);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockHatReader {
    /// Scripted answers
    responses: Vec<HatInfo>,

    /// Calls so far, also the script position
    calls: CallCounter,
}

impl MockHatReader {
    /// A HAT reader that never finds a board.
    pub fn absent() -> Self {
        Self::with_responses(Vec::new())
    }

    /// A HiFiBerry HAT with the given product string.
    pub fn with_product(product: &str) -> Self {
        Self::with_responses(vec![HatInfo::new("HiFiBerry", product)])
    }

    /// A HAT reader returning `responses` in order.
    pub fn with_responses(responses: Vec<HatInfo>) -> Self {
        Self {
            responses,
            calls: CallCounter::new(),
        }
    }

    /// Counter of `read_hat_info` calls.
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl Default for MockHatReader {
    fn default() -> Self {
        Self::absent()
    }
}

impl HatReader for MockHatReader {
    async fn read_hat_info(&self) -> HatInfo {
        let position = self.calls.hit();
        self.responses
            .get(position)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_absent_reader_returns_empty() {
        let reader = MockHatReader::absent();
        assert_eq!(reader.read_hat_info().await, HatInfo::empty());
        assert_eq!(reader.calls().count(), 1);
    }

    #[tokio::test]
    async fn test_with_product() {
        let reader = MockHatReader::with_product("Digi2 Pro");
        let info = reader.read_hat_info().await;
        assert_eq!(info.vendor.as_deref(), Some("HiFiBerry"));
        assert_eq!(info.product(), Some("Digi2 Pro"));
    }
}
