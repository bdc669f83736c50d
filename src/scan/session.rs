use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::{
    engine::RecyclingEngine,
    error::{PileError, Result},
    scan::classifier::ScanOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanCapture {
    Content(String),
    Cancelled,
}

/// Camera code-scanning capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Scanner: Send + Sync {
    async fn request_permission(&self) -> Permission;
    async fn start_scan(&self) -> Result<ScanCapture>;
    async fn stop_scan(&self);
    async fn set_torch(&self, on: bool) -> Result<()>;
}

/// Drives one scanner: permission, capture, classification
pub struct ScanSession<S: Scanner> {
    scanner: S,
    torch_on: bool,
}

impl<S: Scanner> ScanSession<S> {
    pub fn new(scanner: S) -> Self {
        Self {
            scanner,
            torch_on: false,
        }
    }

    pub fn torch_on(&self) -> bool {
        self.torch_on
    }

    /// Capture a single code and apply it to `engine`
    ///
    /// Returns `Ok(None)` if the user cancelled. The scanner is stopped
    /// whenever a capture was started, whatever its result.
    pub async fn scan(&mut self, engine: &mut RecyclingEngine) -> Result<Option<ScanOutcome>> {
        if self.scanner.request_permission().await == Permission::Denied {
            warn!("Camera permission denied, scan not started");
            return Err(PileError::PermissionDenied(
                "camera permission is required to scan".to_string(),
            ));
        }

        let capture = self.scanner.start_scan().await;
        self.scanner.stop_scan().await;

        match capture? {
            ScanCapture::Content(payload) => {
                debug!("Scanned payload: {}", payload);
                Ok(Some(engine.apply_scan(&payload)?))
            }
            ScanCapture::Cancelled => {
                info!("Scan cancelled");
                Ok(None)
            }
        }
    }

    /// Ask the scanner to stop capturing
    pub async fn cancel(&self) {
        self.scanner.stop_scan().await;
    }

    /// Flip the torch; a driver failure leaves the state unchanged
    pub async fn toggle_torch(&mut self) -> bool {
        let target = !self.torch_on;
        match self.scanner.set_torch(target).await {
            Ok(()) => self.torch_on = target,
            Err(e) => error!("Torch error: {}", e),
        }
        self.torch_on
    }
}

/// Scanner backed by an already decoded payload
///
/// Used when the code was read elsewhere (pasted, piped, or decoded by
/// another device); permission is always granted.
pub struct PayloadScanner {
    payload: Option<String>,
}

impl PayloadScanner {
    pub fn new(payload: Option<String>) -> Self {
        Self { payload }
    }
}

#[async_trait]
impl Scanner for PayloadScanner {
    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn start_scan(&self) -> Result<ScanCapture> {
        Ok(match &self.payload {
            Some(payload) => ScanCapture::Content(payload.clone()),
            None => ScanCapture::Cancelled,
        })
    }

    async fn stop_scan(&self) {}

    async fn set_torch(&self, _on: bool) -> Result<()> {
        Err(PileError::Other(anyhow::anyhow!("no torch on a payload scanner")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn engine() -> RecyclingEngine {
        RecyclingEngine::new(&Config::default())
    }

    #[tokio::test]
    async fn test_denied_permission_does_not_start_scan() {
        let mut scanner = MockScanner::new();
        scanner.expect_request_permission().return_const(Permission::Denied);
        scanner.expect_start_scan().never();
        scanner.expect_stop_scan().never();

        let mut engine = engine();
        let mut session = ScanSession::new(scanner);
        let result = session.scan(&mut engine).await;

        assert!(matches!(result, Err(PileError::PermissionDenied(_))));
        assert_eq!(engine.ledger().total_points(), 0);
    }

    #[tokio::test]
    async fn test_scanned_content_is_applied_and_scanner_stopped() {
        let mut scanner = MockScanner::new();
        scanner.expect_request_permission().return_const(Permission::Granted);
        scanner
            .expect_start_scan()
            .times(1)
            .returning(|| Ok(ScanCapture::Content("recycling-point-3".to_string())));
        scanner.expect_stop_scan().times(1).return_const(());

        let mut engine = engine();
        let mut session = ScanSession::new(scanner);
        let outcome = session.scan(&mut engine).await.unwrap();

        assert_eq!(
            outcome,
            Some(ScanOutcome::PointValidated {
                points_awarded: 10,
                leveled_up: false
            })
        );
        assert_eq!(engine.ledger().total_points(), 10);
    }

    #[tokio::test]
    async fn test_cancelled_scan_changes_nothing() {
        let mut scanner = MockScanner::new();
        scanner.expect_request_permission().return_const(Permission::Granted);
        scanner.expect_start_scan().returning(|| Ok(ScanCapture::Cancelled));
        scanner.expect_stop_scan().times(1).return_const(());

        let mut engine = engine();
        let mut session = ScanSession::new(scanner);
        assert_eq!(session.scan(&mut engine).await.unwrap(), None);
        assert!(engine.batteries().is_empty());
    }

    #[tokio::test]
    async fn test_scanner_failure_still_stops() {
        let mut scanner = MockScanner::new();
        scanner.expect_request_permission().return_const(Permission::Granted);
        scanner
            .expect_start_scan()
            .returning(|| Err(PileError::Other(anyhow::anyhow!("camera busy"))));
        scanner.expect_stop_scan().times(1).return_const(());

        let mut engine = engine();
        let mut session = ScanSession::new(scanner);
        assert!(session.scan(&mut engine).await.is_err());
    }

    #[tokio::test]
    async fn test_toggle_torch() {
        let mut scanner = MockScanner::new();
        scanner.expect_set_torch().returning(|_| Ok(()));

        let mut session = ScanSession::new(scanner);
        assert!(session.toggle_torch().await);
        assert!(!session.toggle_torch().await);
    }

    #[tokio::test]
    async fn test_torch_failure_keeps_state() {
        let mut session = ScanSession::new(PayloadScanner::new(None));
        assert!(!session.toggle_torch().await);
        assert!(!session.torch_on());
    }

    #[tokio::test]
    async fn test_payload_scanner() {
        let mut engine = engine();
        let mut session = ScanSession::new(PayloadScanner::new(Some("battery-ABC".to_string())));
        let outcome = session.scan(&mut engine).await.unwrap();
        assert_eq!(outcome, Some(ScanOutcome::BatteryRegistered { battery_id: 1 }));
    }
}
