pub mod classifier;
pub mod session;

pub use classifier::{BatteryTemplate, ScanAction, ScanClassifier, ScanOutcome, ScanRule};
pub use session::{PayloadScanner, Permission, ScanCapture, ScanSession, Scanner};
