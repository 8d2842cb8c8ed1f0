/// Parallel decoding of detection bursts
pub mod batch;
/// Scan-mode gating
pub mod gate;
/// Session orchestration
pub mod session;

pub use batch::decode_batch;
pub use gate::ScanGate;
pub use session::ScanSession;
