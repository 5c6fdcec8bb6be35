pub mod ors;
pub mod receipt;
pub mod storage;

pub use ors::OrsClient;
pub use receipt::PdfReceiptRenderer;
pub use storage::InMemoryCalcRepository;
