pub mod error;
pub mod segment;
pub mod extraction;
pub mod assembler;
pub mod batch;

pub use error::{BatchError, RecordError};
pub use segment::segment;
pub use assembler::{assemble, assemble_file};
pub use batch::{run_batch, BatchResult, SkippedFile};
