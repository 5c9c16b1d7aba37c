pub mod chat;
pub mod loaders;
pub mod message;
pub mod progress;
pub mod result;

pub use chat::{BatchRequest, ChatJob, FormatKind};
pub use loaders::load_batch_request;
pub use message::{ChatMessage, ExtractedContent};
pub use progress::{JobStatus, ProgressEvent};
pub use result::{ExportStats, JobResult};
