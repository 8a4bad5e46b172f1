pub mod catalog;
pub mod error;
pub mod generate;
pub mod records;

pub use catalog::{AggregatedCatalog, CategorizedModels, Modality, Tier};
pub use error::{ClassifiedError, ErrorAction, ErrorEnvelope, ErrorKind};
pub use generate::{
    AudioReply, AudioRequest, ChatMessage, ChatReply, ChatRequest, ImageReply, ImageRequest,
    Usage, VideoReply, VideoRequest,
};
pub use records::{ApiKeyCreate, ApiKeyRecord, StatusCheck, StatusCheckCreate};
