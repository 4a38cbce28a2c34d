//! Intake command and query handlers.
//!
//! One handler per operation; each owns its error enum so the HTTP layer can
//! map failures without inspecting messages.

mod download_document;
mod generate_document;
mod get_document;
mod get_session;
mod session_locks;
mod start_session;
mod submit_message;

pub use download_document::{
    DownloadDocumentCommand, DownloadDocumentError, DownloadDocumentHandler,
};
pub use generate_document::{
    GenerateDocumentCommand, GenerateDocumentError, GenerateDocumentHandler,
};
pub use get_document::{GetDocumentError, GetDocumentHandler, GetDocumentQuery};
pub use get_session::{GetSessionError, GetSessionHandler, GetSessionQuery};
pub use session_locks::SessionLocks;
pub use start_session::{StartSessionCommand, StartSessionError, StartSessionHandler};
pub use submit_message::{
    SubmitMessageCommand, SubmitMessageError, SubmitMessageHandler, SubmitMessageResult,
};
