//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::intake::{
    DownloadDocumentCommand, DownloadDocumentError, DownloadDocumentHandler,
    GenerateDocumentCommand, GenerateDocumentError, GenerateDocumentHandler, GetDocumentError,
    GetDocumentHandler, GetDocumentQuery, GetSessionError, GetSessionHandler, GetSessionQuery,
    SessionLocks, StartSessionCommand, StartSessionError, StartSessionHandler,
    SubmitMessageCommand, SubmitMessageError, SubmitMessageHandler, SubmitMessageResult,
};
