pub mod document_dto;

pub use document_dto::{
    DocumentResponseDto, ReconcileResponseDto, SearchQuery, UploadDocumentDto,
};
