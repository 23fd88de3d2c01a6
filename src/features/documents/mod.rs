//! Document storage feature.
//!
//! Bytes live in the blob store under keys derived from each record; the
//! metadata lives in Postgres. Access is decided per document by
//! [`policy::check`].
//!
//! | Method | Path | Access |
//! |---|---|---|
//! | GET | `/api/documents?fileName=` | authenticated |
//! | GET | `/api/documents/public/` | anyone |
//! | GET | `/api/documents/student/` | authenticated |
//! | GET | `/api/documents/teacher/` | teacher |
//! | GET | `/api/documents/{id}` | per document |
//! | GET | `/api/documents/download/{id}` | per document |
//! | GET | `/api/documents/public/{id}` | anyone, PUBLIC only |
//! | GET | `/api/documents/public/download/{id}` | anyone, PUBLIC only |
//! | POST | `/api/documents/` | teacher |
//! | DELETE | `/api/documents/{id}` | teacher |
//! | POST | `/api/documents/reconcile` | teacher |

pub mod dtos;
pub mod handlers;
pub mod keys;
pub mod models;
pub mod policy;
pub mod repositories;
pub mod routes;
pub mod rules;
pub mod services;

pub use repositories::PgDocumentRepository;
pub use rules::DocumentRules;
pub use services::DocumentService;
