// Resume upload and retrieval. Ingestion extracts text up front; the
// pipeline stages only ever see stored text, never raw files.

pub mod handlers;
pub mod ingest;
