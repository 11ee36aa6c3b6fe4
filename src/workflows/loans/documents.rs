use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::domain::{Document, DocumentId};

/// Per-document inspection capability. The production system would sit an
/// OCR/validation pipeline behind this seam.
pub trait DocumentVerifier: Send + Sync {
    fn inspect(&self, document: &Document) -> bool;
}

/// Passes everything. Default wiring for local development.
pub struct ApprovingVerifier;

impl DocumentVerifier for ApprovingVerifier {
    fn inspect(&self, _document: &Document) -> bool {
        true
    }
}

/// Fails exactly the named documents. Test stub.
pub struct NameListVerifier {
    rejected: HashSet<String>,
}

impl NameListVerifier {
    pub fn rejecting(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            rejected: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl DocumentVerifier for NameListVerifier {
    fn inspect(&self, document: &Document) -> bool {
        !self.rejected.contains(&document.name)
    }
}

/// Deterministic stand-in for an imperfect verification backend: roughly
/// `pass_rate` of documents pass, keyed on a stable hash of the document id
/// so repeated runs agree.
pub struct SamplingVerifier {
    pass_rate: f64,
}

impl SamplingVerifier {
    pub fn new(pass_rate: f64) -> Self {
        Self {
            pass_rate: pass_rate.clamp(0.0, 1.0),
        }
    }
}

impl Default for SamplingVerifier {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl DocumentVerifier for SamplingVerifier {
    fn inspect(&self, document: &Document) -> bool {
        let mut hasher = DefaultHasher::new();
        document.id.hash(&mut hasher);
        let bucket = (hasher.finish() % 100) as f64 / 100.0;
        bucket < self.pass_rate
    }
}

/// Aggregate verification result: verified is the AND over all documents.
/// Failures carry the display name for callers and the id for flag updates,
/// since names are not unique across a record's documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub verified: bool,
    pub failed_documents: Vec<String>,
    #[serde(skip)]
    pub failed_document_ids: Vec<DocumentId>,
}

/// Inspect each document independently. Persisting the verified flags for the
/// passing subset is the caller's job; failed documents keep their default.
pub fn verify_documents(documents: &[Document], verifier: &dyn DocumentVerifier) -> DocumentReport {
    let mut failed_documents = Vec::new();
    let mut failed_document_ids = Vec::new();

    for document in documents {
        if !verifier.inspect(document) {
            failed_documents.push(document.name.clone());
            failed_document_ids.push(document.id.clone());
        }
    }

    DocumentReport {
        verified: failed_document_ids.is_empty(),
        failed_documents,
        failed_document_ids,
    }
}
