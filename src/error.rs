//! Error taxonomy for the reconciliation engine.
//!
//! Only structural-identity failures are hard errors: if a member cannot be
//! matched because its canonical signature cannot be derived, continuing
//! would silently corrupt the document. Everything else (duplicate members,
//! stale-but-preserved members, missing optional facts) is reported as a
//! `tracing` warning and processing continues.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A current declaration yields no canonical signature, so no stable
    /// matching key exists for it.
    #[error("cannot derive a canonical fingerprint for `{member}` in `{ty}`")]
    FingerprintUnderivable { ty: String, member: String },

    /// An existing document node has no stored signature in the fingerprint
    /// language, so it can never be matched against current declarations.
    #[error("member `{member}` in `{ty}` has no stored canonical signature")]
    UnmatchableNode { ty: String, member: String },

    /// A failure while processing a type, wrapped with the identity of the
    /// assembly that supplied it. Aborts only that unit of work; the caller
    /// is expected to continue with the remaining assemblies.
    #[error("while processing assembly `{assembly}` {version}: {source}")]
    Assembly {
        assembly: String,
        version: String,
        #[source]
        source: Box<ReconcileError>,
    },
}

impl ReconcileError {
    /// Wrap this error with the assembly identity it occurred under.
    pub fn in_assembly(self, assembly: &str, version: &str) -> Self {
        ReconcileError::Assembly {
            assembly: assembly.to_string(),
            version: version.to_string(),
            source: Box::new(self),
        }
    }
}
