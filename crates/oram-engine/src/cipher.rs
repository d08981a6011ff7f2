use oram_types::BlockId;

/// Failure reported by a [`PayloadCipher`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CipherError(pub String);

/// Hook for sealing payloads before they reach the block store and opening
/// them when they are staged into the stash.
///
/// The block store only ever holds sealed payloads; the stash and every
/// value returned to callers are opened. A real deployment re-encrypts on
/// every seal so that rewritten blocks are indistinguishable from untouched
/// ones.
pub trait PayloadCipher<V>: Send {
    fn seal(&self, block: BlockId, payload: V) -> Result<V, CipherError>;

    fn open(&self, block: BlockId, payload: V) -> Result<V, CipherError>;
}

/// Identity cipher: payloads are stored as given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Plaintext;

impl<V> PayloadCipher<V> for Plaintext {
    fn seal(&self, _block: BlockId, payload: V) -> Result<V, CipherError> {
        Ok(payload)
    }

    fn open(&self, _block: BlockId, payload: V) -> Result<V, CipherError> {
        Ok(payload)
    }
}
