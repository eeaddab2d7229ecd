use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha512_256};
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),
}

/// A ledger identity: an address plus private signing material.
///
/// The signing key never leaves this struct; callers sign through
/// [`LedgerIdentity::sign`]. Both the key and the recovery phrase are
/// zeroized when the identity is dropped, so dropping it at the end of a
/// notarization attempt (success, error, or cancellation) discards the
/// private material.
pub struct LedgerIdentity {
    address: String,
    signing_key: SigningKey,
    recovery_phrase: Zeroizing<String>,
}

impl LedgerIdentity {
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Human-transcribable backup of the secret seed, one word per byte.
    pub fn recovery_phrase(&self) -> &str {
        &self.recovery_phrase
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for LedgerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never prints key material.
        f.debug_struct("LedgerIdentity")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Supplies the keypair used to sign notarization transactions. Callers
/// requiring persistent custody inject their own implementation; the
/// default generates an ephemeral identity per notarization.
pub trait IdentityProvider: Send + Sync {
    fn create_identity(&self) -> Result<LedgerIdentity, IdentityError>;
}

/// Generates a fresh, independently random ed25519 keypair on every call.
/// No memoization, no reuse across calls.
#[derive(Debug, Default)]
pub struct EphemeralIdentityProvider;

impl IdentityProvider for EphemeralIdentityProvider {
    fn create_identity(&self) -> Result<LedgerIdentity, IdentityError> {
        let mut seed = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| IdentityError::KeyGenerationFailed(e.to_string()))?;

        let signing_key = SigningKey::from_bytes(&seed);
        let address = derive_address(&signing_key.verifying_key().to_bytes());
        let recovery_phrase = Zeroizing::new(phrase_from_seed(&seed));
        seed.zeroize();

        Ok(LedgerIdentity {
            address,
            signing_key,
            recovery_phrase,
        })
    }
}

/// Address = hex(pubkey || checksum), checksum being the last 4 bytes of
/// SHA-512/256 over the public key. The checksum lets simple tooling catch
/// transcription errors.
pub fn derive_address(public_key: &[u8; 32]) -> String {
    let digest = Sha512_256::digest(public_key);
    let mut bytes = Vec::with_capacity(36);
    bytes.extend_from_slice(public_key);
    bytes.extend_from_slice(&digest[digest.len() - 4..]);
    hex::encode(bytes)
}

pub fn is_valid_address(address: &str) -> bool {
    let Ok(bytes) = hex::decode(address) else {
        return false;
    };
    if bytes.len() != 36 {
        return false;
    }
    let digest = Sha512_256::digest(&bytes[..32]);
    bytes[32..] == digest[digest.len() - 4..]
}

fn phrase_from_seed(seed: &[u8; 32]) -> String {
    seed.iter()
        .map(|b| WORDLIST[*b as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

/// 256 distinct words, one per possible byte value.
const WORDLIST: [&str; 256] = [
    "abandon", "able", "about", "above", "absent", "absorb", "abstract", "accident", "account",
    "accuse", "achieve", "acid", "across", "action", "actor", "actual", "adapt", "add",
    "address", "adjust", "admit", "adult", "advance", "advice", "afford", "afraid", "again",
    "agent", "agree", "ahead", "aim", "air", "alarm", "album", "alert", "alien", "all", "alley",
    "allow", "almost", "alone", "alpha", "already", "also", "alter", "always", "amateur",
    "amazing", "among", "amount", "anchor", "ancient", "anger", "angle", "angry", "animal",
    "ankle", "announce", "annual", "another", "answer", "antenna", "antique", "anxiety",
    "apart", "apology", "appear", "apple", "approve", "april", "arch", "arctic", "area",
    "arena", "argue", "arm", "armed", "armor", "army", "around", "arrange", "arrest", "arrive",
    "arrow", "art", "artist", "artwork", "ask", "aspect", "assault", "asset", "assist",
    "assume", "asthma", "athlete", "atom", "attack", "attend", "attitude", "attract", "auction",
    "audit", "august", "aunt", "author", "auto", "autumn", "average", "avocado", "avoid",
    "awake", "aware", "away", "awesome", "awful", "awkward", "axis", "baby", "bachelor",
    "bacon", "badge", "bag", "balance", "balcony", "ball", "bamboo", "banana", "banner", "bar",
    "barely", "bargain", "barrel", "base", "basic", "basket", "battle", "beach", "bean",
    "beauty", "because", "become", "beef", "before", "begin", "behave", "behind", "believe",
    "below", "belt", "bench", "benefit", "best", "betray", "better", "between", "beyond",
    "bicycle", "bid", "bike", "bind", "biology", "bird", "birth", "bitter", "black", "blade",
    "blame", "blanket", "blast", "bleak", "bless", "blind", "blood", "blossom", "blouse",
    "blue", "blur", "blush", "board", "boat", "body", "boil", "bomb", "bone", "bonus", "book",
    "boost", "border", "boring", "borrow", "boss", "bottom", "bounce", "box", "boy", "bracket",
    "brain", "brand", "brass", "brave", "bread", "breeze", "brick", "bridge", "brief", "bright",
    "bring", "brisk", "broccoli", "broken", "bronze", "broom", "brother", "brown", "brush",
    "bubble", "buddy", "budget", "buffalo", "build", "bulb", "bulk", "bullet", "bundle",
    "bunker", "burden", "burger", "burst", "bus", "business", "busy", "butter", "buyer", "buzz",
    "cabbage", "cabin", "cable", "cactus", "cage", "cake", "call", "calm", "camera", "camp",
    "can", "canal", "cancel", "candy", "cannon", "canoe", "canvas", "canyon", "capable",
    "capital", "captain", "car",
];
