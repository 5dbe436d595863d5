use sha2::{Digest, Sha256};

pub fn hash_str(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    format!("{:x}", hasher.finalize())
}
