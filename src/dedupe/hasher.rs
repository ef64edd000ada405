//! SHA-256 content hashing with streaming reads.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::config::HASH_BLOCK_SIZE_MAX;

/// Hash the full content of `path`, reading `block_size` bytes at a time.
/// `block_size` is clamped to `1..=HASH_BLOCK_SIZE_MAX`.
/// Returns the lowercase hex digest. The file is closed before returning, also on error.
pub fn hash_file(path: &Path, block_size: usize) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; block_size.clamp(1, HASH_BLOCK_SIZE_MAX)];
    loop {
        let n = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn oversized_block_size_is_clamped() {
        let td = tempdir().unwrap();
        let p = td.path().join("hello.txt");
        fs::write(&p, "hello").unwrap();
        assert_eq!(hash_file(&p, usize::MAX).unwrap(), HELLO_SHA256);
        assert_eq!(hash_file(&p, 0).unwrap(), HELLO_SHA256);
    }

    #[test]
    fn known_digest() {
        let td = tempdir().unwrap();
        let p = td.path().join("hello.txt");
        fs::write(&p, "hello").unwrap();
        assert_eq!(hash_file(&p, 64 * 1024).unwrap(), HELLO_SHA256);
    }

    #[test]
    fn block_size_does_not_change_digest() {
        let td = tempdir().unwrap();
        let p = td.path().join("data.bin");
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 97) as u8).collect();
        fs::write(&p, &data).unwrap();
        assert_eq!(hash_file(&p, 7).unwrap(), hash_file(&p, 64 * 1024).unwrap());
    }

    #[test]
    fn missing_file_is_an_error() {
        let td = tempdir().unwrap();
        let err = hash_file(&td.path().join("nope"), 1024).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
