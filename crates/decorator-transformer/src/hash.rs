//! Short content hashes for scope and module identifiers.

use blake3::Hasher;

const HASH_LEN: usize = 8;

/// The first eight hex digits of the blake3 digest of `input`.
pub fn short_hash(input: &str) -> String {
    digest_prefix(&[input])
}

/// Hash shared by every component of one file.
///
/// Development builds hash only the path so ids stay stable across edits,
/// which hot reload relies on. Production builds also hash the content.
pub fn file_scope_hash(short_path: &str, source: &str, production: bool) -> String {
    if production {
        digest_prefix(&[short_path, "\n", source])
    } else {
        digest_prefix(&[short_path])
    }
}

/// Hash of the module request, used for `_moduleId`.
pub fn module_hash(request: &str) -> String {
    short_hash(request)
}

fn digest_prefix(parts: &[&str]) -> String {
    let mut hasher = Hasher::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hasher.finalize().to_hex()[..HASH_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash_shape() {
        let hash = short_hash("src/App.ts");
        assert_eq!(hash.len(), 8);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, short_hash("src/App.ts"));
        assert_ne!(hash, short_hash("src/Other.ts"));
    }

    #[test]
    fn test_production_hash_covers_path_and_content() {
        assert_eq!(
            file_scope_hash("a.ts", "one", true),
            short_hash("a.ts\none")
        );
    }

    #[test]
    fn test_development_hash_ignores_content() {
        assert_eq!(
            file_scope_hash("a.ts", "one", false),
            file_scope_hash("a.ts", "two", false)
        );
        assert_ne!(
            file_scope_hash("a.ts", "one", true),
            file_scope_hash("a.ts", "two", true)
        );
    }
}
