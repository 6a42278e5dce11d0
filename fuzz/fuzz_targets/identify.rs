use clats::{identify, validate_digest};
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if let Ok(digest) = std::str::from_utf8(data) {
                for algorithm in identify(digest) {
                    // Anything detection offers must pass shape validation.
                    assert!(validate_digest(algorithm, digest).is_ok());
                }
            }
        });
    }
}
