//! Composite key encoding
//!
//! A deterministic stand-in for the system under test's aggregate key wire
//! format: a tag, the threshold/child count, then each child encoding
//! length-prefixed. The core only relies on composition order and equality,
//! both of which this preserves.

use attest_keys::KeyCodec;

const LIST_TAG: &str = "4c"; // 'L'
const THRESHOLD_TAG: &str = "54"; // 'T'

/// Deterministic [`KeyCodec`] for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireKeyCodec;

impl WireKeyCodec {
    pub fn new() -> Self {
        Self
    }

    fn frame(tag: &str, header: &[usize], children: &[String]) -> String {
        let mut out = String::from(tag);
        for value in header {
            out.push_str(&format!("{value:04x}"));
        }
        for child in children {
            out.push_str(&format!("{:08x}{child}", child.len()));
        }
        out
    }
}

impl KeyCodec for WireKeyCodec {
    fn compose_list(&self, children: &[String]) -> String {
        Self::frame(LIST_TAG, &[children.len()], children)
    }

    fn compose_threshold(&self, threshold: usize, children: &[String]) -> String {
        Self::frame(THRESHOLD_TAG, &[threshold, children.len()], children)
    }
}
