//! Build script for storefront crate.
//!
//! Fingerprints `storefront.css` so the layout can link a content-addressed
//! copy that is safe to cache forever.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    hash_css();
}

/// Copy `storefront.css` to `static/css/derived/storefront.<hash>.css`.
///
/// Sets `CSS_HASH` for `env!("CSS_HASH")`; empty when the stylesheet is
/// missing, in which case the layout links the plain file.
fn hash_css() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_path = Path::new(&manifest_dir).join("static/css/storefront.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = match fs::read(&css_path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read storefront.css: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
            return;
        }
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let short_hash = digest.get(..8).unwrap_or(&digest);

    let derived_dir = Path::new(&manifest_dir).join("static/css/derived");
    let copied = fs::create_dir_all(&derived_dir).and_then(|()| {
        fs::copy(
            &css_path,
            derived_dir.join(format!("storefront.{short_hash}.css")),
        )
    });
    match copied {
        Ok(_) => println!("cargo:rustc-env=CSS_HASH={short_hash}"),
        Err(e) => {
            println!("cargo:warning=Could not write fingerprinted CSS: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
        }
    }
}
