//! Build script for regctx-core
//!
//! This script checks build requirements before compilation:
//! - Minimum Rust version
//!
//! ## Requirements
//!
//! - **Rust**: 1.70.0 or newer
//! - **Target**: any. Live tracing needs a `mips64`/`mips64el` Linux target;
//!   elsewhere only the loopback collaborator is usable.

fn main()
{
    println!("cargo:rerun-if-changed=build.rs");

    // Check minimum Rust version
    if let Ok(rustc_version) = rustc_version::version() {
        let min_rust_version = rustc_version::Version::new(1, 70, 0);

        assert!(
            rustc_version >= min_rust_version,
            "regctx-core requires Rust {min_rust_version} or newer, found {rustc_version}"
        );
    } else {
        // If we can't get version (e.g., in some build environments), just warn
        println!("cargo:warning=could not verify Rust version");
    }
}
