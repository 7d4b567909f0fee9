//! Build script for lkthread-runtime
//!
//! Architectures whose switch primitive cannot be written with `naked_asm!`
//! ship a GNU assembler file that is compiled and linked here.

use std::env;

/// Assembly sources required by each target architecture
fn asm_sources(target_arch: &str) -> &'static [&'static str] {
    match target_arch {
        "microblaze" => &["src/arch/microblaze/switch.S"],
        _ => &[],
    }
}

fn main() {
    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    println!("cargo:rerun-if-changed=src/arch/microblaze/switch.S");

    let sources = asm_sources(&target_arch);
    if sources.is_empty() {
        return;
    }

    let mut build = cc::Build::new();
    for src in sources {
        build.file(src);
    }
    build.compile("lkthread_switch");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asm_sources() {
        assert_eq!(asm_sources("microblaze"), &["src/arch/microblaze/switch.S"]);
        assert!(asm_sources("x86_64").is_empty());
        assert!(asm_sources("aarch64").is_empty());
    }
}
