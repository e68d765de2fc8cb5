// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use regex::Regex;
use std::fs;
use std::path::Path;

fn key_pattern() -> Regex {
    Regex::new(r#"(?i)(private|secret|mnemonic|wallet|signer)[a-z_]*"?\s*[:=]\s*"?(0x)?[a-f0-9]{64}"#)
        .expect("regex")
}

/// Fail CI if config files or address books carry private-key-looking values.
/// Init code hashes are 32-byte hex too, so only key-like labels are flagged.
#[test]
fn no_committed_hex_keys_in_configs() {
    let re = key_pattern();
    let candidates = [
        "config.toml",
        "config.prod.toml",
        "config.dev.toml",
        "address_book.json",
        "address_book.example.json",
        "config.example.toml",
        ".env.example",
    ];
    for file in candidates {
        if !Path::new(file).exists() {
            continue;
        }
        let body = fs::read_to_string(file).expect("read config");
        for (idx, line) in body.lines().enumerate() {
            if re.is_match(line) {
                panic!("Secret-looking hex in {} at line {}", file, idx + 1);
            }
        }
    }
}

#[test]
fn guard_pattern_ignores_init_code_hashes() {
    let re = key_pattern();
    let hash = format!("agent_init_code_hash = \"0x{}\"", "ab".repeat(32));
    let key = format!("WALLET_KEY=0x{}", "cd".repeat(32));
    assert!(!re.is_match(&hash));
    assert!(re.is_match(&key));
}
