//! # mfdoc-check
//!
//! Batch filename checker. Reads candidate names one per line from stdin
//! and reports, for each, whether it matches the ICON grammar, the SPEC
//! grammar, or neither — same patterns as `mfdoc`, no tag extraction, no
//! upload.
//!
//! ```bash
//! ls incoming/ | mfdoc-check
//! ```

use std::io::{self, BufRead};

use mfdocs::patterns::{classify, NameTags};

fn main() -> io::Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        match classify(name) {
            Some(NameTags::Icon(_)) => println!("ICON OK  → {}", name),
            Some(NameTags::Spec(_)) => println!("SPEC OK  → {}", name),
            None => println!("FAIL     → {}", name),
        }
    }
    Ok(())
}
