//! Key management commands.
//!
//! `tiergate keys generate` - Generate the two signing keypairs.

use std::fs;
use std::path::PathBuf;
use tiergate_token::KeyPair;

const ACCESS_KEY_FILE: &str = "access.key";
const DELEGATED_KEY_FILE: &str = "delegated.key";

/// Generate one keypair per token purpose.
pub fn generate(output: Option<PathBuf>) -> anyhow::Result<()> {
    let access = KeyPair::generate()?;
    let delegated = KeyPair::generate()?;

    if let Some(output_dir) = output {
        fs::create_dir_all(&output_dir)?;

        let access_path = output_dir.join(ACCESS_KEY_FILE);
        let delegated_path = output_dir.join(DELEGATED_KEY_FILE);
        access.save_to_file(&access_path)?;
        delegated.save_to_file(&delegated_path)?;

        println!("✔ Generated signing keys:");
        println!("  Access:    {}", access_path.display());
        println!("  Delegated: {}", delegated_path.display());
        println!();
        println!("⚠️  Keep both files secret. Only the auth server needs them.");
        println!();
        println!("Reference them from tiergate.yaml:");
        println!("  tokens:");
        println!("    access_private_key_file: {}", access_path.display());
        println!("    delegated_private_key_file: {}", delegated_path.display());
    } else {
        println!("Access private key (keep secure!):");
        println!("{}", access.private_key_hex());
        println!();
        println!("Delegated private key (keep secure!):");
        println!("{}", delegated.private_key_hex());
        println!();
        println!("Use --output <dir> to save keys to files.");
    }

    Ok(())
}
