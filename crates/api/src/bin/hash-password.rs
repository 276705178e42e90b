#!/usr/bin/env cargo
//! Password hashing utility for Metashark
//!
//! Generates Argon2id password hashes for the ADMIN_PASSWORD_HASH
//! environment variable, so the plaintext never lands in configuration.
//!
//! Usage:
//!   cargo run --bin hash-password
//!   cargo run --bin hash-password "MySecurePassword123!"

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use std::env;
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let password = if let Some(pwd) = env::args().nth(1) {
        // Password provided as argument
        pwd
    } else {
        // Read password from stdin (doesn't show in the process list)
        print!("Enter password to hash: ");
        io::stdout().flush()?;

        let mut password = String::new();
        io::stdin().read_line(&mut password)?;
        password.trim().to_string()
    };

    if password.is_empty() {
        eprintln!("Error: Password cannot be empty");
        std::process::exit(1);
    }

    if password.len() < 12 {
        eprintln!("Warning: Password is less than 12 characters. Consider using a longer password.");
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("Password hashing failed: {}", e))?
        .to_string();

    println!("\n===========================================");
    println!("Password Hash (Argon2id):");
    println!("===========================================");
    println!("{}", password_hash);
    println!("===========================================\n");

    println!("Set it in the environment:");
    println!("ADMIN_PASSWORD_HASH='{}'", password_hash);

    Ok(())
}
