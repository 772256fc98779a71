/// Password hashing module using Argon2id
///
/// This module provides secure password hashing using the Argon2id algorithm
/// and a configurable strength policy applied at registration time.
///
/// # Security
///
/// - **Algorithm**: Argon2id (hybrid of Argon2i and Argon2d)
/// - **Cost**: configurable via [`HashCost`]; defaults to 64 MB memory,
///   3 passes, 4 lanes
/// - **Salt**: 16 random bytes from the OS RNG per hash
/// - **Output**: PHC string format (parameters and salt embedded)
///
/// # Example
///
/// ```
/// use ticklist_shared::auth::password::{hash_password, verify_password, HashCost};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123", &HashCost::default())?;
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Argon2id cost parameters
///
/// The defaults match the recommended server-side profile: 64 MB of memory,
/// 3 iterations, 4 lanes. Deployments on constrained hardware can lower
/// these through configuration; the chosen parameters are embedded in each
/// PHC hash string, so verification never needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes over memory
    pub iterations: u32,

    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: 65536, // 64 MB
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Password strength requirements checked at registration
///
/// Each character-class requirement can be toggled independently. The
/// defaults require 8+ characters with upper, lower, digit, and special
/// characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum password length in characters
    pub min_length: usize,

    /// Require at least one uppercase letter
    pub require_upper: bool,

    /// Require at least one lowercase letter
    pub require_lower: bool,

    /// Require at least one digit
    pub require_digit: bool,

    /// Require at least one non-alphanumeric character
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_upper: true,
            require_lower: true,
            require_digit: true,
            require_special: true,
        }
    }
}

impl PasswordPolicy {
    /// Checks a password against this policy
    ///
    /// Returns `Ok(())` if the password satisfies every enabled requirement,
    /// or a human-readable description of the first failed requirement.
    ///
    /// # Example
    ///
    /// ```
    /// use ticklist_shared::auth::password::PasswordPolicy;
    ///
    /// let policy = PasswordPolicy::default();
    /// assert!(policy.check("MyP@ssw0rd!").is_ok());
    /// assert!(policy.check("Sh0rt!").is_err());
    /// assert!(policy.check("Password123").is_err()); // no special character
    /// ```
    pub fn check(&self, password: &str) -> Result<(), String> {
        if password.chars().count() < self.min_length {
            return Err(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }

        if self.require_upper && !password.chars().any(|c| c.is_uppercase()) {
            return Err("Password must contain at least one uppercase letter".to_string());
        }

        if self.require_lower && !password.chars().any(|c| c.is_lowercase()) {
            return Err("Password must contain at least one lowercase letter".to_string());
        }

        if self.require_digit && !password.chars().any(|c| c.is_numeric()) {
            return Err("Password must contain at least one digit".to_string());
        }

        if self.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err("Password must contain at least one special character".to_string());
        }

        Ok(())
    }
}

/// Hashes a password using Argon2id
///
/// # Arguments
///
/// * `password` - The plaintext password to hash
/// * `cost` - Argon2id cost parameters
///
/// # Returns
///
/// PHC string format hash (includes algorithm, parameters, salt, and hash):
///
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$hash...
/// ```
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str, cost: &HashCost) -> Result<String, PasswordError> {
    // Random salt from the OS RNG
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(cost.memory_kib)
        .t_cost(cost.iterations)
        .p_cost(cost.parallelism)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Comparison is constant-time with respect to the password content.
///
/// # Arguments
///
/// * `password` - The plaintext password to verify
/// * `hash` - The stored password hash (PHC string format)
///
/// # Returns
///
/// `Ok(true)` if the password matches, `Ok(false)` if it doesn't
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed,
/// `PasswordError::VerifyError` on other failures.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters are embedded in the hash
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!(
            "Verification failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_cost() -> HashCost {
        // Keep unit tests quick; production cost is exercised by default()
        HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_password_format() {
        let hash = hash_password("test_password_123", &HashCost::default()).expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_hash_cost_is_embedded() {
        let cost = HashCost {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        };
        let hash = hash_password("password", &cost).expect("Hash should succeed");

        assert!(hash.contains("m=2048"));
        assert!(hash.contains("t=2"));
        assert!(hash.contains("p=1"));

        // Verification reads parameters from the hash itself
        assert!(verify_password("password", &hash).unwrap());
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("same_password", &fast_cost()).expect("Hash 1 should succeed");
        let hash2 = hash_password("same_password", &fast_cost()).expect("Hash 2 should succeed");

        // Different salts = different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct_password", &fast_cost()).expect("Hash should succeed");
        assert!(verify_password("correct_password", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct_password", &fast_cost()).expect("Hash should succeed");
        assert!(!verify_password("wrong_password", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_empty() {
        let hash = hash_password("password", &fast_cost()).expect("Hash should succeed");
        assert!(!verify_password("", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("password", "invalid_hash").is_err());
        assert!(verify_password("password", "$argon2id$invalid").is_err());
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let passwords = vec![
            "simple",
            "with spaces",
            "with-special-chars!@#$%",
            "unicode-密码-パスワード",
        ];

        for password in passwords {
            let hash = hash_password(password, &fast_cost()).expect("Hash should succeed");
            let verified = verify_password(password, &hash).expect("Verify should succeed");
            assert!(verified, "Password '{}' should verify", password);
        }
    }

    #[test]
    fn test_policy_valid_passwords() {
        let policy = PasswordPolicy::default();
        for password in ["MyP@ssw0rd!", "Str0ng!Pass", "Abcdef1!", "S3cur3$Password"] {
            assert!(
                policy.check(password).is_ok(),
                "Password '{}' should be valid",
                password
            );
        }
    }

    #[test]
    fn test_policy_too_short() {
        let result = PasswordPolicy::default().check("Sh0rt!");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("at least 8 characters"));
    }

    #[test]
    fn test_policy_missing_classes() {
        let policy = PasswordPolicy::default();

        let result = policy.check("lowercase1!");
        assert!(result.unwrap_err().contains("uppercase letter"));

        let result = policy.check("UPPERCASE1!");
        assert!(result.unwrap_err().contains("lowercase letter"));

        let result = policy.check("NoDigits!");
        assert!(result.unwrap_err().contains("digit"));

        let result = policy.check("NoSpecial123");
        assert!(result.unwrap_err().contains("special character"));
    }

    #[test]
    fn test_policy_requirements_can_be_disabled() {
        let policy = PasswordPolicy {
            min_length: 4,
            require_upper: false,
            require_lower: true,
            require_digit: false,
            require_special: false,
        };

        assert!(policy.check("abcd").is_ok());
        assert!(policy.check("abc").is_err());
        assert!(policy.check("ABCD").is_err()); // lowercase still required
    }

    #[test]
    fn test_policy_min_length_counts_chars_not_bytes() {
        let policy = PasswordPolicy {
            min_length: 4,
            require_upper: false,
            require_lower: false,
            require_digit: false,
            require_special: false,
        };

        // 4 characters, more than 4 bytes
        assert!(policy.check("密码密码").is_ok());
    }
}
