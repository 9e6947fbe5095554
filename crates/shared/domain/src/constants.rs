//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Platform administrator
pub const ROLE_SYSTEM_ADMIN: &str = "SYSTEM_ADMIN";

/// Default role assigned on self-registration
pub const ROLE_NORMAL_USER: &str = "NORMAL_USER";

/// Owner of exactly one store
pub const ROLE_STORE_OWNER: &str = "STORE_OWNER";

// =============================================================================
// Validation
// =============================================================================

/// Minimum user name length (characters)
pub const MIN_NAME_LENGTH: usize = 20;

/// Maximum user name length (characters)
pub const MAX_NAME_LENGTH: usize = 60;

/// Minimum password length (characters)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (characters)
pub const MAX_PASSWORD_LENGTH: usize = 16;

/// Characters that satisfy the "special character" password rule
pub const PASSWORD_SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Maximum email length, matching the `users.email` and `stores.email` columns
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Maximum address length for users and stores
pub const MAX_ADDRESS_LENGTH: usize = 400;

/// Maximum store name length
pub const MAX_STORE_NAME_LENGTH: usize = 100;

/// Lowest accepted rating
pub const MIN_RATING: i32 = 1;

/// Highest accepted rating
pub const MAX_RATING: i32 = 5;

// =============================================================================
// Password Hashing (Argon2id)
// =============================================================================

/// Memory cost in KiB
pub const ARGON2_MEMORY_KIB: u32 = 19_456;

/// Number of passes over memory
pub const ARGON2_ITERATIONS: u32 = 2;

/// Degree of parallelism
pub const ARGON2_PARALLELISM: u32 = 1;

// =============================================================================
// Authentication
// =============================================================================

/// Absolute token lifetime from issuance, in seconds
pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Generic message for any failed login or password change
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";
