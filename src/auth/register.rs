use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use chrono::Utc;
use rand::RngCore;

use super::repository::UserRepository;
use crate::error::AppError;
use crate::models::{PublicUser, RegisterInput, RegisterResponse, UserRecord};

const MIN_PASSWORD_LEN: usize = 6;

fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)?;
    Ok(hasher().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Checks run before the repository is touched.
fn validate(input: &RegisterInput) -> Result<(), AppError> {
    if input.email.trim().is_empty() || input.name.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if !input.email.contains('@') {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    Ok(())
}

pub fn register<R: UserRepository + ?Sized>(
    repo: &R,
    input: RegisterInput,
) -> Result<RegisterResponse, AppError> {
    validate(&input)?;

    let email = input.email.trim().to_string();
    if repo.find_by_email(&email)?.is_some() {
        return Err(AppError::Duplicate("Email".to_string()));
    }

    let record = UserRecord {
        id: uuid::Uuid::new_v4().to_string(),
        email,
        name: input.name.trim().to_string(),
        password_hash: hash_password(&input.password)?,
        created_at: Utc::now().timestamp(),
    };
    repo.create(&record)?;
    log::info!("Registered user {}", record.id);

    Ok(RegisterResponse {
        message: "User created successfully".to_string(),
        user: PublicUser::from(record),
    })
}

/// Returns the account when `password` matches its stored hash.
pub fn authenticate<R: UserRepository + ?Sized>(
    repo: &R,
    email: &str,
    password: &str,
) -> Result<Option<PublicUser>, AppError> {
    let Some(record) = repo.find_by_email(email.trim())? else {
        return Ok(None);
    };
    let parsed = PasswordHash::new(&record.password_hash)?;
    if hasher().verify_password(password.as_bytes(), &parsed).is_ok() {
        Ok(Some(PublicUser::from(record)))
    } else {
        log::warn!("Failed sign-in attempt for {}", record.email);
        Ok(None)
    }
}
