use crate::auth::{authenticate, register, SqliteUserRepository};
use crate::db::Database;
use crate::models::{PublicUser, RegisterInput, RegisterResponse};

pub fn register_user(db: &Database, input: RegisterInput) -> Result<RegisterResponse, String> {
    let repo = SqliteUserRepository::new(db);
    register(&repo, input).map_err(|e| e.to_string())
}

pub fn sign_in(db: &Database, email: &str, password: &str) -> Result<PublicUser, String> {
    let repo = SqliteUserRepository::new(db);
    authenticate(&repo, email, password)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "Invalid email or password".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(password: &str) -> RegisterInput {
        RegisterInput {
            email: "ravi@example.com".to_string(),
            name: "Ravi".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_then_sign_in() {
        let db = Database::open_in_memory().unwrap();
        let response = register_user(&db, input("hunter22")).unwrap();
        assert_eq!(response.message, "User created successfully");

        let user = sign_in(&db, "ravi@example.com", "hunter22").unwrap();
        assert_eq!(user, response.user);
        assert_eq!(sign_in(&db, "ravi@example.com", "hunter23").unwrap_err(), "Invalid email or password");
    }

    #[test]
    fn test_second_registration_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        register_user(&db, input("hunter22")).unwrap();
        assert_eq!(register_user(&db, input("hunter22")).unwrap_err(), "Email already exists");
    }
}
