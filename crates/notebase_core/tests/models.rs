use notebase_core::{NewNote, NewUser, Note, User, UserValidationError};

#[test]
fn new_user_leaves_created_at_to_storage() {
    let user = NewUser::new("ada", "ada@example.com", "digest");
    assert_eq!(user.created_at, None);
    assert_eq!(user.with_created_at(42).created_at, Some(42));
}

#[test]
fn validate_counts_characters_not_bytes() {
    let username: String = "é".repeat(50);
    assert!(username.len() > 50);
    assert!(NewUser::new(username, "a@b.c", "d").validate().is_ok());

    let email = format!("{}@b.c", "ü".repeat(97));
    let err = NewUser::new("ada", email, "d").validate().unwrap_err();
    assert_eq!(
        err,
        UserValidationError::EmailTooLong {
            chars: 101,
            max: 100
        }
    );
}

#[test]
fn validate_rejects_blank_required_fields() {
    assert_eq!(
        NewUser::new("ada", " ", "d").validate().unwrap_err(),
        UserValidationError::BlankEmail
    );
    assert_eq!(
        NewUser::new("", "a@b.c", "d").validate().unwrap_err(),
        UserValidationError::BlankUsername
    );
}

#[test]
fn user_serialization_omits_password_hash() {
    let user = User {
        id: 7,
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
        password_hash: "$argon2id$secret".to_string(),
        created_at: 1_700_000_000_000,
    };

    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["username"], "ada");
    assert!(json.get("password_hash").is_none());

    let decoded: User = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.password_hash, "");
    assert_eq!(decoded.username, user.username);
}

#[test]
fn note_serializes_null_owner() {
    let note = Note {
        id: 1,
        user_id: None,
        content: "orphan".to_string(),
        created_at: 0,
    };
    let json = serde_json::to_value(&note).unwrap();
    assert!(json["user_id"].is_null());
    assert_eq!(NewNote::new(None, "x").user_id, None);
}
