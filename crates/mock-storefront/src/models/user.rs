//! 用户模型

use fake::Fake;
use fake::faker::internet::en::{Password, SafeEmail, Username};
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::Id;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    pub firstname: String,
    pub lastname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: UserName,
    pub phone: String,
}

/// 创建用户请求体，id/username/email/password 必填
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewUserInput {
    #[validate(required(message = "The id field is required."))]
    pub id: Option<Id>,
    #[validate(required(message = "The username field is required."))]
    pub username: Option<String>,
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "The password field is required."),
        length(min = 6, message = "The password must be at least 6 characters.")
    )]
    pub password: Option<String>,
    pub name: Option<UserName>,
    pub phone: Option<String>,
}

/// 更新用户请求体，只校验出现的字段
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UserInput {
    pub username: Option<String>,
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "The password must be at least 6 characters."))]
    pub password: Option<String>,
    pub name: Option<UserName>,
    pub phone: Option<String>,
}

/// 登录请求体
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginInput {
    #[validate(required(message = "The username field is required."))]
    pub username: Option<String>,
    #[validate(required(message = "The password field is required."))]
    pub password: Option<String>,
}

impl User {
    /// 由已校验的请求体构造用户
    pub fn from_input(id: Id, input: NewUserInput) -> Self {
        Self {
            id,
            username: input.username.unwrap_or_default(),
            email: input.email.unwrap_or_default(),
            password: input.password.unwrap_or_default(),
            name: input.name.unwrap_or_default(),
            phone: input.phone.unwrap_or_default(),
        }
    }

    pub fn apply(&mut self, input: UserInput) {
        if let Some(username) = input.username {
            self.username = username;
        }
        if let Some(email) = input.email {
            self.email = email;
        }
        if let Some(password) = input.password {
            self.password = password;
        }
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(phone) = input.phone {
            self.phone = phone;
        }
    }

    pub fn random(id: Id) -> Self {
        Self {
            id,
            username: Username().fake(),
            email: SafeEmail().fake(),
            password: Password(8..16).fake(),
            name: UserName {
                firstname: FirstName().fake(),
                lastname: LastName().fake(),
            },
            phone: PhoneNumber().fake(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_user() {
        let user = User::random(12);
        assert_eq!(user.id, 12);
        assert!(user.email.contains('@'));
        assert!(user.password.len() >= 8);
        assert!(!user.name.firstname.is_empty());
    }

    #[test]
    fn test_apply_keeps_missing_fields() {
        let mut user = User::random(1);
        let original_email = user.email.clone();
        user.apply(UserInput {
            username: Some("renamed".to_string()),
            ..Default::default()
        });
        assert_eq!(user.username, "renamed");
        assert_eq!(user.email, original_email);
    }

    #[test]
    fn test_new_user_validation() {
        let input = NewUserInput {
            id: Some(1200),
            username: Some("casey".to_string()),
            email: Some("casey@example.com".to_string()),
            password: Some("secret1".to_string()),
            ..Default::default()
        };
        assert!(input.validate().is_ok());

        let invalid = NewUserInput {
            email: Some("no-at-sign".to_string()),
            password: Some("12345".to_string()),
            ..Default::default()
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("id"));
        assert!(fields.contains_key("username"));
        assert_eq!(fields["email"][0].code, "email");
        assert_eq!(fields["password"][0].code, "length");
    }

    #[test]
    fn test_user_update_validates_present_fields_only() {
        assert!(UserInput::default().validate().is_ok());

        let input = UserInput {
            password: Some("short".to_string()),
            ..Default::default()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
        assert!(!errors.field_errors().contains_key("email"));
    }
}
