use serde::{Deserialize, Serialize};

use crate::errors::RequestError;

// ----------------- User Request -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub location: Option<String>,
    pub password: Option<String>,
}

// ----------------- Blog Request -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateBlogRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category_id: Option<i64>,
    pub tags: Option<Vec<String>>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CommentRequest {
    pub body: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct TagRequest {
    pub name: String,
}

// ----------------- Validation -----------------

pub const MAX_TAGS_PER_BLOG: usize = 5;

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        require_text("username", &self.username)?;
        require_text("password", &self.password)?;
        validate_email(&self.email)
    }
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(password) = &self.password {
            require_text("password", password)?;
        }
        Ok(())
    }
}

impl CreateBlogRequest {
    pub fn validate(&self) -> Result<Vec<String>, RequestError> {
        require_text("title", &self.title)?;
        require_text("body", &self.body)?;
        normalize_tags(&self.tags)
    }
}

impl UpdateBlogRequest {
    pub fn validate(&self) -> Result<Option<Vec<String>>, RequestError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(body) = &self.body {
            require_text("body", body)?;
        }
        self.tags.as_deref().map(normalize_tags).transpose()
    }
}

impl CommentRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        require_text("body", &self.body)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), RequestError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(RequestError::Validation(format!("{} is not a valid email", email)));
    }
    Ok(())
}

/// Tag names are stored trimmed and lower-cased.
pub fn normalize_tag(name: &str) -> Result<String, RequestError> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err(RequestError::Validation("tag must not be empty".to_owned()));
    }
    if name.contains(',') {
        return Err(RequestError::Validation("tag must not contain commas".to_owned()));
    }
    Ok(name)
}

/// Normalizes and de-duplicates, keeping first-seen order.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, RequestError> {
    let mut normalized: Vec<String> = vec![];
    for tag in tags {
        let tag = normalize_tag(tag)?;
        if !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    if normalized.len() > MAX_TAGS_PER_BLOG {
        return Err(RequestError::Validation(format!(
            "a blog can have at most {} tags",
            MAX_TAGS_PER_BLOG
        )));
    }
    Ok(normalized)
}
