//! User domain model

use std::fmt;

use serde::{Deserialize, Serialize};

/// Profile image used when a user does not supply one
pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";

/// Header image used when a user does not supply one
pub const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/warbler-hero.jpg";

/// A persisted user
///
/// Instances only come out of the store, so `id` is always the
/// store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// Stored credential, opaque to the directory
    #[serde(skip_serializing, default)]
    pub password: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
}

impl User {
    /// Canonical textual form: `<User #{id}: {username}, {email}>`
    pub fn represent(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<User #{}: {}, {}>", self.id, self.username, self.email)
    }
}

/// A user that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

impl NewUser {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: password.into(),
            image_url: None,
            header_image_url: None,
            bio: None,
            location: None,
        }
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_header_image_url(mut self, header_image_url: impl Into<String>) -> Self {
        self.header_image_url = Some(header_image_url.into());
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Profile image to store, falling back to the default picture
    pub fn image_url_or_default(&self) -> &str {
        self.image_url.as_deref().unwrap_or(DEFAULT_IMAGE_URL)
    }

    /// Header image to store, falling back to the default hero image
    pub fn header_image_url_or_default(&self) -> &str {
        self.header_image_url
            .as_deref()
            .unwrap_or(DEFAULT_HEADER_IMAGE_URL)
    }

    /// Attach the store-assigned identifier
    pub fn into_user(self, id: i64) -> User {
        let image_url = self.image_url_or_default().to_string();
        let header_image_url = self.header_image_url_or_default().to_string();
        User {
            id,
            email: self.email,
            username: self.username,
            password: self.password,
            image_url,
            header_image_url,
            bio: self.bio,
            location: self.location,
        }
    }
}
