use secrecy::SecretString;
use uuid::Uuid;

/// `SecurityContext` carries the identity attached to a request by the request gate.
///
/// Built from a resolved session and inserted into the request extensions before the
/// page handler runs, so handlers receive identity explicitly instead of reading
/// ambient request state.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SecurityContext {
    /// Subject ID. Nil for anonymous requests.
    subject_id: Uuid,
    /// Subject type classification (e.g., "staff", "site_admin").
    subject_type: Option<String>,
    /// Site the subject administers. `None` for platform-wide administrators
    /// and anonymous visitors.
    site_id: Option<Uuid>,
    /// Credential the session was resolved from. Never serialized/persisted.
    /// Wrapped in `SecretString` so `Debug` redacts the value automatically.
    #[serde(skip)]
    credential: Option<SecretString>,
}

impl SecurityContext {
    /// Create a new `SecurityContext` builder
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Create an anonymous `SecurityContext` with no subject, site or credential
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }

    /// Whether this context represents an unauthenticated visitor.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.subject_id.is_nil()
    }

    #[must_use]
    pub fn subject_id(&self) -> Uuid {
        self.subject_id
    }

    #[must_use]
    pub fn subject_type(&self) -> Option<&str> {
        self.subject_type.as_deref()
    }

    #[must_use]
    pub fn site_id(&self) -> Option<Uuid> {
        self.site_id
    }

    /// Get the original session credential.
    #[must_use]
    pub fn credential(&self) -> Option<&SecretString> {
        self.credential.as_ref()
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    subject_id: Option<Uuid>,
    subject_type: Option<String>,
    site_id: Option<Uuid>,
    credential: Option<SecretString>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn subject_id(mut self, subject_id: Uuid) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    #[must_use]
    pub fn subject_type(mut self, subject_type: &str) -> Self {
        self.subject_type = Some(subject_type.to_owned());
        self
    }

    #[must_use]
    pub fn site_id(mut self, site_id: Option<Uuid>) -> Self {
        self.site_id = site_id;
        self
    }

    #[must_use]
    pub fn credential(mut self, credential: impl Into<SecretString>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            subject_id: self.subject_id.unwrap_or_default(),
            subject_type: self.subject_type,
            site_id: self.site_id,
            credential: self.credential,
        }
    }
}
