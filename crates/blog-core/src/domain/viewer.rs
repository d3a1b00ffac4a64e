/// The identity behind the current request, as reported by the hosting
/// environment's sign-in layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub email: Option<String>,
    pub admin: bool,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            admin: false,
        }
    }

    pub fn admin(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            admin: true,
        }
    }
}
