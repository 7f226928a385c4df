/// Actor context resolved from a verified bearer token.
///
/// Attached to each authenticated request as an extension; never persisted.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: i64,
    pub org_id: i64,
}

impl AuthContext {
    pub fn new(user_id: i64, org_id: i64) -> Self {
        Self { user_id, org_id }
    }
}
