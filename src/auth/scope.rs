/// Which owners' rows an operation may touch.
///
/// Regular callers are confined to their own rows; admins see every owner.
/// A scoped lookup that matches nothing is reported exactly like a missing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerScope {
    Owner(i32),
    All,
}

impl OwnerScope {
    /// The `owner_id` filter to bind, `None` when unrestricted.
    pub fn owner_id(&self) -> Option<i32> {
        match self {
            OwnerScope::Owner(id) => Some(*id),
            OwnerScope::All => None,
        }
    }
}
