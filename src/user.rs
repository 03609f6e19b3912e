use nix::unistd::{Uid, User};

//Represents the account that owns a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: u32,
    pub name: Option<String>,
}

impl Owner {
    //Looks the uid up in the account database; an unknown uid keeps only the number.
    pub fn resolve(id: u32) -> Self {
        let name = match User::from_uid(Uid::from_raw(id)) {
            Ok(Some(user)) => Some(user.name),
            Ok(None) => None,
            Err(e) => {
                log::debug!("Account lookup for uid {} failed: {}", id, e);
                None
            }
        };
        Owner { id, name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_resolves_to_an_account() {
        let owner = Owner::resolve(0);
        assert_eq!(owner.id, 0);
        assert_eq!(owner.name.as_deref(), Some("root"));
    }
}
