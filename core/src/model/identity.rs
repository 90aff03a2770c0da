use super::{OwnerStamp, UserId};

/// A signed-in user as reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
}

impl Identity {
    /// Denormalize this identity onto an entry. The display name falls
    /// back to the email local part, then to "User".
    pub fn stamp(&self) -> OwnerStamp {
        let display_name = self
            .display_name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| {
                self.email
                    .split('@')
                    .next()
                    .filter(|local| !local.is_empty())
                    .map(|local| local.to_owned())
            })
            .unwrap_or_else(|| String::from("User"));
        OwnerStamp {
            id: self.id.clone(),
            email: self.email.clone(),
            display_name,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn identity(email: &str, display_name: Option<&str>) -> Identity {
        Identity {
            id: UserId::from("user-1"),
            email: email.to_owned(),
            display_name: display_name.map(|n| n.to_owned()),
        }
    }

    #[test]
    fn stamp_prefers_display_name() {
        let stamp = identity("ada@example.com", Some("Ada")).stamp();
        assert_eq!(stamp.display_name, "Ada");
    }

    #[test]
    fn stamp_falls_back_to_email_local_part() {
        let stamp = identity("ada@example.com", None).stamp();
        assert_eq!(stamp.display_name, "ada");
        let stamp = identity("ada@example.com", Some("")).stamp();
        assert_eq!(stamp.display_name, "ada");
    }

    #[test]
    fn stamp_falls_back_to_generic_name() {
        let stamp = identity("", None).stamp();
        assert_eq!(stamp.display_name, "User");
    }
}
