use crate::user::User;

/// Entities that can be matched against a free-text filter.
pub trait Searchable {
    /// Text fields the filter is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match on any field. An empty or
    /// whitespace-only query matches everything.
    fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        [
            self.name.as_deref(),
            self.first_name.as_deref(),
            self.email.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_matches_all() {
        let user = User::new("u1");
        assert!(user.matches(""));
        assert!(user.matches("   "));
    }

    #[test]
    fn test_user_matches_email_case_insensitive() {
        let mut user = User::new("u1");
        user.email = Some("Ada@Example.com".into());
        assert!(user.matches("ada@example"));
        assert!(!user.matches("grace"));
    }
}
