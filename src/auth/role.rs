//! Roles and the role -> portal origin table
//!
//! Every user holds exactly one role, and every role is served by exactly one
//! portal. Anything that does not resolve to a role is sent to the login portal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of roles known to the portals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
    Professor,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Student, Role::Professor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Professor => "professor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Case-insensitive; the backend sends upper-case role names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "student" => Ok(Role::Student),
            "professor" => Ok(Role::Professor),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Origins of the independently hosted portals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalOrigins {
    /// Shared login portal, also the fallback for unknown roles
    pub login: String,
    pub admin: String,
    pub student: String,
    pub professor: String,
}

impl Default for PortalOrigins {
    fn default() -> Self {
        Self {
            login: "http://localhost:3000".to_string(),
            admin: "http://localhost:3001".to_string(),
            student: "http://localhost:3002".to_string(),
            professor: "http://localhost:3003".to_string(),
        }
    }
}

impl PortalOrigins {
    /// Origin of the portal that serves `role`; no role means the login portal
    pub fn origin_for(&self, role: Option<Role>) -> &str {
        match role {
            Some(Role::Admin) => &self.admin,
            Some(Role::Student) => &self.student,
            Some(Role::Professor) => &self.professor,
            None => &self.login,
        }
    }

    /// Same as [`origin_for`](Self::origin_for) for a raw role name
    pub fn origin_for_name(&self, role: &str) -> &str {
        self.origin_for(role.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" Student ".parse::<Role>(), Ok(Role::Student));
        assert_eq!("professor".parse::<Role>(), Ok(Role::Professor));
    }

    #[test]
    fn test_role_parse_unknown() {
        assert_eq!(
            "janitor".parse::<Role>(),
            Err(UnknownRole("janitor".to_string()))
        );
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Professor).unwrap(), "\"professor\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_display_matches_as_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string(), role.as_str());
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_origin_table_is_total() {
        let origins = PortalOrigins::default();
        assert_eq!(origins.origin_for(Some(Role::Admin)), "http://localhost:3001");
        assert_eq!(origins.origin_for(Some(Role::Student)), "http://localhost:3002");
        assert_eq!(origins.origin_for(Some(Role::Professor)), "http://localhost:3003");
        assert_eq!(origins.origin_for(None), "http://localhost:3000");
    }

    #[test]
    fn test_unknown_role_name_maps_to_login() {
        let origins = PortalOrigins::default();
        assert_eq!(origins.origin_for_name("ADMIN"), origins.admin);
        assert_eq!(origins.origin_for_name("superuser"), origins.login);
        assert_eq!(origins.origin_for_name(""), origins.login);
    }
}
