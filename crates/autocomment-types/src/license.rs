use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A license the account may attach its configuration to.
///
/// Issued and managed elsewhere; the allocator only reads it to decide
/// whether configuration is permitted at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub id: String,
    pub key: String,
    pub name: String,
    pub status: LicenseStatus,
}

impl License {
    pub fn is_available(&self) -> bool {
        self.status == LicenseStatus::Active
    }

    /// Key with everything but the last four characters masked.
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.key.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{tail}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    Inactive,
    Expired,
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseStatus::Active => write!(f, "active"),
            LicenseStatus::Inactive => write!(f, "inactive"),
            LicenseStatus::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for LicenseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(LicenseStatus::Active),
            "inactive" => Ok(LicenseStatus::Inactive),
            "expired" => Ok(LicenseStatus::Expired),
            other => Err(format!("invalid license status: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn license(key: &str, status: LicenseStatus) -> License {
        License {
            id: "lic-1".to_string(),
            key: key.to_string(),
            name: "Main".to_string(),
            status,
        }
    }

    #[test]
    fn test_only_active_is_available() {
        assert!(license("k", LicenseStatus::Active).is_available());
        assert!(!license("k", LicenseStatus::Expired).is_available());
        assert!(!license("k", LicenseStatus::Inactive).is_available());
    }

    #[test]
    fn test_masked_key() {
        assert_eq!(license("OLLY-ABCD-1234", LicenseStatus::Active).masked_key(), "****1234");
        assert_eq!(license("abc", LicenseStatus::Active).masked_key(), "****");
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [LicenseStatus::Active, LicenseStatus::Inactive, LicenseStatus::Expired] {
            let parsed: LicenseStatus = status.to_string().parse().unwrap();
            assert_eq!(status, parsed);
        }
    }
}
