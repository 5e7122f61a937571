//! Actors: roles, departments, marketing branches, and the `User` record.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The four actor roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    ComplianceManager,
    DeptManager,
    TeamLead,
}

impl Role {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::ComplianceManager => "compliance_manager",
            Self::DeptManager => "dept_manager",
            Self::TeamLead => "team_lead",
        }
    }
}

/// Service departments a ticket can be routed to.
///
/// Compliance is a department in the staff directory but never a routing
/// target: routing decisions are *made* by compliance, not sent to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Resume,
    Marketing,
    Technical,
    Sales,
    Compliance,
}

impl Department {
    /// Departments that may appear on a [`DepartmentAssignment`].
    ///
    /// [`DepartmentAssignment`]: crate::model::assignment::DepartmentAssignment
    pub const ROUTABLE: [Self; 4] = [Self::Resume, Self::Marketing, Self::Technical, Self::Sales];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::Marketing => "marketing",
            Self::Technical => "technical",
            Self::Sales => "sales",
            Self::Compliance => "compliance",
        }
    }
}

/// Marketing branch nodes. Only meaningful for Marketing-department staff
/// and Marketing assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Branch {
    Ahm,
    Lko,
    Ggr,
}

impl Branch {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ahm => "AHM",
            Self::Lko => "LKO",
            Self::Ggr => "GGR",
        }
    }
}

/// An actor in the system.
///
/// Created at session start and never deleted. Only `email` and `phone`
/// change after creation (profile update). `branch` is meaningful only for
/// Marketing-department staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<Branch>,
}

/// Error returned when parsing a role/department/branch value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "client" => Ok(Self::Client),
            "compliance_manager" | "compliance-manager" => Ok(Self::ComplianceManager),
            "dept_manager" | "dept-manager" => Ok(Self::DeptManager),
            "team_lead" | "team-lead" => Ok(Self::TeamLead),
            _ => Err(ParseEnumError {
                expected: "role",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Department {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "resume" => Ok(Self::Resume),
            "marketing" => Ok(Self::Marketing),
            "technical" => Ok(Self::Technical),
            "sales" => Ok(Self::Sales),
            "compliance" => Ok(Self::Compliance),
            _ => Err(ParseEnumError {
                expected: "department",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Branch {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "ahm" => Ok(Self::Ahm),
            "lko" => Ok(Self::Lko),
            "ggr" => Ok(Self::Ggr),
            _ => Err(ParseEnumError {
                expected: "branch",
                got: s.to_string(),
            }),
        }
    }
}
