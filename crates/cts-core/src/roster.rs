//! Static staff directory.
//!
//! The engine consumes the roster as plain data: it is supplied by the
//! environment (session layer or a roster file) and only consulted for
//! lookups during team-lead assignment and query scoping. A built-in
//! default roster covers every department and branch.

use crate::model::user::{Branch, Department, Role, User};
use serde::{Deserialize, Serialize};

/// The roster of internal staff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(pub Vec<User>);

impl Roster {
    /// Look up a staff member by id.
    #[must_use]
    pub fn find(&self, user_id: &str) -> Option<&User> {
        self.0.iter().find(|u| u.id == user_id)
    }

    /// Team leads eligible for an assignment in `department`.
    pub fn team_leads_for(&self, department: Department) -> impl Iterator<Item = &User> {
        self.0
            .iter()
            .filter(move |u| u.role == Role::TeamLead && u.department == Some(department))
    }

    /// All staff, in directory order.
    #[must_use]
    pub fn members(&self) -> &[User] {
        &self.0
    }
}

fn staff(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    role: Role,
    department: Option<Department>,
    branch: Option<Branch>,
) -> User {
    User {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        phone: phone.into(),
        role,
        department,
        branch,
    }
}

/// The built-in staff directory: one compliance manager, department
/// managers for every routing node, and team leads for Technical, Resume,
/// and Sales.
#[must_use]
pub fn default_roster() -> Roster {
    use Department::{Marketing, Resume, Sales, Technical};
    Roster(vec![
        staff(
            "s1",
            "Sarah Admin",
            "sarah@cts.com",
            "+10000000001",
            Role::ComplianceManager,
            None,
            None,
        ),
        staff(
            "s2",
            "Amit Manager",
            "amit@cts.com",
            "+10000000002",
            Role::DeptManager,
            Some(Marketing),
            Some(Branch::Ahm),
        ),
        staff(
            "s3",
            "Lina Manager",
            "lina@cts.com",
            "+10000000003",
            Role::DeptManager,
            Some(Marketing),
            Some(Branch::Lko),
        ),
        staff(
            "s4",
            "Kevin Tech",
            "kevin@cts.com",
            "+10000000004",
            Role::DeptManager,
            Some(Technical),
            None,
        ),
        staff(
            "s5",
            "Raj TeamLead",
            "raj@cts.com",
            "+10000000005",
            Role::TeamLead,
            Some(Technical),
            None,
        ),
        staff(
            "s6",
            "Elena Manager",
            "elena@cts.com",
            "+10000000006",
            Role::DeptManager,
            Some(Resume),
            None,
        ),
        staff(
            "s7",
            "Sam Lead",
            "sam@cts.com",
            "+10000000007",
            Role::TeamLead,
            Some(Resume),
            None,
        ),
        staff(
            "s8",
            "Victor Manager",
            "victor@cts.com",
            "+10000000008",
            Role::DeptManager,
            Some(Sales),
            None,
        ),
        staff(
            "s9",
            "John Lead",
            "john@cts.com",
            "+10000000009",
            Role::TeamLead,
            Some(Sales),
            None,
        ),
    ])
}
