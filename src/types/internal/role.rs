use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Workflow role carried on every account
///
/// Stored as its upper-snake name in the `users.role` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Initiator,
    ChiefOfficer,
    CountySecretary,
    CpsbBoard,
    CpsbSecretariat,
    HrSecretariat,
    HrAdmin,
    Panelist,
    PayrollOfficer,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Initiator,
        Role::ChiefOfficer,
        Role::CountySecretary,
        Role::CpsbBoard,
        Role::CpsbSecretariat,
        Role::HrSecretariat,
        Role::HrAdmin,
        Role::Panelist,
        Role::PayrollOfficer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiator => "INITIATOR",
            Self::ChiefOfficer => "CHIEF_OFFICER",
            Self::CountySecretary => "COUNTY_SECRETARY",
            Self::CpsbBoard => "CPSB_BOARD",
            Self::CpsbSecretariat => "CPSB_SECRETARIAT",
            Self::HrSecretariat => "HR_SECRETARIAT",
            Self::HrAdmin => "HR_ADMIN",
            Self::Panelist => "PANELIST",
            Self::PayrollOfficer => "PAYROLL_OFFICER",
        }
    }

    /// Human-readable label shown in role pickers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Initiator => "Initiator",
            Self::ChiefOfficer => "Chief Officer",
            Self::CountySecretary => "County Secretary",
            Self::CpsbBoard => "CPSB Board Member",
            Self::CpsbSecretariat => "CPSB Secretariat",
            Self::HrSecretariat => "HR Secretariat",
            Self::HrAdmin => "HR Administrator",
            Self::Panelist => "Interview Panelist",
            Self::PayrollOfficer => "Payroll Officer",
        }
    }

    /// Authorization group a newly registered user with this role joins
    pub fn group(&self) -> Group {
        match self {
            Self::Initiator => Group::Initiators,
            Self::ChiefOfficer => Group::ChiefOfficers,
            Self::CountySecretary => Group::CountySecretaries,
            Self::CpsbBoard => Group::CpsbBoard,
            Self::CpsbSecretariat => Group::CpsbSecretariat,
            Self::HrSecretariat => Group::HrSecretariat,
            Self::HrAdmin => Group::HrAdministrators,
            Self::Panelist => Group::Panelists,
            Self::PayrollOfficer => Group::PayrollOfficers,
        }
    }

    /// Where a freshly logged-in user of this role is sent
    pub fn landing_path(&self) -> &'static str {
        match self {
            Self::Initiator => "/requisitions/create",
            Self::ChiefOfficer => "/requisitions/pending-approvals",
            Self::CountySecretary => "/requisitions/pending-endorsements",
            Self::CpsbBoard => "/requisitions/board-approvals",
            Self::HrSecretariat => "/candidates/shortlist",
            Self::CpsbSecretariat | Self::HrAdmin | Self::Panelist | Self::PayrollOfficer => {
                DASHBOARD_PATH
            }
        }
    }
}

pub const DASHBOARD_PATH: &str = "/dashboard";
pub const LOGIN_PATH: &str = "/accounts/login";

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Named permission bucket, seeded from the role and assignable afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Initiators,
    ChiefOfficers,
    CountySecretaries,
    CpsbBoard,
    CpsbSecretariat,
    HrSecretariat,
    HrAdministrators,
    Panelists,
    PayrollOfficers,
    Applicants,
}

impl Group {
    pub const ALL: [Group; 10] = [
        Group::Initiators,
        Group::ChiefOfficers,
        Group::CountySecretaries,
        Group::CpsbBoard,
        Group::CpsbSecretariat,
        Group::HrSecretariat,
        Group::HrAdministrators,
        Group::Panelists,
        Group::PayrollOfficers,
        Group::Applicants,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Initiators => "Initiators",
            Self::ChiefOfficers => "Chief Officers",
            Self::CountySecretaries => "County Secretaries",
            Self::CpsbBoard => "CPSB Board",
            Self::CpsbSecretariat => "CPSB Secretariat",
            Self::HrSecretariat => "HR Secretariat",
            Self::HrAdministrators => "HR Administrators",
            Self::Panelists => "Panelists",
            Self::PayrollOfficers => "Payroll Officers",
            Self::Applicants => "Applicants",
        }
    }

    /// Group for a raw stored role value; anything unrecognised lands in Applicants
    pub fn for_role_name(role: &str) -> Group {
        role.parse::<Role>()
            .map(|r| r.group())
            .unwrap_or(Group::Applicants)
    }

    pub fn from_name(name: &str) -> Option<Group> {
        Group::ALL.iter().copied().find(|g| g.name() == name)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert_eq!("SUPERUSER".parse::<Role>(), Err(UnknownRole("SUPERUSER".to_string())));
        assert!("initiator".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_group_mapping() {
        assert_eq!(Role::ChiefOfficer.group().name(), "Chief Officers");
        assert_eq!(Role::HrAdmin.group().name(), "HR Administrators");
        assert_eq!(Role::PayrollOfficer.group().name(), "Payroll Officers");
    }

    #[test]
    fn test_every_role_maps_to_a_distinct_group() {
        let groups: std::collections::HashSet<Group> = Role::ALL.iter().map(|r| r.group()).collect();
        assert_eq!(groups.len(), Role::ALL.len());
        assert!(!groups.contains(&Group::Applicants));
    }

    #[test]
    fn test_unrecognised_role_name_maps_to_applicants() {
        assert_eq!(Group::for_role_name("CPSB_BOARD"), Group::CpsbBoard);
        assert_eq!(Group::for_role_name("VISITOR"), Group::Applicants);
        assert_eq!(Group::for_role_name(""), Group::Applicants);
    }

    #[test]
    fn test_landing_paths() {
        assert_eq!(Role::Initiator.landing_path(), "/requisitions/create");
        assert_eq!(Role::HrSecretariat.landing_path(), "/candidates/shortlist");
        assert_eq!(Role::HrAdmin.landing_path(), DASHBOARD_PATH);
        assert_eq!(Role::Panelist.landing_path(), DASHBOARD_PATH);
    }

    #[test]
    fn test_group_from_name() {
        assert_eq!(Group::from_name("CPSB Secretariat"), Some(Group::CpsbSecretariat));
        assert_eq!(Group::from_name("Admins"), None);
    }
}
