//! Who may do what. Both the HTTP layer and the gateway services consult the
//! same table.

use serde::Serialize;

use crate::{
    errors::{PlanError, PlanResult},
    models::profile::Role,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Caller {
    Anonymous,
    Member(Role),
}

impl Caller {
    pub fn role(&self) -> Option<Role> {
        match self {
            Caller::Anonymous => None,
            Caller::Member(role) => Some(*role),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ViewCalendar,
    ViewReports,
    ExportReports,
    ManageEvents,
    ViewUsers,
    ManageSettings,
    AutofillEvents,
}

/// Dashboard sections, each unlocked by one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Events,
    Users,
    Reports,
    Config,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Events, Section::Users, Section::Reports, Section::Config];

    pub fn required_action(&self) -> Action {
        match self {
            Section::Events => Action::ManageEvents,
            Section::Users => Action::ViewUsers,
            Section::Reports => Action::ViewReports,
            Section::Config => Action::ManageSettings,
        }
    }
}

const ADMIN_ACTIONS: &[Action] = &[
    Action::ViewCalendar,
    Action::ViewReports,
    Action::ExportReports,
    Action::ManageEvents,
    Action::ViewUsers,
    Action::ManageSettings,
    Action::AutofillEvents,
];

const REPORTER_ACTIONS: &[Action] = &[Action::ViewCalendar, Action::ViewReports, Action::ExportReports];

const VIEWER_ACTIONS: &[Action] = &[Action::ViewCalendar];

pub fn permitted_actions(caller: Caller) -> &'static [Action] {
    match caller {
        Caller::Member(Role::Admin) => ADMIN_ACTIONS,
        Caller::Member(Role::Reporter) => REPORTER_ACTIONS,
        Caller::Member(Role::Unrecognized) | Caller::Anonymous => VIEWER_ACTIONS,
    }
}

pub fn can_access(caller: Caller, action: Action) -> bool {
    permitted_actions(caller).contains(&action)
}

pub fn ensure(caller: Caller, action: Action) -> PlanResult<()> {
    if can_access(caller, action) {
        Ok(())
    } else {
        tracing::warn!("Rejected {:?} for {:?}", action, caller);
        Err(PlanError::Authorization(format!(
            "{:?} is not permitted for this account",
            action
        )))
    }
}

pub fn visible_sections(caller: Caller) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|section| can_access(caller, section.required_action()))
        .collect()
}

/// First section opened after sign-in.
pub fn landing_section(caller: Caller) -> Option<Section> {
    visible_sections(caller).into_iter().next()
}
