//! Redirect decision table.

use crate::classifier::RouteClass;

/// Fixed redirect destinations. The actual paths come from configuration,
/// never from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedirectTarget {
    Login,
    AdminHome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateAction {
    Forward,
    Redirect(RedirectTarget),
}

/// Pure decision for a classified path and a session signal.
///
/// | class | authenticated | action |
/// |---|---|---|
/// | admin | no | redirect to login |
/// | admin | yes | forward |
/// | login | yes | redirect to admin home |
/// | login | no | forward |
/// | public | any | forward |
#[must_use]
pub const fn decide(class: RouteClass, authenticated: bool) -> GateAction {
    match (class, authenticated) {
        (RouteClass::AdminArea, false) => GateAction::Redirect(RedirectTarget::Login),
        (RouteClass::LoginArea, true) => GateAction::Redirect(RedirectTarget::AdminHome),
        (RouteClass::AdminArea, true) | (RouteClass::LoginArea, false) | (RouteClass::Public, _) => {
            GateAction::Forward
        }
    }
}
