use crate::presence::is_set;
use cfdiscover_schema::{AppManifest, AppManifestRoute, Route, RouteProtocol};
use tracing::debug;

/// The manifest flags that override the explicit route list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteFlags {
    pub no_route: bool,
    pub random_route: bool,
    pub default_route: bool,
}

impl RouteFlags {
    pub fn from_app(app: &AppManifest) -> Self {
        Self {
            no_route: is_set(app.no_route),
            random_route: is_set(app.random_route),
            default_route: is_set(app.default_route),
        }
    }

    fn synthesizes_route(self) -> bool {
        self.random_route || self.default_route
    }
}

/// Resolve the runtime routes of an application.
///
/// Rules are checked in order and the first match wins:
/// 1. `no-route` disables routing entirely;
/// 2. a missing route list means no routes;
/// 3. `random-route`/`default-route` yields one route named after the app;
/// 4. otherwise every listed route is copied, protocol included verbatim.
pub fn resolve_routes(
    app_name: &str,
    routes: Option<&[AppManifestRoute]>,
    flags: RouteFlags,
) -> Vec<Route> {
    if flags.no_route {
        if routes.is_some_and(|r| !r.is_empty()) {
            debug!("no-route is set on '{app_name}'; ignoring its route list");
        }
        return Vec::new();
    }

    let Some(routes) = routes else {
        return Vec::new();
    };

    if flags.synthesizes_route() {
        return vec![Route {
            url: app_name.to_owned(),
            protocol: None,
        }];
    }

    routes
        .iter()
        .map(|route| {
            let protocol = route.protocol.as_deref().map(RouteProtocol::from);
            if let Some(p) = protocol.as_ref().filter(|p| !p.is_known()) {
                debug!("passing through unrecognized protocol '{p}' for route '{}'", route.route);
            }
            Route {
                url: route.route.clone(),
                protocol,
            }
        })
        .collect()
}
