use transport::{LOGIN_ROUTE, SessionHandle};

pub const DASHBOARD_ROUTE: &str = "/admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Product(String),
    Category(String),
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    Dashboard,
    Products,
    Categories,
    Customers,
    Orders,
    OrderDetail(i64),
    Offers,
    NotFound(String),
}

impl Route {
    pub fn resolve(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["products", slug] => Route::Product(slug.to_string()),
            ["categories", slug] => Route::Category(slug.to_string()),
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["forgot-password"] => Route::ForgotPassword,
            ["reset-password"] => Route::ResetPassword,
            ["admin"] | ["admin", "dashboard"] => Route::Dashboard,
            ["admin", "products"] => Route::Products,
            ["admin", "categories"] => Route::Categories,
            ["admin", "customers"] => Route::Customers,
            ["admin", "orders"] => Route::Orders,
            ["admin", "orders", id] => match id.parse() {
                Ok(id) => Route::OrderDetail(id),
                Err(_) => Route::NotFound(path.to_string()),
            },
            ["admin", "offers"] => Route::Offers,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Product(slug) => format!("/products/{slug}"),
            Route::Category(slug) => format!("/categories/{slug}"),
            Route::Login => LOGIN_ROUTE.to_string(),
            Route::Register => "/register".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::ResetPassword => "/reset-password".to_string(),
            Route::Dashboard => DASHBOARD_ROUTE.to_string(),
            Route::Products => "/admin/products".to_string(),
            Route::Categories => "/admin/categories".to_string(),
            Route::Customers => "/admin/customers".to_string(),
            Route::Orders => "/admin/orders".to_string(),
            Route::OrderDetail(id) => format!("/admin/orders/{id}"),
            Route::Offers => "/admin/offers".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard
                | Route::Products
                | Route::Categories
                | Route::Customers
                | Route::Orders
                | Route::OrderDetail(_)
                | Route::Offers
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Render(Route),
    RedirectToLogin,
    RedirectToDashboard,
}

/// Protected-route gate, evaluated on every navigation.
pub struct RouteGate {
    session: SessionHandle,
}

impl RouteGate {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    pub fn check(&self, route: Route) -> GateDecision {
        let authenticated = self.session.is_authenticated();
        match route {
            route if route.is_protected() && !authenticated => {
                tracing::debug!(path = %route.path(), "Unauthenticated, redirecting to login");
                GateDecision::RedirectToLogin
            }
            Route::Login if authenticated => GateDecision::RedirectToDashboard,
            route => GateDecision::Render(route),
        }
    }

    pub fn check_path(&self, path: &str) -> GateDecision {
        self.check(Route::resolve(path))
    }
}
