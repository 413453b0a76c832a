//! Route table of the inventory app

use estoque_router::{NavigationGuard, RouteTable};

use crate::Result;

pub fn route_table() -> Result<RouteTable> {
    let table = RouteTable::builder()
        .redirect("/", "/produtos")
        // Anonymous pages
        .public("/login", "login", "Login")
        .public("/register", "register", "Register")
        .public("/esqueci-senha", "forgot-password", "ForgotPassword")
        // Inventory
        .protected("/produtos", "products", "Products")
        .protected("/adicionar-produto", "add-product", "AddProduct")
        .protected_with_props("/editar-produto/:id", "edit-product", "EditProduct")
        .protected("/alertas", "alerts", "Alerts")
        .protected("/vendas", "sales", "Sales")
        .protected("/armazens", "warehouses", "WarehousesView")
        // Account
        .protected("/perfil", "profile", "ProfileView")
        .protected("/alterar-senha", "change-password", "ChangePasswordView")
        // Old English paths
        .redirect("/alerts", "/alertas")
        .redirect("/sales", "/vendas")
        .redirect("/warehouses", "/armazens")
        .redirect("/profile", "/perfil")
        .redirect("/change-password", "/alterar-senha")
        .build()?;

    Ok(table)
}

pub fn navigation_guard() -> NavigationGuard {
    NavigationGuard::new("login", "products")
        .with_auth_page("register")
        .with_auth_page("forgot-password")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builds() {
        let table = route_table().unwrap();
        assert_eq!(table.routes().len(), 11);
        assert_eq!(table.redirects().len(), 6);
    }

    #[test]
    fn test_guard_targets_exist_and_cannot_loop() {
        let table = route_table().unwrap();
        let guard = navigation_guard();

        let login = table.find_by_name(guard.login_route()).unwrap();
        assert!(!login.meta.requires_auth);

        let landing = table.find_by_name(guard.landing_route()).unwrap();
        assert!(!guard.is_auth_page(&landing.name));
    }

    #[test]
    fn test_every_alias_lands_on_a_route() {
        let table = route_table().unwrap();
        for redirect in table.redirects() {
            assert!(
                table.match_path(&redirect.to).is_some(),
                "{} points nowhere",
                redirect.from
            );
        }
    }

    #[test]
    fn test_auth_pages_are_public() {
        let table = route_table().unwrap();
        let guard = navigation_guard();
        for route in table.routes() {
            if guard.is_auth_page(&route.name) {
                assert!(!route.meta.requires_auth, "{} must be public", route.name);
            }
        }
    }
}
