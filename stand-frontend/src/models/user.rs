//! Users, business roles and module permissions.

use serde::{Deserialize, Serialize};

/// Profile returned by the backend's `/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub role: String,
}

impl User {
    pub fn business_role(&self) -> Option<Role> {
        Role::from_backend(&self.role)
    }

    pub fn can_access(&self, module: Module) -> bool {
        self.business_role()
            .is_some_and(|role| module.allowed_roles().contains(&role))
    }

    /// Hierarchy check: the caller's role ranks at least as high as `required`.
    pub fn has_permission(&self, required: Role) -> bool {
        self.business_role()
            .is_some_and(|role| role.level() >= required.level())
    }

    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    #[serde(rename = "Propriétaire")]
    Owner,
    Commercial,
    #[serde(rename = "Logistique")]
    Logistics,
    Finance,
    #[serde(rename = "Visiteur")]
    Visitor,
}

impl Role {
    /// Map a backend role (`admin`, `logistics`, ...) or a French role name.
    pub fn from_backend(role: &str) -> Option<Role> {
        match role.to_lowercase().as_str() {
            "admin" | "propriétaire" => Some(Role::Owner),
            "commercial" => Some(Role::Commercial),
            "logistics" | "logistique" => Some(Role::Logistics),
            "finance" => Some(Role::Finance),
            "visitor" | "visiteur" => Some(Role::Visitor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "Propriétaire",
            Role::Commercial => "Commercial",
            Role::Logistics => "Logistique",
            Role::Finance => "Finance",
            Role::Visitor => "Visiteur",
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Role::Owner => 5,
            Role::Commercial => 4,
            Role::Logistics => 3,
            Role::Finance => 2,
            Role::Visitor => 1,
        }
    }
}

/// Back-office screens guarded by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Module {
    Dashboard,
    StandSimulator,
    StandCatalog,
    Achat,
    Invoices,
    Statistics,
    Products,
    Suppliers,
    Categories,
    UserManagement,
}

const ALL_ROLES: &[Role] = &[
    Role::Owner,
    Role::Commercial,
    Role::Logistics,
    Role::Finance,
    Role::Visitor,
];

impl Module {
    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::StandSimulator => "stand-simulator",
            Module::StandCatalog => "stand-catalog",
            Module::Achat => "achat",
            Module::Invoices => "invoices",
            Module::Statistics => "statistics",
            Module::Products => "products",
            Module::Suppliers => "suppliers",
            Module::Categories => "categories",
            Module::UserManagement => "user-management",
        }
    }

    pub fn allowed_roles(&self) -> &'static [Role] {
        use Role::*;
        match self {
            Module::Dashboard | Module::StandCatalog => ALL_ROLES,
            Module::StandSimulator => &[Owner, Commercial],
            Module::Achat => &[Owner, Commercial, Logistics, Finance],
            Module::Invoices => &[Owner, Commercial, Finance],
            Module::Statistics => &[Owner, Commercial, Finance, Visitor],
            Module::Products => &[Owner, Commercial, Logistics],
            Module::Suppliers => &[Owner, Logistics],
            Module::Categories | Module::UserManagement => &[Owner],
        }
    }
}

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    pub path: &'static str,
    pub label: &'static str,
    pub module: Module,
}

const NAVIGATION: &[NavigationItem] = &[
    NavigationItem {
        path: "/dashboard",
        label: "Tableau de Bord",
        module: Module::Dashboard,
    },
    NavigationItem {
        path: "/user-management",
        label: "Gestion Utilisateurs",
        module: Module::UserManagement,
    },
    NavigationItem {
        path: "/stand-simulator",
        label: "Créer un Stand",
        module: Module::StandSimulator,
    },
    NavigationItem {
        path: "/stand-catalog",
        label: "Catalogue des Stands",
        module: Module::StandCatalog,
    },
    NavigationItem {
        path: "/achat",
        label: "Module Achat",
        module: Module::Achat,
    },
    NavigationItem {
        path: "/invoices",
        label: "Factures Clients",
        module: Module::Invoices,
    },
    NavigationItem {
        path: "/statistics",
        label: "Statistiques",
        module: Module::Statistics,
    },
    // The contacts directory is opened through the suppliers permission.
    NavigationItem {
        path: "/contacts",
        label: "Contacts",
        module: Module::Suppliers,
    },
    NavigationItem {
        path: "/suppliers",
        label: "Fournisseurs",
        module: Module::Suppliers,
    },
    NavigationItem {
        path: "/products",
        label: "Produits",
        module: Module::Products,
    },
];

/// Sidebar entries visible to `user`, in display order.
pub fn navigation(user: &User) -> Vec<NavigationItem> {
    NAVIGATION
        .iter()
        .filter(|item| user.can_access(item.module))
        .cloned()
        .collect()
}
