//! Page compositions: each entity page is a [`RecordGrid`](crate::grid::RecordGrid)
//! configured with its own columns and create form.

pub mod branches;
pub mod companies;
pub mod dashboard;
pub mod login;
pub mod printer_models;
pub mod profile;

use crate::types::EntityLabel;

pub const COMPANY_LABEL: EntityLabel = EntityLabel::new("Empresa", "empresas", true);
pub const BRANCH_LABEL: EntityLabel = EntityLabel::new("Sucursal", "sucursales", true);
pub const PRINTER_MODEL_LABEL: EntityLabel = EntityLabel::new("Modelo de Impresora", "modelos de impresora", false);

pub use branches::{BranchesPage, CompanyLookup};
pub use dashboard::{dashboard_stats, DashboardStat, DASHBOARD_TITLE};
pub use login::{LoginField, LoginForm, LoginOutcome};
pub use profile::{role_tag, ProfileEditor, ProfileOutcome, RoleTag};
