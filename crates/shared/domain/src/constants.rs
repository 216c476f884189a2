//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Distinguished role that implicitly holds every capability and can never be deleted
pub const SUPER_ROLE: &str = "superadmin";

/// Administrator role
pub const ROLE_ADMIN: &str = "admin";

/// Content editor role
pub const ROLE_EDITOR: &str = "editor";

/// Plain user role (no capabilities)
pub const ROLE_USER: &str = "user";

/// Check if a role name is the distinguished super-role
pub fn is_super_role(role: &str) -> bool {
    role.eq_ignore_ascii_case(SUPER_ROLE)
}

// =============================================================================
// Capabilities
// =============================================================================

pub const CAP_VIEW_ADMIN: &str = "view_admin";
pub const CAP_MANAGE_USERS: &str = "manage_users";
pub const CAP_MANAGE_MODULES: &str = "manage_modules";
pub const CAP_EDIT_CONTENT: &str = "edit_content";
pub const CAP_MANAGE_IDENTITY_PROVIDERS: &str = "manage_identity_providers";

const ADMIN_CAPS: &[&str] = &[
    CAP_VIEW_ADMIN,
    CAP_MANAGE_USERS,
    CAP_MANAGE_MODULES,
    CAP_EDIT_CONTENT,
    CAP_MANAGE_IDENTITY_PROVIDERS,
];

/// Roles and grants installed by `seed_defaults`.
///
/// The super-role gets explicit grants only so listings show something useful;
/// the resolver never consults them.
pub const DEFAULT_ROLE_GRANTS: &[(&str, &[&str])] = &[
    (SUPER_ROLE, ADMIN_CAPS),
    (ROLE_ADMIN, ADMIN_CAPS),
    (ROLE_EDITOR, &[CAP_VIEW_ADMIN, CAP_EDIT_CONTENT]),
    (ROLE_USER, &[]),
];

// =============================================================================
// Validation
// =============================================================================

/// Minimum role/capability name length
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum role/capability name length
pub const MAX_NAME_LENGTH: usize = 64;

/// Maximum module name length
pub const MAX_MODULE_NAME_LENGTH: usize = 64;

/// Maximum page slug / title length
pub const MAX_PAGE_FIELD_LENGTH: usize = 190;

// =============================================================================
// Modules
// =============================================================================

/// Version assumed when a manifest omits one
pub const DEFAULT_MODULE_VERSION: &str = "1.0.0";

/// Manifest file looked up in every module folder
pub const MANIFEST_FILE_NAME: &str = "module.json";

/// Admin entry used when a manifest declares none
pub const DEFAULT_ADMIN_ENTRY: &str = "controller.php";

/// Route prefix for relative admin entries
pub const MODULES_ROUTE_PREFIX: &str = "/backend/modules";

/// Navigation order used when an entry declares none
pub const DEFAULT_NAV_ORDER: i32 = 1000;
