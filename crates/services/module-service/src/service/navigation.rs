//! Menu assembly from enabled modules' manifests.
//!
//! Lookups that fail while building a menu hide entries instead of
//! surfacing errors: a menu is always returned.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::warn;

use access_service_lib::repository::UserDirectory;
use access_service_lib::service::CapabilityResolver;
use domain::{MenuItem, ModuleManifest, NavEntry, NavKind};

use crate::repository::ModuleRepository;

pub struct NavigationBuilder {
    modules: Arc<dyn ModuleRepository>,
    resolver: Arc<dyn CapabilityResolver>,
    users: Arc<dyn UserDirectory>,
    manifests: Vec<ModuleManifest>,
}

impl NavigationBuilder {
    /// Manifests are normalized here; invalid ones contribute nothing.
    pub fn new(
        modules: Arc<dyn ModuleRepository>,
        resolver: Arc<dyn CapabilityResolver>,
        users: Arc<dyn UserDirectory>,
        manifests: Vec<ModuleManifest>,
    ) -> Self {
        let mut manifests: Vec<ModuleManifest> = manifests
            .into_iter()
            .filter_map(|manifest| {
                let name = manifest.name.clone();
                manifest
                    .normalized()
                    .map_err(|e| warn!(module = %name, error = %e, "Ignoring invalid manifest"))
                    .ok()
            })
            .collect();
        manifests.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            modules,
            resolver,
            users,
            manifests,
        }
    }

    /// Menu for `kind` as seen by `user` (`None` for anonymous visitors) today.
    pub async fn build_menu(&self, kind: NavKind, user: Option<&str>) -> Vec<MenuItem> {
        self.build_menu_on(kind, user, Utc::now().date_naive()).await
    }

    /// Same as `build_menu`, with ages computed on `today`.
    pub async fn build_menu_on(
        &self,
        kind: NavKind,
        user: Option<&str>,
        today: NaiveDate,
    ) -> Vec<MenuItem> {
        let enabled: HashSet<String> = match self.modules.list_enabled().await {
            Ok(names) => names.into_iter().collect(),
            Err(e) => {
                warn!(error = %e, "Could not load enabled modules, menu is empty");
                return Vec::new();
            }
        };

        let user = user.map(str::trim).filter(|u| !u.is_empty());
        let mut age: Option<Option<u32>> = None;
        let mut visible: Vec<&NavEntry> = Vec::new();

        let entries = self
            .manifests
            .iter()
            .filter(|m| enabled.contains(&m.name))
            .flat_map(|m| m.nav(kind));

        for entry in entries {
            if !entry.visibility.allows(user.is_some()) {
                continue;
            }

            if !entry.required_capabilities.is_empty() {
                let Some(username) = user else { continue };
                if !self
                    .resolver
                    .has_all(username, &entry.required_capabilities)
                    .await
                {
                    continue;
                }
            }

            if let Some(min_age) = entry.min_age {
                let Some(username) = user else { continue };
                if age.is_none() {
                    age = Some(self.age_of(username, today).await);
                }
                if !matches!(age, Some(Some(years)) if years >= min_age) {
                    continue;
                }
            }

            visible.push(entry);
        }

        visible.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        });

        visible
            .into_iter()
            .map(|entry| MenuItem {
                title: entry.title.clone(),
                href: entry.href.clone(),
            })
            .collect()
    }

    async fn age_of(&self, username: &str, today: NaiveDate) -> Option<u32> {
        match self.users.find(username).await {
            Ok(profile) => profile.and_then(|p| p.age_on(today)),
            Err(e) => {
                warn!(user = %username, error = %e, "Age lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockModuleRepository;
    use access_service_lib::repository::MockUserDirectory;
    use access_service_lib::service::MockCapabilityResolver;
    use common::AppError;
    use domain::{UserProfile, Visibility};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn modules(enabled: &'static [&'static str]) -> MockModuleRepository {
        let mut repo = MockModuleRepository::new();
        repo.expect_list_enabled()
            .returning(move || Ok(enabled.iter().map(|s| s.to_string()).collect()));
        repo
    }

    fn users_born(dob: Option<NaiveDate>) -> MockUserDirectory {
        let mut users = MockUserDirectory::new();
        users.expect_find().returning(move |name| {
            Ok(Some(UserProfile {
                username: name.to_string(),
                email: None,
                role_label: None,
                dob,
                created_at: Utc::now(),
            }))
        });
        users
    }

    fn allow_all() -> MockCapabilityResolver {
        let mut resolver = MockCapabilityResolver::new();
        resolver.expect_has_all().returning(|_, _| true);
        resolver
    }

    #[tokio::test]
    async fn test_menu_sorted_by_order_then_title() {
        let manifest = ModuleManifest::new("site", "1.0.0", true)
            .with_nav(NavKind::User, NavEntry::new("zebra", "/z", 10))
            .with_nav(NavKind::User, NavEntry::new("Apple", "/a", 10))
            .with_nav(NavKind::User, NavEntry::new("first", "/f", 1));

        let nav = NavigationBuilder::new(
            Arc::new(modules(&["site"])),
            Arc::new(allow_all()),
            Arc::new(users_born(None)),
            vec![manifest],
        );
        let menu = nav.build_menu_on(NavKind::User, Some("alice"), today()).await;
        let titles: Vec<_> = menu.iter().map(|m| m.title.as_str()).collect();

        assert_eq!(titles, vec!["first", "Apple", "zebra"]);
    }

    #[tokio::test]
    async fn test_manifest_names_are_normalized() {
        let site = ModuleManifest::new(" Site ", "1.0.0", true)
            .with_nav(NavKind::Auth, NavEntry::new("Home", "/", 1));
        let broken = ModuleManifest::new("not valid", "1.0.0", true)
            .with_nav(NavKind::Auth, NavEntry::new("Broken", "/b", 1));

        let nav = NavigationBuilder::new(
            Arc::new(modules(&["site", "not valid"])),
            Arc::new(allow_all()),
            Arc::new(users_born(None)),
            vec![site, broken],
        );
        let menu = nav.build_menu_on(NavKind::Auth, None, today()).await;

        assert_eq!(menu, vec![MenuItem { title: "Home".into(), href: "/".into() }]);
    }

    #[tokio::test]
    async fn test_disabled_modules_contribute_nothing() {
        let on = ModuleManifest::new("on", "1.0.0", true)
            .with_nav(NavKind::Auth, NavEntry::new("On", "/on", 1));
        let off = ModuleManifest::new("off", "1.0.0", false)
            .with_nav(NavKind::Auth, NavEntry::new("Off", "/off", 1));

        let nav = NavigationBuilder::new(
            Arc::new(modules(&["on"])),
            Arc::new(allow_all()),
            Arc::new(users_born(None)),
            vec![on, off],
        );
        let menu = nav.build_menu_on(NavKind::Auth, None, today()).await;

        assert_eq!(menu, vec![MenuItem { title: "On".into(), href: "/on".into() }]);
    }

    #[tokio::test]
    async fn test_visibility_guest_and_auth() {
        let manifest = ModuleManifest::new("auth", "1.0.0", true)
            .with_nav(NavKind::Auth, NavEntry::new("Login", "/login", 1).visible(Visibility::Guest))
            .with_nav(NavKind::Auth, NavEntry::new("Logout", "/logout", 2).visible(Visibility::Auth));

        let nav = NavigationBuilder::new(
            Arc::new(modules(&["auth"])),
            Arc::new(allow_all()),
            Arc::new(users_born(None)),
            vec![manifest],
        );

        let guest = nav.build_menu_on(NavKind::Auth, None, today()).await;
        let member = nav.build_menu_on(NavKind::Auth, Some("alice"), today()).await;

        assert_eq!(guest[0].title, "Login");
        assert_eq!(guest.len(), 1);
        assert_eq!(member[0].title, "Logout");
        assert_eq!(member.len(), 1);
    }

    #[tokio::test]
    async fn test_capability_entries_hidden_from_anonymous() {
        let manifest = ModuleManifest::new("admin", "1.0.0", true)
            .with_nav(NavKind::Admin, NavEntry::new("Users", "/u", 1).requiring("manage_users"));

        let mut resolver = MockCapabilityResolver::new();
        resolver.expect_has_all().never();

        let nav = NavigationBuilder::new(
            Arc::new(modules(&["admin"])),
            Arc::new(resolver),
            Arc::new(users_born(None)),
            vec![manifest],
        );

        assert!(nav.build_menu_on(NavKind::Admin, None, today()).await.is_empty());
    }

    #[tokio::test]
    async fn test_min_age_needs_known_age() {
        let manifest = ModuleManifest::new("club", "1.0.0", true)
            .with_nav(NavKind::User, NavEntry::new("Bar", "/bar", 1).min_age(18));

        let adult = NavigationBuilder::new(
            Arc::new(modules(&["club"])),
            Arc::new(allow_all()),
            Arc::new(users_born(NaiveDate::from_ymd_opt(2000, 1, 1))),
            vec![manifest.clone()],
        );
        let minor = NavigationBuilder::new(
            Arc::new(modules(&["club"])),
            Arc::new(allow_all()),
            Arc::new(users_born(NaiveDate::from_ymd_opt(2010, 1, 1))),
            vec![manifest.clone()],
        );
        let unknown = NavigationBuilder::new(
            Arc::new(modules(&["club"])),
            Arc::new(allow_all()),
            Arc::new(users_born(None)),
            vec![manifest],
        );

        assert_eq!(adult.build_menu_on(NavKind::User, Some("a"), today()).await.len(), 1);
        assert!(minor.build_menu_on(NavKind::User, Some("m"), today()).await.is_empty());
        assert!(unknown.build_menu_on(NavKind::User, Some("u"), today()).await.is_empty());
        assert!(adult.build_menu_on(NavKind::User, None, today()).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookups_fail_closed() {
        let manifest = ModuleManifest::new("club", "1.0.0", true)
            .with_nav(NavKind::User, NavEntry::new("Bar", "/bar", 1).min_age(18))
            .with_nav(NavKind::User, NavEntry::new("Home", "/", 0));

        let mut users = MockUserDirectory::new();
        users.expect_find()
            .returning(|_| Err(AppError::internal("gone")));

        let nav = NavigationBuilder::new(
            Arc::new(modules(&["club"])),
            Arc::new(allow_all()),
            Arc::new(users),
            vec![manifest.clone()],
        );
        let menu = nav.build_menu_on(NavKind::User, Some("alice"), today()).await;
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].title, "Home");

        let mut broken = MockModuleRepository::new();
        broken.expect_list_enabled()
            .returning(|| Err(AppError::internal("gone")));
        let nav = NavigationBuilder::new(
            Arc::new(broken),
            Arc::new(allow_all()),
            Arc::new(users_born(None)),
            vec![manifest],
        );
        assert!(nav.build_menu_on(NavKind::User, Some("alice"), today()).await.is_empty());
    }
}
